use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

use super::brochure::Brochure;

/// Receives the brochure once a lead has been accepted.
pub trait BrochureSink: Debug + Send + Sync {
    /// Stores the brochure, returning where it landed.
    fn deliver(&self, brochure: &Brochure) -> Result<String, SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("unable to write brochure to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes `{slug}-brochure.txt` into a download directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn save(&self, brochure: &Brochure) -> Result<PathBuf, SinkError> {
        let path = self.directory.join(&brochure.filename);
        let write = |path: &Path| -> std::io::Result<()> {
            fs::create_dir_all(&self.directory)?;
            fs::write(path, brochure.content.as_bytes())
        };
        write(&path).map_err(|source| SinkError::Write {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "brochure saved");
        Ok(path)
    }
}

impl BrochureSink for DirectorySink {
    fn deliver(&self, brochure: &Brochure) -> Result<String, SinkError> {
        self.save(brochure).map(|path| path.display().to_string())
    }
}

/// Keeps the latest brochure in memory for a caller to download later.
#[derive(Debug, Default)]
pub struct MemorySink {
    latest: Mutex<Option<Brochure>>,
}

impl MemorySink {
    pub fn latest(&self) -> Option<Brochure> {
        self.latest.lock().expect("brochure mutex poisoned").clone()
    }
}

impl BrochureSink for MemorySink {
    fn deliver(&self, brochure: &Brochure) -> Result<String, SinkError> {
        let mut guard = self.latest.lock().expect("brochure mutex poisoned");
        *guard = Some(brochure.clone());
        Ok(brochure.filename.clone())
    }
}
