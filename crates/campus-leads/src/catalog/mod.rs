//! Static institution content and the lookups the site and form sessions need.

mod calendar;
pub mod domain;
mod seed;

use std::collections::HashSet;
use std::sync::Arc;

pub use calendar::IntakeCalendar;
pub use domain::{Course, FeeRange, Institution, InstitutionSummary, PlacementStats};
pub use seed::INDIAN_STATES;

/// Ordered, immutable set of institutions. Cloning shares the underlying records.
#[derive(Debug, Clone)]
pub struct Catalog {
    institutions: Arc<[Arc<Institution>]>,
}

impl Catalog {
    pub fn new(institutions: Vec<Institution>) -> Result<Self, CatalogError> {
        if institutions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for institution in &institutions {
            if !seen.insert(institution.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(institution.slug.clone()));
            }
        }

        Ok(Self {
            institutions: institutions.into_iter().map(Arc::new).collect(),
        })
    }

    /// Catalog bundled with the service.
    pub fn standard() -> Self {
        Self {
            institutions: seed::standard_institutions()
                .into_iter()
                .map(Arc::new)
                .collect(),
        }
    }

    pub fn institutions(&self) -> impl Iterator<Item = &Institution> {
        self.institutions.iter().map(|institution| institution.as_ref())
    }

    pub fn summaries(&self) -> Vec<InstitutionSummary> {
        self.institutions().map(Institution::summary).collect()
    }

    pub fn get(&self, slug: &str) -> Result<Arc<Institution>, CatalogError> {
        self.institutions
            .iter()
            .find(|institution| institution.slug == slug)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownSlug(slug.to_string()))
    }

    /// First institution in catalog order; the landing page of the site.
    pub fn default_institution(&self) -> Arc<Institution> {
        Arc::clone(&self.institutions[0])
    }

    /// Maps a request path onto an institution page.
    ///
    /// `/{slug}` resolves directly; the root path and anything unknown redirect to the
    /// default institution.
    pub fn resolve_route(&self, path: &str) -> RouteResolution {
        let segment = path.trim_matches('/');
        match self
            .institutions
            .iter()
            .find(|institution| institution.slug == segment)
        {
            Some(institution) => RouteResolution::Page(Arc::clone(institution)),
            None => RouteResolution::Redirect(self.default_institution()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RouteResolution {
    Page(Arc<Institution>),
    Redirect(Arc<Institution>),
}

impl RouteResolution {
    pub fn institution(&self) -> &Institution {
        match self {
            Self::Page(institution) | Self::Redirect(institution) => institution,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no institution data available")]
    Empty,
    #[error("institution slug '{0}' appears more than once")]
    DuplicateSlug(String),
    #[error("unknown institution '{0}'")]
    UnknownSlug(String),
}
