use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::domain::LeadPayload;
use crate::config::{IntakeConfig, IntakeEndpoint};

/// Outbound hook that records a lead with the remote intake service.
#[async_trait]
pub trait IntakeGateway: Debug + Send + Sync {
    /// Endpoint this gateway posts to; form sessions refuse to submit when unconfigured.
    fn endpoint(&self) -> &IntakeEndpoint;

    async fn submit(&self, payload: &LeadPayload<'_>) -> Result<(), IntakeError>;
}

/// Failure while handing a lead to the intake service. Details are for logs only.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("intake request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("intake endpoint rejected the lead with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("intake client unavailable: {0}")]
    Client(String),
    #[error("no intake endpoint configured")]
    NotConfigured,
}

/// JSON-over-HTTP intake client.
#[derive(Debug, Clone)]
pub struct HttpIntakeGateway {
    http: reqwest::Client,
    endpoint: IntakeEndpoint,
}

impl HttpIntakeGateway {
    pub fn new(endpoint: IntakeEndpoint, timeout: Duration) -> Result<Self, IntakeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("campus-leads/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| IntakeError::Client(err.to_string()))?;

        Ok(Self { http, endpoint })
    }

    pub fn from_config(config: &IntakeConfig) -> Result<Self, IntakeError> {
        Self::new(config.endpoint.clone(), config.request_timeout)
    }
}

#[async_trait]
impl IntakeGateway for HttpIntakeGateway {
    fn endpoint(&self) -> &IntakeEndpoint {
        &self.endpoint
    }

    async fn submit(&self, payload: &LeadPayload<'_>) -> Result<(), IntakeError> {
        let url = self.endpoint.url().ok_or(IntakeError::NotConfigured)?;
        debug!(endpoint = url, university = payload.university, "posting lead");
        let response = self.http.post(url).json(payload).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(IntakeError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
