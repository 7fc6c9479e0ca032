use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::leads::{IntakeError, SessionError, SinkError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Catalog(CatalogError),
    Intake(IntakeError),
    Sink(SinkError),
    Session(SessionError),
    UnknownSession(String),
    SessionLimit(usize),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Catalog(CatalogError::UnknownSlug(_)) | AppError::UnknownSession(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::Session(SessionError::InFlight) => StatusCode::CONFLICT,
            AppError::Session(SessionError::Closed) => StatusCode::GONE,
            AppError::SessionLimit(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Catalog(_)
            | AppError::Intake(_)
            | AppError::Sink(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::Intake(err) => write!(f, "intake error: {}", err),
            AppError::Sink(err) => write!(f, "brochure error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::UnknownSession(id) => write!(f, "unknown form session '{}'", id),
            AppError::SessionLimit(max) => {
                write!(f, "too many open form sessions (limit {}); try again later", max)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Intake(err) => Some(err),
            AppError::Sink(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::UnknownSession(_) | AppError::SessionLimit(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<IntakeError> for AppError {
    fn from(value: IntakeError) -> Self {
        Self::Intake(value)
    }
}

impl From<SinkError> for AppError {
    fn from(value: SinkError) -> Self {
        Self::Sink(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_lookup_failures_to_not_found() {
        let response =
            AppError::from(CatalogError::UnknownSlug("nowhere".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::UnknownSession("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn maps_session_conflicts() {
        assert_eq!(
            AppError::from(SessionError::InFlight).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(SessionError::Closed).status_code(),
            StatusCode::GONE
        );
        assert_eq!(
            AppError::SessionLimit(10).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(IntakeError::NotConfigured).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
