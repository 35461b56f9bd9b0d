use crate::config::ConfigError;
use crate::ingest::IngestError;
use crate::scoring::ScoringError;
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
    Server(axum::Error),
    Ingest(IngestError),
    Scoring(ScoringError),
    Render(serde_json::Error),
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Ingest(IngestError::UnsupportedFormat { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            AppError::Ingest(IngestError::MalformedRecord { .. }) | AppError::Scoring(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Ingest(
                IngestError::Csv(_) | IngestError::Json(_) | IngestError::JsonLayout(_),
            )
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Ingest(IngestError::Io(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Ingest(err) => write!(f, "{}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Render(err) => write!(f, "render error: {}", err),
            AppError::BadRequest(message) => write!(f, "bad request: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Ingest(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Render(err) => Some(err),
            AppError::BadRequest(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
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

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<IngestError> for AppError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::FamilyId;

    #[test]
    fn unsupported_format_maps_to_415_with_original_message() {
        let error = AppError::from(IngestError::UnsupportedFormat {
            extension: "xlsx".to_string(),
        });
        assert_eq!(error.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(error.to_string(), "Unsupported file format: xlsx");
    }

    #[test]
    fn record_and_consistency_failures_are_unprocessable() {
        let malformed = AppError::from(IngestError::MalformedRecord {
            row: 1,
            family: None,
            field: "Income",
            reason: "is missing".to_string(),
        });
        assert_eq!(malformed.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let inconsistent = AppError::from(ScoringError::InconsistentFamily {
            family_id: FamilyId::Number(4),
            field: "Savings",
            expected: 1.0,
            found: 2.0,
        });
        assert_eq!(inconsistent.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn render_failures_are_internal_errors() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated json");
        let error = AppError::from(source);

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().starts_with("render error: "));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn into_response_uses_mapped_status() {
        let response = AppError::BadRequest("missing file".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
