use crate::infra::AppState;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use family_score::error::AppError;
use family_score::ingest::{IngestError, SourceFormat, TransactionDecoder};
use family_score::scoring::{ScoredFamily, ScoringError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

const UPLOAD_FIELD: &str = "file";

/// Body of `POST /api/v1/score`.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    transactions: Vec<Value>,
}

/// Failure while reading a multipart upload or scoring its contents.
pub(crate) enum UploadError {
    Multipart(MultipartError),
    App(AppError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::Multipart(err) => {
                let payload = json!({ "error": err.body_text() });
                (err.status(), Json(payload)).into_response()
            }
            UploadError::App(err) => err.into_response(),
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(value: MultipartError) -> Self {
        Self::Multipart(value)
    }
}

impl From<AppError> for UploadError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<IngestError> for UploadError {
    fn from(value: IngestError) -> Self {
        Self::App(value.into())
    }
}

impl From<ScoringError> for UploadError {
    fn from(value: ScoringError) -> Self {
        Self::App(value.into())
    }
}

pub(crate) fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/process/", post(process_upload))
        .route("/api/v1/score", post(score_json_endpoint))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores the uploaded `file` field, choosing a decoder from its extension.
pub(crate) async fn process_upload(
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<ScoredFamily>>, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let format = match SourceFormat::from_file_name(&file_name) {
            Ok(format) => format,
            Err(err) => {
                warn!(%file_name, "rejected upload with unsupported format");
                return Err(err.into());
            }
        };

        let contents = field.bytes().await?;
        let transactions = TransactionDecoder::from_reader(format, contents.as_ref())?;
        let scored = state.engine.score(&transactions)?;

        info!(
            %file_name,
            bytes = contents.len(),
            families = scored.len(),
            "scored uploaded transaction file"
        );

        return Ok(Json(scored));
    }

    Err(AppError::BadRequest(format!("multipart body has no '{UPLOAD_FIELD}' field")).into())
}

/// Scores the rows of a `{"transactions": [...]}` request body.
pub(crate) async fn score_json_endpoint(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<Json<Vec<ScoredFamily>>, AppError> {
    let request: ScoreRequest = serde_json::from_slice(&body).map_err(IngestError::from)?;
    let transactions = TransactionDecoder::from_records(request.transactions)?;
    let scored = state.engine.score(&transactions)?;

    info!(
        transactions = transactions.len(),
        families = scored.len(),
        "scored posted transaction batch"
    );

    Ok(Json(scored))
}
