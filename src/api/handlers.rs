use crate::api::{pages, AppState};
use crate::error::Result;
use crate::ingest::secure_filename;
use crate::metrics::gather_metrics;
use crate::ml::ModelSummary;
use crate::models::{AssetRecord, OwnerPrediction, PredictionRequest};
use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

/// Name used when an uploaded file name sanitizes to nothing
const FALLBACK_UPLOAD_NAME: &str = "dataset.csv";

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        model_generation: state.service.generation(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub model_generation: u64,
}

/// Prometheus text exposition
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}

/// Landing page with the upload form
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(pages::index_page(&state.service.summary()))
}

/// Accept a dataset upload, persist it and retrain both models
///
/// A request without a usable `file` part is sent back to the index page.
pub async fn upload_dataset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some((filename, bytes));
        break;
    }

    let Some((filename, bytes)) = upload else {
        warn!("Upload request carried no file part");
        return Ok(Redirect::to("/"));
    };
    if filename.is_empty() || bytes.is_empty() {
        warn!(filename = %filename, "Upload request carried an empty file");
        return Ok(Redirect::to("/"));
    }

    let stored_name = secure_filename(&filename).unwrap_or_else(|| FALLBACK_UPLOAD_NAME.to_string());
    let path = state.uploads.save(&stored_name, &bytes).await?;

    let metadata = state
        .service
        .retrain_from_bytes(bytes.to_vec(), stored_name)
        .await?;

    info!(
        path = %path.display(),
        rows = metadata.n_rows,
        generation = state.service.generation(),
        "Retrained models from upload"
    );

    Ok(Redirect::to("/"))
}

/// Empty prediction form
pub async fn predict_form() -> Html<String> {
    Html(pages::predict_page(&PredictionRequest::default(), None))
}

/// Form submission: predict and render the result under the form
pub async fn predict_form_submit(
    State(state): State<AppState>,
    Form(request): Form<PredictionRequest>,
) -> Result<Html<String>> {
    request.validate()?;

    let prediction = state.service.predict(&AssetRecord::from(request.clone()))?;
    Ok(Html(pages::predict_page(&request, Some(&prediction))))
}

/// JSON prediction endpoint
pub async fn predict_json(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<OwnerPrediction>> {
    request.validate()?;

    let prediction = state.service.predict(&AssetRecord::from(request))?;
    Ok(Json(prediction))
}

/// Summary of the live model bundle
pub async fn model_summary(State(state): State<AppState>) -> Result<Json<ModelSummary>> {
    Ok(Json(state.service.summary()))
}
