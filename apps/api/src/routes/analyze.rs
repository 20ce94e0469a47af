use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::scoring::AnalysisResult;
use crate::errors::AppError;
use crate::extraction::DocumentFormat;
use crate::state::AppState;

const TEXT_SOURCE: &str = "text";

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub cv_text: String,
    #[serde(default)]
    pub job_text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Response envelope. Nothing is stored; the id only correlates logs.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    /// Uploaded file name, or `"text"` for the JSON endpoint.
    pub source: String,
    pub result: AnalysisResult,
}

impl AnalyzeResponse {
    fn new(analysis_id: Uuid, source: String, result: AnalysisResult) -> Self {
        Self {
            analysis_id,
            analyzed_at: Utc::now(),
            source,
            result,
        }
    }
}

struct Upload {
    filename: String,
    bytes: Bytes,
}

/// POST /api/v1/analyze
/// Multipart fields: `cv_file` (required), `job_offer`, `lang`.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut upload = None;
    let mut job_offer = None;
    let mut lang = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("cv_file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                upload = Some(Upload { filename, bytes });
            }
            Some("job_offer") => job_offer = Some(field.text().await?),
            Some("lang") => lang = Some(field.text().await?),
            other => debug!("Ignoring multipart field {other:?}"),
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("cv_file is required".into()))?;
    if upload.filename.is_empty() {
        return Err(AppError::Validation("cv_file must carry a file name".into()));
    }
    let format = DocumentFormat::from_filename(&upload.filename)?;

    let analysis_id = Uuid::new_v4();
    info!(
        %analysis_id,
        filename = %upload.filename,
        format = format.as_str(),
        size = upload.bytes.len(),
        "Received CV upload"
    );

    let cv_text = state.extractor.extract(upload.bytes, format).await?;
    let result = state
        .analyzer
        .analyze(&cv_text, job_offer.as_deref(), lang.as_deref());

    Ok(Json(AnalyzeResponse::new(analysis_id, upload.filename, result)))
}

/// POST /api/v1/analyze/text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if req.cv_text.trim().is_empty() {
        return Err(AppError::Validation("cv_text must not be empty".into()));
    }

    let analysis_id = Uuid::new_v4();
    info!(%analysis_id, chars = req.cv_text.chars().count(), "Received CV text");

    let result = state.analyzer.analyze(
        &req.cv_text,
        req.job_text.as_deref(),
        req.language.as_deref(),
    );

    Ok(Json(AnalyzeResponse::new(
        analysis_id,
        TEXT_SOURCE.to_string(),
        result,
    )))
}
