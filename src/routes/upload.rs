//! Upload route
//!
//! POST /upload takes a multipart form with a `pdfFile` field, stages the
//! bytes to the upload directory, runs the cropper, and returns the cropped
//! document as a file download.

use std::path::Path;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Router,
};

use crate::crop::crop_document;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Maximum accepted upload size: 500MB
const MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Multipart field name carrying the source document.
const UPLOAD_FIELD: &str = "pdfFile";

/// Create the upload router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_pdf))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// POST /upload
///
/// On success the response body is the cropped PDF with an attachment
/// Content-Disposition. Crop and IO failures surface as a plain-text 500.
async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        AppError::BadRequest("Failed to read upload".to_string())
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let data = field.bytes().await.map_err(|e| {
            tracing::error!("Failed to read file data: {}", e);
            AppError::BadRequest("Failed to read file data".to_string())
        })?;

        tracing::debug!(
            file_name = %original_name,
            size = data.len(),
            "Received upload"
        );

        let config = state.config();
        let stamp = chrono::Utc::now().timestamp_millis();
        let extension = Path::new(&original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("pdf");

        let input_path = config
            .storage
            .upload_dir
            .join(format!("{stamp}.{extension}"));
        let output_path = config
            .storage
            .output_dir
            .join(format!("cropped_{stamp}.pdf"));

        tokio::fs::write(&input_path, &data).await?;

        let margins = config.crop.margins.clone();
        let batch_size = config.crop.batch_size;
        let (source, destination) = (input_path.clone(), output_path.clone());
        let summary = tokio::task::spawn_blocking(move || {
            crop_document(&source, &destination, &margins, batch_size)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Crop task failed: {e}")))??;

        tracing::info!(
            file_name = %original_name,
            pages = summary.pages,
            batches = summary.batches,
            output = %output_path.display(),
            "Upload cropped"
        );

        let bytes = tokio::fs::read(&output_path).await?;
        let download_name = output_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("cropped.pdf")
            .to_string();

        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/pdf")
            .header(header::CONTENT_LENGTH, bytes.len())
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{download_name}\""),
            )
            .body(Body::from(bytes))
            .map_err(|e| AppError::Internal(e.to_string()))?);
    }

    tracing::warn!("No {} field found in multipart upload", UPLOAD_FIELD);
    Err(AppError::BadRequest(format!(
        "No file provided. Use field name '{UPLOAD_FIELD}'"
    )))
}
