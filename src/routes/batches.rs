//! Batch Routes
//!
//! HTTP endpoints for the batch renaming pipeline.
//!
//! Endpoints:
//! - POST /api/v1/batches - upload a batch of PDFs, start processing
//! - GET /api/v1/batches/:id - session status, progress, per-file outcomes
//! - GET /api/v1/batches/:id/archive - download the finished archive (once)

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::batch::{self, BatchStatus, FileOutcome, UploadedFile};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Fixed filename of the delivered archive
const ARCHIVE_FILE_NAME: &str = "polizas.zip";

// ============================================================================
// Router
// ============================================================================

/// Create the batches router
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_batch))
        .route("/:id", get(get_batch))
        .route("/:id/archive", get(download_archive))
        .layer(DefaultBodyLimit::max(state.config().batch.max_upload_bytes))
}

// ============================================================================
// Response Types
// ============================================================================

/// Response after accepting a batch
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchCreatedResponse {
    batch_id: String,
    total_files: usize,
    status_url: String,
}

/// Session status response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchStatusResponse {
    batch_id: String,
    status: BatchStatus,
    total_files: usize,
    processed_files: usize,
    /// Fractional completion in [0, 1]
    progress: f64,
    archive_ready: bool,
    outcomes: Vec<FileOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/batches
///
/// Collect the ordered multipart files, create a session, and hand the
/// batch to the pipeline. Responds 202 with the batch ID; progress and
/// the archive are retrieved through the other endpoints.
async fn create_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<BatchCreatedResponse>)> {
    let max_files = state.config().batch.max_files;
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?
    {
        // only file parts belong to the batch
        let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let content_type = field.content_type().map(|s| s.to_string());

        if !is_pdf_upload(&file_name, content_type.as_deref()) {
            return Err(AppError::UnsupportedMediaType(
                content_type.unwrap_or_else(|| file_name.clone()),
            ));
        }

        if files.len() >= max_files {
            return Err(AppError::TooManyFiles {
                count: files.len() + 1,
                max: max_files,
            });
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        let index = files.len();
        files.push(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
            index,
        });
    }

    if files.is_empty() {
        return Err(AppError::EmptyBatch);
    }

    let session = state.batches().create_session(files.len()).await;
    let batch_id = session.id;

    tracing::info!(
        batch_id = %batch_id,
        files = files.len(),
        "Batch accepted"
    );

    // the pipeline runs detached; the client polls the status endpoint
    let task_state = state.clone();
    tokio::spawn(async move {
        batch::process_batch(
            task_state.batches(),
            batch_id,
            files,
            task_state.matcher(),
            task_state.extractor(),
        )
        .await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(BatchCreatedResponse {
            batch_id: batch_id.to_string(),
            total_files: session.total_files,
            status_url: format!("/api/v1/batches/{}", batch_id),
        }),
    ))
}

/// GET /api/v1/batches/:id
///
/// Session status and progress.
async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BatchStatusResponse>> {
    let batch_id = parse_batch_id(&id)?;
    let session = state.batches().get_session(batch_id).await?;

    Ok(Json(BatchStatusResponse {
        batch_id: session.id.to_string(),
        status: session.status,
        total_files: session.total_files,
        processed_files: session.processed_files,
        progress: session.progress(),
        archive_ready: session.archive_ready(),
        outcomes: session.outcomes,
        error: session.error,
    }))
}

/// GET /api/v1/batches/:id/archive
///
/// Deliver the finished archive exactly once.
async fn download_archive(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let batch_id = parse_batch_id(&id)?;
    let bytes = state.batches().take_archive(batch_id).await?;

    tracing::info!(
        batch_id = %batch_id,
        archive_bytes = bytes.len(),
        "Archive delivered"
    );

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))?)
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_batch_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::BatchNotFound(id.to_string()))
}

/// Check that an uploaded part is constrained to the PDF media type
fn is_pdf_upload(file_name: &str, content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"))
        || file_name.to_ascii_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_uploads_are_accepted_by_type_or_extension() {
        assert!(is_pdf_upload("doc.pdf", Some("application/pdf")));
        assert!(is_pdf_upload("doc.PDF", None));
        assert!(is_pdf_upload("doc.bin", Some("application/pdf")));
        assert!(!is_pdf_upload("doc.txt", Some("text/plain")));
        assert!(!is_pdf_upload("doc.txt", None));
    }

    #[test]
    fn malformed_batch_id_maps_to_not_found() {
        assert!(matches!(
            parse_batch_id("not-a-uuid"),
            Err(AppError::BatchNotFound(_))
        ));
    }
}
