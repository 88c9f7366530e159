use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::models::{AnalysisMode, DocumentType, UploadedFile};

/// Fields posted by the upload form.
#[derive(Debug, Default)]
pub struct AnalysisForm {
    pub file: Option<UploadedFile>,
    pub doc_type: DocumentType,
    pub mode: AnalysisMode,
}

impl AnalysisForm {
    /// The upload, or the blocking "no document" error.
    pub fn require_file(&mut self) -> AppResult<UploadedFile> {
        self.file.take().ok_or(AppError::MissingFile)
    }
}

/// Reads `file`, `doc_type` and `mode` from a multipart body. A file part with no
/// name and no bytes is what browsers send when nothing was chosen, so it counts
/// as no upload.
pub async fn read_analysis_form(
    multipart: &mut Multipart,
    state: &AppState,
) -> AppResult<AnalysisForm> {
    let limit_mb = state.max_file_size_mb;
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        read_error(e, limit_mb, |msg| {
            AppError::invalid_file(format!("Failed to read multipart field: {}", msg))
        })
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());

                let data = field.bytes().await.map_err(|e| {
                    read_error(e, limit_mb, |msg| {
                        AppError::invalid_file(format!("Failed to read file data: {}", msg))
                    })
                })?;

                if data.is_empty() {
                    if file_name.is_empty() {
                        continue;
                    }
                    return Err(AppError::invalid_file("File is empty"));
                }

                if data.len() > state.max_file_size_bytes() {
                    warn!(
                        file_name = %file_name,
                        size_bytes = data.len(),
                        limit_mb,
                        "Upload exceeds the size limit"
                    );
                    return Err(AppError::FileTooLarge { limit: limit_mb });
                }

                let mut file = UploadedFile::new(file_name, data);
                if let Some(mime_type) = content_type {
                    file = file.with_mime_type(mime_type);
                }

                debug!(
                    "Received upload: {} ({} bytes, type: {:?})",
                    file.name,
                    file.size,
                    file.mime_type
                );

                form.file = Some(file);
            }
            "doc_type" => {
                let value = field.text().await.map_err(|e| {
                    read_error(e, limit_mb, |msg| {
                        AppError::validation(format!("Failed to read doc_type: {}", msg))
                    })
                })?;
                form.doc_type = value.parse()?;
            }
            "mode" => {
                let value = field.text().await.map_err(|e| {
                    read_error(e, limit_mb, |msg| {
                        AppError::validation(format!("Failed to read mode: {}", msg))
                    })
                })?;
                form.mode = value.parse()?;
            }
            other => debug!("Ignoring unexpected form field: {}", other),
        }
    }

    Ok(form)
}

/// The body limit trips while a part is still streaming; that is an oversized
/// upload, not a malformed one.
fn read_error(
    err: MultipartError,
    limit_mb: usize,
    otherwise: impl FnOnce(String) -> AppError,
) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(limit_mb, "Request body exceeded the upload limit");
        AppError::FileTooLarge { limit: limit_mb }
    } else {
        otherwise(err.body_text())
    }
}
