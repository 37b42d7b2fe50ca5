use crate::models::{Diagnosis, ImageUpload};
use crate::services::diagnosis::NO_IMAGE_MESSAGE;
use crate::startup::AppState;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use service_core::error::AppError;

/// Multipart field the client puts the leaf image under.
pub const IMAGE_FIELD: &str = "image";

/// `POST /analyze-leaf`
///
/// Anything that is not a multipart form with a non-empty `image` file part is
/// answered with `400 {"error": "No image uploaded"}`.
pub async fn analyze_leaf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Diagnosis, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "Request body is not a multipart form");
        no_image()
    })?;

    let upload = read_image_field(&mut multipart, state.config.upload.max_bytes)
        .await?
        .ok_or_else(no_image)?;

    state.diagnosis.diagnose(upload).await
}

/// Reads the first `image` file part fully into memory, skipping any other parts.
///
/// A part named `image` without a filename is a plain form value, not an upload.
async fn read_image_field(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<ImageUpload>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() != Some(IMAGE_FIELD) || field.file_name().is_none() {
            continue;
        }

        let mime_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(read_error)?;

        if bytes.len() > max_bytes {
            tracing::warn!(
                image_bytes = bytes.len(),
                max_bytes,
                "Uploaded image exceeds size limit"
            );
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Failed to read uploaded image: image is {} bytes, limit is {} bytes",
                bytes.len(),
                max_bytes
            )));
        }

        return Ok(Some(ImageUpload::new(bytes.to_vec(), mime_type.as_deref())));
    }

    Ok(None)
}

fn no_image() -> AppError {
    AppError::BadRequest(anyhow::anyhow!(NO_IMAGE_MESSAGE))
}

fn read_error(err: MultipartError) -> AppError {
    tracing::warn!(error = %err, "Failed to read multipart upload");
    AppError::BadRequest(anyhow::anyhow!("Failed to read uploaded image: {}", err))
}
