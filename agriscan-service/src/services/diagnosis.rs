//! The diagnose operation: one image in, one model call, one result out.

use crate::models::{Diagnosis, ImageUpload};
use crate::prompt::DIAGNOSTIC_PROMPT;
use crate::services::providers::{ProviderError, VisionProvider};
use service_core::error::AppError;
use std::sync::Arc;

pub const NO_IMAGE_MESSAGE: &str = "No image uploaded";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to get response from OpenRouter";
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "Unexpected response format";

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::ApiError { body, .. } => AppError::upstream(UPSTREAM_FAILURE_MESSAGE, body),
            ProviderError::NetworkError(msg) => AppError::upstream(UPSTREAM_FAILURE_MESSAGE, msg),
            ProviderError::MalformedResponse(msg) => {
                AppError::upstream(UNEXPECTED_FORMAT_MESSAGE, msg)
            }
            ProviderError::NotConfigured(msg) => AppError::InternalError(anyhow::anyhow!(msg)),
        }
    }
}

/// Stateless between requests; cloning shares the provider.
#[derive(Clone)]
pub struct DiagnosisService {
    provider: Arc<dyn VisionProvider>,
}

impl DiagnosisService {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Forwards the upload to the model and interprets its answer.
    ///
    /// Answers that are not JSON come back as [`Diagnosis::Raw`] rather than an error.
    pub async fn diagnose(&self, upload: ImageUpload) -> Result<Diagnosis, AppError> {
        if upload.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(NO_IMAGE_MESSAGE)));
        }

        let content = self
            .provider
            .complete(DIAGNOSTIC_PROMPT, &upload)
            .await
            .map_err(|e| {
                tracing::error!(
                    model = %self.provider.model(),
                    error = %e,
                    "Vision model call failed"
                );
                AppError::from(e)
            })?;

        let diagnosis = Diagnosis::from_content(content);

        tracing::info!(
            model = %self.provider.model(),
            image_bytes = upload.len(),
            mime_type = %upload.mime_type,
            kind = %diagnosis.kind(),
            "Leaf diagnosis completed"
        );

        Ok(diagnosis)
    }
}
