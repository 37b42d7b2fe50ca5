//! Mock provider implementation for testing.

use super::{ProviderError, VisionProvider};
use crate::models::ImageUpload;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Canned outcome returned by [`MockVisionProvider`] on every call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Content(String),
    ApiError { status: u16, body: String },
    Malformed(String),
    Network(String),
}

/// Mock vision provider that records every image it receives.
pub struct MockVisionProvider {
    reply: MockReply,
    received: Mutex<Vec<ImageUpload>>,
}

impl MockVisionProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self::new(MockReply::Content(content.into()))
    }

    /// Images passed to `complete`, in call order.
    pub async fn received(&self) -> Vec<ImageUpload> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn complete(
        &self,
        _system_prompt: &str,
        image: &ImageUpload,
    ) -> Result<String, ProviderError> {
        self.received.lock().await.push(image.clone());

        match &self.reply {
            MockReply::Content(content) => Ok(content.clone()),
            MockReply::ApiError { status, body } => Err(ProviderError::ApiError {
                status: *status,
                body: body.clone(),
            }),
            MockReply::Malformed(msg) => Err(ProviderError::MalformedResponse(msg.clone())),
            MockReply::Network(msg) => Err(ProviderError::NetworkError(msg.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock-vision"
    }
}
