//! Vision model provider abstraction.
//!
//! The gateway talks to exactly one provider per process; the trait exists so
//! tests can swap the network-backed client for a canned one.

pub mod mock;
pub mod openrouter;

use crate::models::ImageUpload;
use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockVisionProvider;
pub use openrouter::OpenRouterProvider;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Upstream answered with a non-success status. `body` is kept verbatim.
    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    /// Upstream answered successfully but not with a chat completion envelope.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// A chat-completion capable model that accepts an inline image.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Sends the system prompt and image as one request and returns the text
    /// of the first choice. Makes exactly one attempt.
    async fn complete(
        &self,
        system_prompt: &str,
        image: &ImageUpload,
    ) -> Result<String, ProviderError>;

    /// Model identifier sent upstream.
    fn model(&self) -> &str;
}
