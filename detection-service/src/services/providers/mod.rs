//! Vision provider abstractions and implementations.
//!
//! Detection and asset generation talk to the model through
//! [`VisionProvider`], so the Gemini backend can be swapped for the mock in
//! tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Image sent alongside the prompt.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Output modality requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Text,
    Image,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Text => "TEXT",
            Modality::Image => "IMAGE",
        }
    }
}

/// Generation parameters for a request.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// JSON schema for structured output.
    pub response_schema: Option<serde_json::Value>,

    /// Requested output modalities; empty leaves the model default.
    pub response_modalities: Vec<Modality>,
}

/// Result of a provider call.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    /// First text part of the reply.
    pub text: Option<String>,

    /// First inline image of the reply, decoded.
    pub image: Option<Vec<u8>>,

    pub input_tokens: i32,
    pub output_tokens: i32,
}

/// A multimodal model that answers a prompt about one image.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        image: &ImageInput,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
