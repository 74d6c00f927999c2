//! Mock provider for testing.

use super::{GenerationParams, ImageInput, ProviderError, ProviderResponse, VisionProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Canned behaviour of [`MockVisionProvider`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Image(Vec<u8>),
    Empty,
    Fail(String),
}

/// Mock vision provider returning a fixed reply and recording calls.
pub struct MockVisionProvider {
    reply: MockReply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockVisionProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn generate(
        &self,
        prompt: &str,
        _image: &ImageInput,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        let input_tokens = prompt.len() as i32 / 4;
        match &self.reply {
            MockReply::Text(text) => Ok(ProviderResponse {
                text: Some(text.clone()),
                input_tokens,
                output_tokens: text.len() as i32 / 4,
                ..Default::default()
            }),
            MockReply::Image(bytes) => Ok(ProviderResponse {
                text: Some("Generated texture".to_string()),
                image: Some(bytes.clone()),
                input_tokens,
                output_tokens: 1000,
            }),
            MockReply::Empty => Ok(ProviderResponse {
                input_tokens,
                ..Default::default()
            }),
            MockReply::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
