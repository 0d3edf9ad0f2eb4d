use async_trait::async_trait;

use crate::error::InvoiceError;

/// Trait for the multimodal inference service that turns an invoice image
/// into text expected to contain JSON.
///
/// The gateway only talks to this seam, so tests can swap in a mock.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send the image and prompt, returning the model's generated text.
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionReply, InvoiceError>;
}

/// One extraction request: a base64 image plus the instruction prompt.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Base64 image payload, data-URL prefix already stripped. Not
    /// validated here; a malformed payload surfaces as an upstream error.
    pub image_base64: String,
    /// Declared media type of the image.
    pub media_type: String,
    pub prompt: String,
    pub max_tokens: u32,
}

/// Raw reply from the inference service.
#[derive(Debug, Clone)]
pub struct ExtractionReply {
    /// Generated text; may wrap the JSON object in surrounding prose.
    pub text: String,
    pub model: String,
    pub latency_ms: u64,
}
