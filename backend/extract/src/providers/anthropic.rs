use std::time::Instant;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use tickbook_core::{ExtractionProvider, ExtractionReply, ExtractionRequest, InvoiceError};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider.
///
/// One outbound request per extraction; no retries and no explicit
/// timeout beyond what the transport inherits from the host.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the Messages API request body: a single user message with an
    /// image block followed by the prompt text block.
    fn request_body(&self, request: &ExtractionRequest) -> Value {
        json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "image",
                        "source": {
                            "type": "base64",
                            "media_type": request.media_type,
                            "data": request.image_base64,
                        }
                    },
                    {
                        "type": "text",
                        "text": request.prompt,
                    }
                ]
            }]
        })
    }
}

#[async_trait]
impl ExtractionProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionReply, InvoiceError> {
        let start = Instant::now();

        debug!(model = %self.model, "Sending extraction request to Anthropic");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(request))
            .send()
            .await
            .context("Anthropic HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body: Value = response.json().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %error_body, "Anthropic API error");
            return Err(upstream_error(status.as_u16(), &error_body));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse Anthropic response")?;

        let text = reply_text(&body)?;

        Ok(ExtractionReply {
            text,
            model: self.model.clone(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Map a non-success status and error body to an upstream error,
/// best-effort reading `error.message` from the body.
fn upstream_error(status: u16, error_body: &Value) -> InvoiceError {
    let message = error_body["error"]["message"]
        .as_str()
        .unwrap_or("Failed to process invoice")
        .to_string();
    InvoiceError::Upstream { status, message }
}

/// Pull the generated text out of a success body. A success reply with no
/// text block is a broken upstream body, not an extraction failure.
fn reply_text(body: &Value) -> Result<String, InvoiceError> {
    body["content"][0]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Anthropic response missing content text").into())
}
