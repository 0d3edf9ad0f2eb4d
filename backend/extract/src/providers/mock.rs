use async_trait::async_trait;

use tickbook_core::{ExtractionProvider, ExtractionReply, ExtractionRequest, InvoiceError};

/// A mock extraction provider that returns a canned reply, or a canned
/// upstream error. Used by the gateway tests.
pub struct MockProvider {
    reply_text: String,
    upstream_error: Option<(u16, String)>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            reply_text: String::new(),
            upstream_error: None,
        }
    }

    pub fn with_reply(mut self, text: impl Into<String>) -> Self {
        self.reply_text = text.into();
        self
    }

    pub fn with_upstream_error(mut self, status: u16, message: impl Into<String>) -> Self {
        self.upstream_error = Some((status, message.into()));
        self
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, _request: &ExtractionRequest) -> Result<ExtractionReply, InvoiceError> {
        if let Some((status, message)) = &self.upstream_error {
            return Err(InvoiceError::Upstream {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(ExtractionReply {
            text: self.reply_text.clone(),
            model: "mock".to_string(),
            latency_ms: 0,
        })
    }
}
