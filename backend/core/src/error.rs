use thiserror::Error;

/// Top-level error type for the Tickbook invoice pipeline.
///
/// Every variant terminates the request it occurred in; there are no
/// retries or partial results.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("API key not configured")]
    ApiKeyMissing,

    /// Non-success HTTP status from the inference service. The status is
    /// propagated to the client as-is.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The model reply contained no brace-delimited JSON substring.
    #[error("Could not extract data from invoice")]
    NoJsonFound,

    /// A JSON substring was found but did not parse into an invoice.
    /// The parser's message is surfaced as-is.
    #[error(transparent)]
    ParseFailed(#[from] serde_json::Error),

    /// Transport-level or otherwise unexpected failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InvoiceError {
    /// HTTP status code this error surfaces as.
    pub fn status_code(&self) -> u16 {
        match self {
            InvoiceError::Upstream { status, .. } => *status,
            _ => 500,
        }
    }
}
