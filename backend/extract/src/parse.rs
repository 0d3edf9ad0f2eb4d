//! Parsing of the model's free-text reply into a [`ParsedInvoice`].

use once_cell::sync::Lazy;
use regex::Regex;

use tickbook_core::{InvoiceError, ParsedInvoice};

/// Greedy brace-delimited match: first `{` through last `}` in the text.
static JSON_BLOB_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Strip a leading data-URL scheme header from a base64 payload.
///
/// Splits at the first comma and returns the remainder; a string with no
/// comma is returned as-is. The remainder is not validated as base64.
pub fn strip_data_url(image_base64: &str) -> &str {
    match image_base64.split_once(',') {
        Some((_, rest)) => rest,
        None => image_base64,
    }
}

/// Extract and parse the JSON object embedded in a model reply.
///
/// Distinguishes two failures: no brace-delimited substring at all
/// ([`InvoiceError::NoJsonFound`]) versus a substring that is not valid
/// invoice JSON ([`InvoiceError::ParseFailed`]).
pub fn parse_invoice_reply(text: &str) -> Result<ParsedInvoice, InvoiceError> {
    let blob = JSON_BLOB_PATTERN
        .find(text)
        .ok_or(InvoiceError::NoJsonFound)?;
    let parsed = serde_json::from_str(blob.as_str())?;
    Ok(parsed)
}
