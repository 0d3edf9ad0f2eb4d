//! Invoice extraction: the prompt sent to the inference service, the
//! parsing of its free-text reply, and the provider implementations.

pub mod parse;
pub mod prompt;
pub mod providers;

pub use parse::{parse_invoice_reply, strip_data_url};
pub use prompt::EXTRACTION_PROMPT;
