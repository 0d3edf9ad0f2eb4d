pub mod error;
pub mod invoice;
pub mod traits;

pub use error::InvoiceError;
pub use invoice::{cost_code_for, NormalizedInvoice, ParsedInvoice, UNMAPPED_COST_CODE};
pub use traits::{ExtractionProvider, ExtractionReply, ExtractionRequest};
