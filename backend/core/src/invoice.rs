use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cost code assigned when the category is absent or not in the table.
pub const UNMAPPED_COST_CODE: &str = "OTHER";

/// The invoice fields as extracted by the model — untrusted, every field
/// optional. Deserialized from the JSON substring of the model reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedInvoice {
    pub vendor: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// The outbound invoice record. Always fully populated regardless of how
/// incomplete the parsed invoice was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInvoice {
    pub vendor: String,
    pub amount: f64,
    pub date: String,
    pub description: String,
    pub cost_code: String,
    /// Passed through unvalidated; may be null.
    pub category: Option<String>,
}

/// Map an extracted category to its accounting cost code.
///
/// Exact, case-sensitive keys. Anything else (including absence) maps to
/// [`UNMAPPED_COST_CODE`].
pub fn cost_code_for(category: Option<&str>) -> &'static str {
    match category {
        Some("Trucking")         => "8306",
        Some("Water Hauling")    => "8305-160",
        Some("Water Disposal")   => "8305-170",
        Some("Labour")           => "8301",
        Some("Equipment Rental") => "8302",
        Some("Fuel")             => "8303",
        Some("Chemicals")        => "8307",
        Some("Maintenance")      => "8401",
        Some("Supplies")         => "8403",
        _                        => UNMAPPED_COST_CODE,
    }
}

impl NormalizedInvoice {
    /// Normalize a parsed invoice, defaulting each field independently.
    ///
    /// Empty strings count as absent, so a model that returns `""` for a
    /// field gets the same default as one that returns `null`. `today`
    /// fills the date when the model could not determine one.
    pub fn from_parsed(parsed: ParsedInvoice, today: NaiveDate) -> Self {
        let cost_code = cost_code_for(parsed.category.as_deref()).to_string();
        Self {
            vendor: non_empty(parsed.vendor).unwrap_or_else(|| "Unknown Vendor".to_string()),
            amount: parsed.amount.unwrap_or(0.0),
            date: non_empty(parsed.date).unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
            description: non_empty(parsed.description).unwrap_or_default(),
            cost_code,
            category: parsed.category,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
