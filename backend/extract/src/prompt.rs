//! The fixed extraction prompt.
//!
//! Embeds the category taxonomy the cost-code table keys on. Changing a
//! category name here without updating `cost_code_for` breaks the mapping.

pub const EXTRACTION_PROMPT: &str = r#"Extract data from this oilfield invoice/ticket. Return ONLY valid JSON:

{
  "vendor": "company name",
  "amount": number,
  "date": "YYYY-MM-DD",
  "description": "service description",
  "category": "one of: Trucking, Water Hauling, Water Disposal, Labour, Equipment Rental, Fuel, Chemicals, Maintenance, Supplies, Other"
}

Category mapping:
- Water truck, fluid hauling, water transport → "Water Hauling"
- Water disposal, SWD → "Water Disposal"
- Trucking, transportation, hauling (non-water) → "Trucking"
- Labour, wages, operator → "Labour"
- Equipment rental, rig rental → "Equipment Rental"
- Fuel, diesel, gas → "Fuel"
- Chemicals, treating → "Chemicals"
- Repairs, maintenance, service → "Maintenance"
- Supplies, parts, materials → "Supplies"

Use null if field cannot be determined. Be accurate with numbers."#;

/// Token budget for the model reply.
pub const MAX_TOKENS: u32 = 1024;
