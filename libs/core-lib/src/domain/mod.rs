pub mod adoption;
pub mod breed;
pub mod cat;
pub mod user;

/// Placeholder shown when a related record is missing.
pub const UNKNOWN: &str = "Unknown";

/// Resolves an optional display value, falling back to [`UNKNOWN`].
pub fn display_or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNKNOWN.to_string())
}
