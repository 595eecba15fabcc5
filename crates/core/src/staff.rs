//! Staff roster offered by the staff selector.
//!
//! The roster only populates the selector; submitted names are not checked
//! against it.

/// Staff members listed when no roster is configured.
pub const DEFAULT_STAFF: &[&str] = &["金城暁", "兼次勇一"];

/// Parse a comma-separated roster, dropping blanks and duplicates while
/// keeping first-seen order. Falls back to [`DEFAULT_STAFF`] when empty.
pub fn parse_roster(raw: &str) -> Vec<String> {
    let mut roster: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !roster.iter().any(|n| n == name) {
            roster.push(name.to_string());
        }
    }
    if roster.is_empty() {
        return default_roster();
    }
    roster
}

pub fn default_roster() -> Vec<String> {
    DEFAULT_STAFF.iter().map(|s| s.to_string()).collect()
}
