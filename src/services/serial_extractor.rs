use once_cell::sync::Lazy;
use regex::Regex;

// ASCII digits only: `\d` would also accept other Unicode digits that do not
// parse as an integer.
static SERIAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SNo:\s*([0-9]+)").expect("serial pattern is a valid regex"));

/// Returns the ticket serial number from the first `SNo: <digits>` in `data`.
///
/// A digit run too large for an `i64` counts as no serial.
pub fn extract_serial_number(data: &str) -> Option<i64> {
    SERIAL_PATTERN
        .captures(data)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
