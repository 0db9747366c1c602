//! Field-name conversion and small text parsers shared by the schema tables.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a character followed by a capitalized word (`xUri`, `aBill`).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));

/// Matches a lowercase letter or digit followed by an uppercase letter.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Convert an XML tag name to a snake_case field name.
///
/// # Examples
/// ```
/// use greenbutton::naming::to_field_name;
///
/// assert_eq!(to_field_name("MeterReading"), "meter_reading");
/// assert_eq!(to_field_name("dataCustodianBulkRequestURI"), "data_custodian_bulk_request_uri");
/// assert_eq!(to_field_name("client_secret"), "client_secret");
/// ```
pub fn to_field_name(name: &str) -> String {
    let first = CAPITALIZED_WORD.replace_all(name, "${1}_${2}");
    LOWER_UPPER
        .replace_all(&first, "${1}_${2}")
        .to_lowercase()
}

/// Parse a `key=value;key=value` string into ordered pairs.
///
/// A segment without `=` becomes a key with an empty value.
///
/// # Examples
/// ```
/// use greenbutton::naming::parse_pairs;
///
/// assert_eq!(
///     parse_pairs("FB=4_5_15;IntervalDuration=3600"),
///     vec![
///         ("FB".to_string(), "4_5_15".to_string()),
///         ("IntervalDuration".to_string(), "3600".to_string()),
///     ]
/// );
/// ```
pub fn parse_pairs(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (segment.to_string(), String::new()),
        })
        .collect()
}

/// Check whether a text parses as a number.
pub fn is_numeric(text: &str) -> bool {
    text.trim().parse::<f64>().is_ok()
}
