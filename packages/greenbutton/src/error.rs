//! Error types for the Green Button client.
//!
//! Transport, decoding and addressing failures all surface through
//! `GreenButtonError`. Missing optional XML fields are never errors; they
//! decode to an explicit unset value instead.

use thiserror::Error;

/// Main error type for the Green Button library.
#[derive(Debug, Error)]
pub enum GreenButtonError {
    /// The server answered with a non-success status code.
    #[error("Request to {url} failed with status {status}")]
    RequestFailed { status: u16, url: String },

    /// No registered shape matches the payload inside `<content>`.
    #[error("Unrecognized payload in <content>: found [{}]", .found.join(", "))]
    UnrecognizedPayload { found: Vec<String> },

    /// A link key was requested that the node does not carry.
    #[error("Can't follow '{0}': no such link")]
    UnknownLink(String),

    /// A path builder received identifiers in a combination it can't address.
    #[error("Unsupported identifier combination for {resource}: {}", .given.join(", "))]
    InvalidParameterCombination {
        resource: &'static str,
        given: Vec<&'static str>,
    },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// A field was present but its text could not be converted.
    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Response body exceeded the configured limit.
    #[error("Response too large: {size} bytes (limit {limit})")]
    ResponseTooLarge { size: u64, limit: u64 },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Green Button operations.
pub type Result<T> = std::result::Result<T, GreenButtonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_display() {
        let err = GreenButtonError::RequestFailed {
            status: 404,
            url: "https://example.com/espi/1_1/resource/UsagePoint/9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request to https://example.com/espi/1_1/resource/UsagePoint/9 failed with status 404"
        );
    }

    #[test]
    fn test_unrecognized_payload_lists_found_tags() {
        let err = GreenButtonError::UnrecognizedPayload {
            found: vec!["Subscription".to_string(), "Other".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unrecognized payload in <content>: found [Subscription, Other]"
        );
    }

    #[test]
    fn test_invalid_parameter_combination_display() {
        let err = GreenButtonError::InvalidParameterCombination {
            resource: "IntervalBlock",
            given: vec!["subscription_id"],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported identifier combination for IntervalBlock: subscription_id"
        );
    }
}
