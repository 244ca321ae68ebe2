//! Error types for the football-data client

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the football-data API
#[derive(Debug, Error)]
pub enum FootballDataError {
    /// Client configuration is invalid (bad base URL, unusable token)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status} for {url}: {body}")]
    Upstream {
        status: StatusCode,
        url: String,
        body: String,
    },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Requested standings group is not part of the league table
    #[error("Standings group not found: {0}")]
    GroupNotFound(String),
}

/// Convenience Result type for the client.
pub type Result<T> = std::result::Result<T, FootballDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message_includes_status_and_url() {
        let err = FootballDataError::Upstream {
            status: StatusCode::FORBIDDEN,
            url: "https://x.test/v1/teams/57".to_string(),
            body: "{\"error\":\"denied\"}".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("https://x.test/v1/teams/57"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_decode_error_converts_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: FootballDataError = parse_err.into();
        assert!(matches!(err, FootballDataError::Decode(_)));
    }

    #[test]
    fn test_group_not_found_message() {
        let err = FootballDataError::GroupNotFound("GROUP_Z".to_string());
        assert_eq!(err.to_string(), "Standings group not found: GROUP_Z");
    }
}
