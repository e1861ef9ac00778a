//! Error types for the farm dashboard
//!
//! Centralized error handling using snafu for ergonomic error definitions.
//! Every failure a chart can hit is folded into one of these variants and
//! converted to a single user-facing message at the controller boundary.

use snafu::Snafu;

/// Message shown when the browser reports no connectivity or the request never reached the server
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to connect to the server. Please check your internet connection and try again.";

/// Message shown when the endpoint answered but had no records for the date
pub const EMPTY_RESULT_MESSAGE: &str =
    "No data available for the selected date. Try selecting a different date.";

/// Fallback when the endpoint flags an error without a message
pub const APPLICATION_FALLBACK_MESSAGE: &str = "An error occurred while loading data";

/// Main error type for the application
#[derive(Debug, Snafu)]
pub enum Error {
    /// Missing or invalid page configuration (e.g. company id)
    #[snafu(display("Configuration error: {message}"))]
    Configuration { message: String },

    /// Network failure before a response was received
    #[snafu(display("Network error: {message}"))]
    Transport { message: String, connectivity: bool },

    /// Non-2xx HTTP response
    #[snafu(display("HTTP error {status}: {message}"))]
    Http { status: u16, message: String },

    /// The endpoint itself reported `error: true`
    #[snafu(display("Server error: {}", message.as_deref().unwrap_or(APPLICATION_FALLBACK_MESSAGE)))]
    Application { message: Option<String> },

    /// Request succeeded but returned zero usable records
    #[snafu(display("No data available"))]
    EmptyResult,

    /// Response body did not have the expected shape
    #[snafu(display("Malformed response: {message}"))]
    MalformedResponse { message: String },

    /// Invalid input or configuration value
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (config files, log directory)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl Error {
    /// Shorthand for a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error came from the network layer
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Error::Transport {
                connectivity: true,
                ..
            }
        )
    }

    /// Human-readable message for the chart error panel.
    ///
    /// `online` mirrors the browser's connectivity flag; when it is false any
    /// transport failure is reported as a connection problem.
    pub fn user_message(&self, online: bool) -> String {
        match self {
            Error::Configuration { message } => message.clone(),
            Error::Transport { .. } if !online || self.is_connectivity() => {
                CONNECTIVITY_MESSAGE.to_string()
            }
            Error::Http { .. } if !online => CONNECTIVITY_MESSAGE.to_string(),
            Error::Transport { message, .. } => format!("Failed to load data: {message}"),
            Error::Http { status, message } => {
                format!("Failed to load data: HTTP {status} {message}")
            }
            Error::Application { message } => message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| APPLICATION_FALLBACK_MESSAGE.to_string()),
            Error::EmptyResult => EMPTY_RESULT_MESSAGE.to_string(),
            Error::MalformedResponse { .. } | Error::Json { .. } => {
                "Received invalid data from the server".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        if let Some(status) = source.status() {
            return Error::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("").to_string(),
            };
        }
        if source.is_decode() {
            return Error::MalformedResponse {
                message: source.to_string(),
            };
        }
        Error::Transport {
            connectivity: source.is_connect() || source.is_timeout(),
            message: source.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_transport_is_connectivity_message() {
        let err = Error::Transport {
            message: "Network error".into(),
            connectivity: false,
        };
        assert_eq!(err.user_message(false), CONNECTIVITY_MESSAGE);
        assert_eq!(err.user_message(true), "Failed to load data: Network error");
    }

    #[test]
    fn test_application_message_fallback() {
        let err = Error::Application { message: None };
        assert_eq!(err.user_message(true), APPLICATION_FALLBACK_MESSAGE);

        let err = Error::Application {
            message: Some("Company not found".into()),
        };
        assert_eq!(err.user_message(true), "Company not found");
    }

    #[test]
    fn test_configuration_message_is_specific() {
        let err = Error::configuration("Company ID is not set");
        assert_eq!(err.user_message(true), "Company ID is not set");
    }
}
