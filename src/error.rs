//! Error handling for the heater datapoint cache.

/// A specialized `Result` type for heater operations.
pub type Result<T> = std::result::Result<T, HeaterError>;

/// The main error type for the heater service.
///
/// Soft data-quality problems (unknown addresses on the bus, renderings that
/// had to be truncated) are logged and never surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum HeaterError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two datapoints were registered under the same name
    #[error("Datapoint '{0}' is already registered")]
    DuplicateDatapoint(String),

    /// Datapoint table or other input could not be parsed
    #[error("Failed to parse: {0}")]
    ParseError(String),

    /// Protocol engine rejected a request
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HeaterError {
    /// Create a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a new protocol error
    pub fn protocol_error(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
