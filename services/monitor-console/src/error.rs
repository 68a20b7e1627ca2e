//! Error types for the monitor console

/// Errors that can occur in the monitor console
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed payload: {0}")]
    Payload(String),

    #[error("Unknown command: {0}")]
    Command(String),

    #[error("Login abandoned after {attempts} attempt(s)")]
    LoginAbandoned { attempts: u32 },
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
