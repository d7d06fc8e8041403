use thiserror::Error;

/// Errors produced by the remote binding.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("Platform API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A response body did not match the expected shape.
    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client configuration could not be turned into request headers.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RemoteError>;
