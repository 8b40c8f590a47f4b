//! Error types and handling.

use reqwest::StatusCode;
use thiserror::Error;

/// Fallback shown when the server gives no usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Shown for any failed image upload.
pub const UPLOAD_FAILURE: &str = "Image upload failed";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport failure (connection refused, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-OK response from the API
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Image upload failed
    #[error("Upload error: {0}")]
    Upload(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excel export error
    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a decode error with message
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an upload error with message
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Text to show the user for this error.
    ///
    /// Server-reported messages are passed through verbatim, uploads get their
    /// own text, everything else collapses to [`GENERIC_FAILURE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                message: Some(message), ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Upload(_) => UPLOAD_FAILURE.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
