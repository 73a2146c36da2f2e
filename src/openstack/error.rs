//! Error types for the OpenStack backend.

use crate::backend::BackendError;
use crate::config::ConfigError;
use thiserror::Error;

/// Errors raised by the OpenStack backend.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum OpenStackBackendError {
    /// Raised when the high-level configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when a request is missing a required field.
    #[error("invalid instance request: {0}")]
    Validation(String),
    /// Raised when the compute API has no instance with the identifier.
    #[error("instance {id} not found")]
    NotFound {
        /// Provider instance identifier.
        id: u64,
    },
    /// Raised when the compute API answers with a non-success status.
    #[error("compute API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
    /// Raised when a response body cannot be decoded.
    #[error("failed to decode compute API response: {message}")]
    Decode {
        /// Decoder error message.
        message: String,
    },
    /// Raised when the request never produced a response.
    #[error("compute API request failed: {message}")]
    Transport {
        /// Transport error message.
        message: String,
    },
}

impl From<reqwest::Error> for OpenStackBackendError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode {
                message: value.to_string(),
            }
        } else {
            Self::Transport {
                message: value.to_string(),
            }
        }
    }
}

impl From<BackendError> for OpenStackBackendError {
    fn from(value: BackendError) -> Self {
        match value {
            BackendError::Validation(field) => Self::Validation(field),
        }
    }
}

impl From<ConfigError> for OpenStackBackendError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
