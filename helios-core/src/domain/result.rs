//! Result, error and envelope types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when the server answered without one
pub const SERVER_ERROR_MESSAGE: &str = "Erro no servidor";

/// Message used when no response was received
pub const NETWORK_ERROR_MESSAGE: &str = "Erro de conexão. Verifique sua internet.";

/// Message used for local failures with nothing better to say
pub const UNKNOWN_ERROR_MESSAGE: &str = "Erro desconhecido";

/// Field-level error map as sent by the backend
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before anything reached the network
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// The backend answered with a non-success status
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        errors: Option<FieldErrors>,
    },

    /// The request was sent but no response came back
    #[error("Erro de conexão. Verifique sua internet.")]
    Network(String),

    /// The response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error not tied to a form field
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: msg.into(),
        }
    }

    /// Create a validation error for a named field
    pub fn invalid_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: msg.into(),
        }
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Status code carried by this error.
    ///
    /// Network failures report 0 and local failures 500, matching what the
    /// dashboard has always shown.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            Self::Network(_) => 0,
            Self::Validation { .. } => 400,
            _ => 500,
        }
    }

    /// True for a 401 returned by the backend
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Normalized error triple handed to presentation code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl From<&Error> for ApiError {
    fn from(error: &Error) -> Self {
        match error {
            Error::Api {
                message,
                status,
                errors,
            } => Self {
                message: message.clone(),
                status_code: *status,
                errors: errors.clone(),
            },
            Error::Validation { field, message } => Self {
                message: message.clone(),
                status_code: 400,
                errors: field
                    .as_ref()
                    .map(|f| HashMap::from([(f.clone(), vec![message.clone()])])),
            },
            Error::Network(_) => Self {
                message: NETWORK_ERROR_MESSAGE.to_string(),
                status_code: 0,
                errors: None,
            },
            other => {
                let message = other.to_string();
                Self {
                    message: if message.is_empty() {
                        UNKNOWN_ERROR_MESSAGE.to_string()
                    } else {
                        message
                    },
                    status_code: 500,
                    errors: None,
                }
            }
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self::from(&error)
    }
}

/// Response wrapper used by every JSON endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl<T> Envelope<T> {
    /// Wrap a payload in a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            data,
            message: None,
            success: Some(true),
        }
    }

    /// Unwrap the payload
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Error body sent by the backend alongside a non-success status
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}
