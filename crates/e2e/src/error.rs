//! Error types for the API harness

use thiserror::Error;

use crate::state::EntityKey;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response ({expected}): {body}")]
    Shape { expected: String, body: String },

    #[error("Missing precondition: {0}")]
    MissingPrecondition(String),

    #[error("Group '{group}' reads {key} but no earlier group writes it")]
    InvalidPlan { group: String, key: EntityKey },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// Build a shape error from the parsed response body
    pub fn shape(expected: impl Into<String>, body: &serde_json::Value) -> Self {
        E2eError::Shape {
            expected: expected.into(),
            body: body.to_string(),
        }
    }

    /// Whether this error means the step never ran
    pub fn is_skip(&self) -> bool {
        matches!(self, E2eError::MissingPrecondition(_))
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
