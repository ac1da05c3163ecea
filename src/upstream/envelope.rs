//! The `{status, message, data}` wrapper used by every upstream response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The only status literal that marks a successful envelope.
pub const SUCCESS_STATUS: &str = "success";

/// Generic upstream envelope. `data` is absent when the field is missing or
/// `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Structurally broken: status other than `"success"`.
    #[error("upstream reported status '{status}': {message}")]
    Rejected { status: String, message: String },

    /// Structurally valid, but nothing to return.
    #[error("upstream response carried no data")]
    NoData,

    /// Payload present but not of the expected shape.
    #[error("upstream data did not match the expected shape: {0}")]
    Malformed(String),
}

/// Check status and payload presence, then convert the payload to `T`.
pub fn validate<T: DeserializeOwned>(envelope: ResponseEnvelope<Value>) -> Result<T, EnvelopeError> {
    if envelope.status != SUCCESS_STATUS {
        return Err(EnvelopeError::Rejected {
            status: envelope.status,
            message: envelope.message.unwrap_or_default(),
        });
    }

    let data = envelope.data.ok_or(EnvelopeError::NoData)?;
    serde_json::from_value(data).map_err(|e| EnvelopeError::Malformed(e.to_string()))
}
