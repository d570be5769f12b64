//! Structured JSON codec for queue files.
//!
//! Pretty-printed with two-space indent, matching the `.irqueue.json`
//! documents written by the original plugin. Decoding keeps three failure
//! classes distinguishable: not JSON at all, JSON but not queue-shaped,
//! and queue-shaped but semantically invalid.

use crate::error::{QueueError, Result};
use crate::model::QueueState;

/// Serialize a queue state to the structured encoding.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn encode(state: &QueueState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Decode and validate a queue state from the structured encoding.
///
/// `path` is carried for error context only.
///
/// # Errors
///
/// `Decode` when the text is not JSON; `InvalidSchema` when it is JSON but
/// not a well-formed queue state, or when it fails validation (e.g. an
/// unsupported schema version).
pub fn decode(path: &str, raw: &str) -> Result<QueueState> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| QueueError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    let state: QueueState =
        serde_json::from_value(value).map_err(|e| QueueError::InvalidSchema {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    state
        .validate()
        .map_err(|errors| QueueError::invalid_schema(path, &errors))?;

    Ok(state)
}
