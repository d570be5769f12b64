//! Error types for `irq-lib`.
//!
//! Every expected failure mode (not-found, conflict, decode, validation,
//! I/O) is an ordinary `QueueError` variant that the store reports through
//! the notification sink before returning. The single fatal variant,
//! [`QueueError::FolderBlocked`], propagates without a notice.

use thiserror::Error;

/// Primary error type for queue store and codec operations.
#[derive(Error, Debug)]
pub enum QueueError {
    // === Not-found ===
    /// No queue file exists at the resolved path.
    #[error("Queue file not found: {path}")]
    QueueNotFound { path: String },

    /// No item with the given id exists in the queue.
    #[error("Queue item not found: {id}")]
    ItemNotFound { id: String },

    // === Conflict ===
    /// A queue file already occupies the target path.
    #[error("Queue already exists: {path}")]
    QueueExists { path: String },

    /// A folder occupies the target path.
    #[error("Queue path points to a folder: {path}")]
    TargetIsFolder { path: String },

    /// An item with the same id is already in the queue.
    #[error("Queue item already exists: {id}")]
    DuplicateItem { id: String },

    // === Decode / validation ===
    /// The file content is not parsable in its encoding at all.
    #[error("Queue file could not be decoded: {path}: {reason}")]
    Decode { path: String, reason: String },

    /// The content parsed but is not a legal queue state.
    #[error("Queue file has invalid schema: {path}: {reason}")]
    InvalidSchema { path: String, reason: String },

    // === I/O ===
    /// Reading the queue file failed.
    #[error("Failed to read queue file: {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Writing the queue file failed.
    #[error("Failed to write queue file: {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    /// Other file system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Fatal ===
    /// A plain file occupies a path segment where a folder is needed.
    /// The external file tree is inconsistent; there is no safe recovery.
    #[error("Cannot create folder because a file exists at {path}")]
    FolderBlocked { path: String },
}

impl QueueError {
    /// True for failures that must propagate instead of being reported
    /// through the notification sink and absorbed by the caller.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::FolderBlocked { .. })
    }

    /// Build an `InvalidSchema` error from collected validation errors.
    #[must_use]
    pub fn invalid_schema(path: impl Into<String>, errors: &[ValidationError]) -> Self {
        let reason = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");

        Self::InvalidSchema {
            path: path.into(),
            reason,
        }
    }
}

/// A single field validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Result type using `QueueError`.
pub type Result<T> = std::result::Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_folder_blocked_is_fatal() {
        assert!(
            QueueError::FolderBlocked {
                path: "notes".to_string()
            }
            .is_fatal()
        );
        assert!(
            !QueueError::QueueNotFound {
                path: "q.irqueue.md".to_string()
            }
            .is_fatal()
        );
        assert!(
            !QueueError::DuplicateItem {
                id: "item-1".to_string()
            }
            .is_fatal()
        );
    }

    #[test]
    fn invalid_schema_joins_validation_errors() {
        let errors = vec![
            ValidationError::new("schemaVersion", "unsupported version 2"),
            ValidationError::new("items[0].id", "cannot be empty"),
        ];
        let error = QueueError::invalid_schema("q.irqueue.md", &errors);
        let text = error.to_string();
        assert!(text.contains("schemaVersion: unsupported version 2"));
        assert!(text.contains("items[0].id: cannot be empty"));
    }
}
