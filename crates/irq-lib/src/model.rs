//! Core data types for the incremental reading queue.
//!
//! Fields serialize in camelCase so the structured encoding matches the
//! queue documents written by the original plugin. The item sequence order
//! is semantically significant: it IS the rotation order.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::util;

/// The single supported persisted schema version. A mismatch invalidates
/// the whole document; there is no migration logic.
pub const QUEUE_SCHEMA_VERSION: u32 = 1;

/// Scheduling algorithm tag.
///
/// Only round-robin rotation exists today. The tag is persisted so the
/// on-disk shape survives future algorithm variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    #[default]
    Simple,
}

impl SchedulerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
        }
    }

    /// Recognize a persisted kind tag. `None` for anything unknown.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "simple" => Some(Self::Simple),
            _ => None,
        }
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scheduler configuration embedded in queue metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SchedulerConfig {
    pub kind: SchedulerKind,
}

/// Queue-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMetadata {
    /// Opaque unique token assigned at creation, never reassigned.
    pub id: String,
    pub name: String,
    pub scheduler: SchedulerConfig,
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation to the state: rotation, dismissal, item
    /// add/update/remove.
    pub updated_at: DateTime<Utc>,
}

/// A saved cursor location inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line: u32,
    pub ch: u32,
}

/// Where the reader left off inside an item.
///
/// Both halves are independently optional; `None` means "no saved
/// position", never zero. Serialized as explicit `null`s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPosition {
    pub cursor: Option<CursorPosition>,
    pub scroll_top: Option<f64>,
}

/// The variant-specific half of a queue item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    /// A whole note, identified by path alone.
    Note,
    /// A specific `^anchor` inside the note at the item's path.
    #[serde(rename_all = "camelCase")]
    Block { block_id: String },
}

/// One revisitable unit in a queue: a whole note or an anchored block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reading_position: ReadingPosition,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl QueueItem {
    /// Create a fresh note item with no saved reading position.
    #[must_use]
    pub fn note(file_path: impl Into<String>) -> Self {
        Self::with_kind(file_path.into(), ItemKind::Note)
    }

    /// Create a fresh block item with no saved reading position.
    #[must_use]
    pub fn block(file_path: impl Into<String>, block_id: impl Into<String>) -> Self {
        Self::with_kind(
            file_path.into(),
            ItemKind::Block {
                block_id: block_id.into(),
            },
        )
    }

    fn with_kind(file_path: String, kind: ItemKind) -> Self {
        let now = Utc::now();
        Self {
            id: util::generate_id("item", &file_path),
            file_path,
            created_at: now,
            updated_at: now,
            reading_position: ReadingPosition::default(),
            kind,
        }
    }

    /// Return a copy with the given reading position and a bumped
    /// `updated_at`. The receiver is left untouched; whether and where the
    /// copy is persisted is the caller's decision.
    #[must_use]
    pub fn with_reading_position(&self, position: ReadingPosition) -> Self {
        let mut updated = self.clone();
        updated.reading_position = position;
        updated.updated_at = Utc::now();
        updated
    }

    /// Human-facing label: the path for notes, `path#^anchor` for blocks.
    #[must_use]
    pub fn display_label(&self) -> String {
        match &self.kind {
            ItemKind::Note => self.file_path.clone(),
            ItemKind::Block { block_id } => format!("{}#^{}", self.file_path, block_id),
        }
    }
}

/// The root persisted aggregate: metadata plus the ordered item sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueState {
    pub schema_version: u32,
    pub metadata: QueueMetadata,
    pub items: Vec<QueueItem>,
}

impl QueueState {
    /// Create an empty queue with a fresh id and current timestamps.
    #[must_use]
    pub fn new(name: impl Into<String>, scheduler: SchedulerConfig) -> Self {
        let name = name.into();
        let now = Utc::now();

        Self {
            schema_version: QUEUE_SCHEMA_VERSION,
            metadata: QueueMetadata {
                id: util::generate_id("queue", &name),
                name,
                scheduler,
                created_at: now,
                updated_at: now,
            },
            items: Vec::new(),
        }
    }

    /// Bump `metadata.updated_at` to now.
    pub fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }

    /// Validate the state as the single gate before any downstream code
    /// trusts a decoded document.
    ///
    /// Checks the schema version, the metadata id, and per item: id
    /// presence and uniqueness, a non-empty path, a legal block anchor,
    /// and a finite scroll offset. Shape violations (unknown item types,
    /// non-integer cursor fields) never reach this point; the decode step
    /// rejects them first.
    ///
    /// # Errors
    ///
    /// Returns every violation found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.schema_version != QUEUE_SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "schemaVersion",
                format!(
                    "unsupported version {} (expected {QUEUE_SCHEMA_VERSION})",
                    self.schema_version
                ),
            ));
        }

        if self.metadata.id.trim().is_empty() {
            errors.push(ValidationError::new("metadata.id", "cannot be empty"));
        }

        let mut seen_ids = HashSet::new();
        for (index, item) in self.items.iter().enumerate() {
            if item.id.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("items[{index}].id"),
                    "cannot be empty",
                ));
            } else if !seen_ids.insert(item.id.as_str()) {
                errors.push(ValidationError::new(
                    format!("items[{index}].id"),
                    format!("duplicate id {}", item.id),
                ));
            }

            if item.file_path.is_empty() {
                errors.push(ValidationError::new(
                    format!("items[{index}].filePath"),
                    "cannot be empty",
                ));
            }

            if let ItemKind::Block { block_id } = &item.kind {
                if !util::is_valid_block_id(block_id) {
                    errors.push(ValidationError::new(
                        format!("items[{index}].blockId"),
                        "must be a non-empty anchor token",
                    ));
                }
            }

            if let Some(scroll_top) = item.reading_position.scroll_top {
                if !scroll_top.is_finite() {
                    errors.push(ValidationError::new(
                        format!("items[{index}].readingPosition.scrollTop"),
                        "must be finite",
                    ));
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Boolean form of [`Self::validate`]. Never panics.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
