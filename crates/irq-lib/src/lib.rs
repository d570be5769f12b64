//! `irq-lib` — Incremental reading queue core.
//!
//! An ordered, persistent queue of notes (or anchored blocks inside
//! notes), rotated round-robin, with the exact reading position where the
//! reader left off remembered per item. Queues persist as human-editable
//! markdown documents (header block + pipe table) or as structured JSON;
//! both decode paths end in the same validator.
//!
//! # Quick Start
//!
//! ```no_run
//! use irq_lib::{DiskVault, QueueItem, QueueStore, SchedulerConfig, SimpleScheduler, StderrSink};
//!
//! let store = QueueStore::new(DiskVault::new("."), StderrSink, "IncrementalReading");
//!
//! // Create a queue and put something on it
//! store.create_queue("daily", SchedulerConfig::default()).unwrap();
//! store.add_item("daily", QueueItem::note("notes/a.md")).unwrap();
//!
//! // Rotate and persist
//! let mut state = store.load_queue("daily").unwrap();
//! SimpleScheduler::next(&mut state);
//! store.save_queue("daily", &state).unwrap();
//! ```

pub mod error;
pub mod json;
pub mod markdown;
pub mod model;
pub mod scheduler;
pub mod store;
pub mod util;
pub mod vault;

pub use error::{QueueError, Result, ValidationError};
pub use model::{
    CursorPosition, ItemKind, QUEUE_SCHEMA_VERSION, QueueItem, QueueMetadata, QueueState,
    ReadingPosition, SchedulerConfig, SchedulerKind,
};
pub use scheduler::SimpleScheduler;
pub use store::{QUEUE_FILE_EXTENSION, QUEUE_FILE_EXTENSION_JSON, QueueStore};
pub use vault::{DiskVault, EntryKind, NotificationSink, StderrSink, TracingSink, Vault};
