//! Output formatting for `irq_rust`.
//!
//! Plain text lines only; stdout stays machine-greppable and diagnostics
//! go through tracing on stderr.

mod text;

pub use text::{format_item_line, format_reading_position, format_status_line};
