//! Text formatting functions for `irq_rust`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - The status line (`IR | queue | count | current`)
//! - Item summary lines
//! - Reading position descriptions

use irq_lib::{ItemKind, QueueItem, ReadingPosition};

/// Format the status line for a queue: `IR | {queue} | {count} | {label}`.
#[must_use]
pub fn format_status_line(queue_name: &str, item_count: usize, current_label: &str) -> String {
    format!("IR | {queue_name} | {item_count} | {current_label}")
}

/// Format a single-line item summary.
///
/// Format: `{id} [{type}] {label}`
#[must_use]
pub fn format_item_line(item: &QueueItem) -> String {
    let badge = match &item.kind {
        ItemKind::Note => "note",
        ItemKind::Block { .. } => "block",
    };
    format!("{} [{badge}] {}", item.id, item.display_label())
}

/// Describe a saved reading position, or its absence.
#[must_use]
pub fn format_reading_position(position: &ReadingPosition) -> String {
    let mut parts = Vec::new();

    if let Some(cursor) = position.cursor {
        parts.push(format!("line {}, col {}", cursor.line, cursor.ch));
    }
    if let Some(scroll_top) = position.scroll_top {
        parts.push(format!("scroll {scroll_top}"));
    }

    if parts.is_empty() {
        "no saved position".to_string()
    } else {
        parts.join(", ")
    }
}
