use anyhow::Result;
use irq_lib::{CursorPosition, ReadingPosition, SimpleScheduler};

use super::Context;

/// Execute the mark command: save a reading position on the current item
/// of the active queue.
///
/// A cursor is only saved when both `--line` and `--ch` are given; a half
/// cursor counts as none.
///
/// # Errors
///
/// Returns an error when the active queue cannot be resolved, loaded, or
/// saved.
pub fn execute(
    ctx: &mut Context,
    line: Option<u32>,
    ch: Option<u32>,
    scroll: Option<f64>,
) -> Result<()> {
    let queue_path = ctx.active_queue()?;
    let store = ctx.store();
    let state = store.load_queue(&queue_path)?;

    let Some(current) = SimpleScheduler::current(&state) else {
        println!("Queue is empty.");
        return Ok(());
    };
    let item_id = current.id.clone();
    let label = current.display_label();

    let cursor = match (line, ch) {
        (Some(line), Some(ch)) => Some(CursorPosition { line, ch }),
        _ => None,
    };
    let position = ReadingPosition {
        cursor,
        scroll_top: scroll,
    };

    store.update_item(&queue_path, &item_id, |item| {
        item.with_reading_position(position)
    })?;
    println!("Saved reading position for {label}");

    Ok(())
}
