use anyhow::Result;
use irq_lib::util::normalize_path;
use irq_lib::{ItemKind, QueueItem};

use super::Context;
use crate::util::blockref;

/// Add a note item for `file` to the active queue.
///
/// A note that is already queued (by normalized path) is declined with a
/// message rather than an error.
///
/// # Errors
///
/// Returns an error when the active queue cannot be resolved, loaded, or
/// saved.
pub fn execute_note(ctx: &mut Context, file: &str) -> Result<()> {
    let queue_path = ctx.active_queue()?;
    let store = ctx.store();
    let state = store.load_queue(&queue_path)?;

    let normalized = normalize_path(file);
    let duplicate = state.items.iter().any(|item| {
        matches!(item.kind, ItemKind::Note) && normalize_path(&item.file_path) == normalized
    });
    if duplicate {
        println!("Note already exists in queue.");
        return Ok(());
    }

    store.add_item(&queue_path, QueueItem::note(normalized.clone()))?;
    println!("Added note to queue: {normalized}");

    Ok(())
}

/// Add a block item anchored to `line` (1-based) of `file` to the active
/// queue, reusing the line's anchor or minting a fresh one.
///
/// # Errors
///
/// Returns an error when the file cannot be read or rewritten, the line
/// is out of range, or the queue cannot be loaded or saved.
pub fn execute_block(ctx: &mut Context, file: &str, line: usize) -> Result<()> {
    let normalized = normalize_path(file);
    let block_id = blockref::ensure_block_reference(&ctx.vault, &normalized, line)?;

    let queue_path = ctx.active_queue()?;
    let store = ctx.store();
    let state = store.load_queue(&queue_path)?;

    let duplicate = state.items.iter().any(|item| {
        matches!(&item.kind, ItemKind::Block { block_id: existing } if *existing == block_id)
            && normalize_path(&item.file_path) == normalized
    });
    if duplicate {
        println!("Block already exists in queue.");
        return Ok(());
    }

    store.add_item(
        &queue_path,
        QueueItem::block(normalized.clone(), block_id.clone()),
    )?;
    println!("Added block to queue: {normalized}#^{block_id}");

    Ok(())
}
