use anyhow::Result;

use super::Context;

/// Execute the remove command: drop an item from the active queue by id.
///
/// # Errors
///
/// Returns an error when the item id is unknown or the queue cannot be
/// loaded or saved.
pub fn execute(ctx: &mut Context, id: &str) -> Result<()> {
    let queue_path = ctx.active_queue()?;
    let state = ctx.store().remove_item(&queue_path, id)?;

    println!("Removed item {id} ({} items left)", state.items.len());
    Ok(())
}
