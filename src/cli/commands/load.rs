use anyhow::Result;

use super::Context;

/// Execute the load command: switch the active queue.
///
/// # Errors
///
/// Returns an error when the queue does not exist or cannot be decoded.
pub fn execute(ctx: &mut Context, name: &str) -> Result<()> {
    let store = ctx.store();
    let state = store.load_queue(name)?;
    let queue_path = store.resolve_queue_path(name);
    let display = store.display_name(&queue_path);
    ctx.set_active_queue(queue_path)?;

    println!("Loaded queue: {display} ({} items)", state.items.len());
    Ok(())
}
