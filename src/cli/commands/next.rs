use anyhow::Result;
use irq_lib::SimpleScheduler;

use super::Context;

/// Execute the next command: rotate the active queue and persist it.
///
/// # Errors
///
/// Returns an error when the active queue cannot be resolved, loaded, or
/// saved.
pub fn execute(ctx: &mut Context) -> Result<()> {
    let queue_path = ctx.active_queue()?;
    let store = ctx.store();
    let mut state = store.load_queue(&queue_path)?;

    if state.items.is_empty() {
        println!("Queue is empty.");
        return Ok(());
    }

    let label = SimpleScheduler::next(&mut state).map(irq_lib::QueueItem::display_label);
    store.save_queue(&queue_path, &state)?;

    if let Some(label) = label {
        println!("Now reading: {label}");
    }

    Ok(())
}
