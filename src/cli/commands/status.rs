use anyhow::Result;
use irq_lib::SimpleScheduler;

use super::Context;
use crate::format;

/// Execute the status command: print the `IR | queue | count | current`
/// line for the active queue.
///
/// # Errors
///
/// Returns an error when the active queue cannot be resolved or loaded.
pub fn execute(ctx: &mut Context) -> Result<()> {
    let queue_path = ctx.active_queue()?;
    let store = ctx.store();
    let state = store.load_queue(&queue_path)?;

    let current_label = SimpleScheduler::current(&state)
        .map_or_else(|| "None".to_string(), irq_lib::QueueItem::display_label);

    println!(
        "{}",
        format::format_status_line(
            &store.display_name(&queue_path),
            state.items.len(),
            &current_label,
        )
    );

    Ok(())
}
