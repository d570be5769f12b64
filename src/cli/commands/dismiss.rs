use anyhow::Result;
use irq_lib::SimpleScheduler;

use super::Context;

/// Execute the dismiss command: permanently remove the current item from
/// the active queue and persist.
///
/// # Errors
///
/// Returns an error when the active queue cannot be resolved, loaded, or
/// saved.
pub fn execute(ctx: &mut Context) -> Result<()> {
    let queue_path = ctx.active_queue()?;
    let store = ctx.store();
    let mut state = store.load_queue(&queue_path)?;

    let Some(removed) = SimpleScheduler::dismiss_current(&mut state) else {
        println!("Queue is empty.");
        return Ok(());
    };

    store.save_queue(&queue_path, &state)?;
    println!("Dismissed: {}", removed.display_label());

    match SimpleScheduler::current(&state) {
        Some(next) => println!("Now reading: {}", next.display_label()),
        None => println!("Queue is now empty."),
    }

    Ok(())
}
