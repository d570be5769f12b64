use anyhow::{Result, bail};
use irq_lib::SchedulerConfig;

use super::Context;

/// Execute the create command.
///
/// Creates the queue file and makes it the active queue.
///
/// # Errors
///
/// Returns an error when the name is empty, the queue already exists, or
/// the file cannot be written.
pub fn execute(ctx: &mut Context, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Queue name cannot be empty.");
    }

    let store = ctx.store();
    let created = store.create_queue(name, SchedulerConfig::default())?;
    let queue_path = store.resolve_queue_path(name);
    ctx.set_active_queue(queue_path)?;

    println!("Created queue: {}", created.metadata.name);
    Ok(())
}
