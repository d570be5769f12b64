use anyhow::Result;

use super::Context;

/// Execute the delete command. Deleting the active queue clears the
/// active selection.
///
/// # Errors
///
/// Returns an error when no queue file exists at the resolved path.
pub fn execute(ctx: &mut Context, name: &str) -> Result<()> {
    let store = ctx.store();
    let queue_path = store.resolve_queue_path(name);
    store.delete_queue(name)?;

    if ctx.settings.active_queue_path.as_deref() == Some(queue_path.as_str()) {
        ctx.settings.active_queue_path = None;
        ctx.settings.save(&ctx.vault)?;
    }

    println!("Deleted queue: {}", store.display_name(&queue_path));
    Ok(())
}
