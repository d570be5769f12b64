use anyhow::Result;

use super::Context;

/// Execute the list command. The active queue is marked with `*`.
///
/// # Errors
///
/// Infallible today; kept fallible for uniformity with the other commands.
pub fn execute(ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let paths = store.list_queue_paths();

    if paths.is_empty() {
        println!("No queues found. Create a queue first.");
        return Ok(());
    }

    for path in paths {
        let marker = if ctx.settings.active_queue_path.as_deref() == Some(path.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{marker} {}", store.display_name(&path));
    }

    Ok(())
}
