use anyhow::Result;
use irq_lib::SimpleScheduler;

use super::Context;
use crate::format;

/// Execute the current command: show the head of the active queue and
/// its saved reading position.
///
/// # Errors
///
/// Returns an error when the active queue cannot be resolved or loaded.
pub fn execute(ctx: &mut Context) -> Result<()> {
    let queue_path = ctx.active_queue()?;
    let state = ctx.store().load_queue(&queue_path)?;

    match SimpleScheduler::current(&state) {
        Some(item) => {
            println!("{}", format::format_item_line(item));
            println!("{}", format::format_reading_position(&item.reading_position));
        }
        None => println!("Queue is empty."),
    }

    Ok(())
}
