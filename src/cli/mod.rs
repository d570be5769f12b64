//! Command-line interface for `irq_rust`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use irq_lib::QueueError;

use crate::logging;

/// `irq_rust` (irq) - Round-robin incremental reading queue.
#[derive(Parser, Debug)]
#[command(name = "irq")]
#[command(
    author,
    version,
    about = "Round-robin incremental reading queue (markdown + JSON store)",
    long_about = None,
    after_help = "Queue files are plain text under the vault; edit them by hand if you like."
)]
pub struct Cli {
    /// Vault root directory (queue files live beneath it)
    #[arg(long, global = true, default_value = ".", env = "IRQ_VAULT")]
    pub vault: String,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a queue and make it active
    Create {
        /// Queue name or path
        name: String,
    },

    /// Switch the active queue
    Load {
        /// Queue name or path
        name: String,
    },

    /// List queues in the vault
    List,

    /// Delete a queue file
    Delete {
        /// Queue name or path
        name: String,
    },

    /// Show the status line for the active queue (alias: st)
    #[command(alias = "st")]
    Status,

    /// Show the current item and its saved reading position
    Current,

    /// Rotate to the next item
    Next,

    /// Permanently remove the current item
    Dismiss,

    /// Add a note item for a file
    AddNote {
        /// Vault-relative path of the note
        file: String,
    },

    /// Add a block item anchored to a line of a file
    AddBlock {
        /// Vault-relative path of the note
        file: String,
        /// Line number (1-based); gets a `^anchor` appended if it has none
        line: usize,
    },

    /// Save a reading position on the current item
    Mark {
        /// Cursor line
        #[arg(long)]
        line: Option<u32>,
        /// Cursor column
        #[arg(long)]
        ch: Option<u32>,
        /// Scroll offset from the top
        #[arg(long)]
        scroll: Option<f64>,
    },

    /// Remove an item by id
    Remove {
        /// Item id
        id: String,
    },

    /// Show version information
    Version,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails in an unexpected way. Expected
/// queue failures (not-found, conflicts, decode errors) have already been
/// reported through the notification sink; they exit nonzero without a
/// second message.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    tracing::debug!("vault root: {}", cli.vault);
    let mut ctx = commands::Context::open(&cli.vault);

    let result = match cli.command {
        Some(Commands::Create { name }) => commands::create::execute(&mut ctx, &name),
        Some(Commands::Load { name }) => commands::load::execute(&mut ctx, &name),
        Some(Commands::List) => commands::list::execute(&ctx),
        Some(Commands::Delete { name }) => commands::delete::execute(&mut ctx, &name),
        Some(Commands::Status) => commands::status::execute(&mut ctx),
        Some(Commands::Current) => commands::current::execute(&mut ctx),
        Some(Commands::Next) => commands::next::execute(&mut ctx),
        Some(Commands::Dismiss) => commands::dismiss::execute(&mut ctx),
        Some(Commands::AddNote { file }) => commands::add::execute_note(&mut ctx, &file),
        Some(Commands::AddBlock { file, line }) => {
            commands::add::execute_block(&mut ctx, &file, line)
        }
        Some(Commands::Mark { line, ch, scroll }) => {
            commands::mark::execute(&mut ctx, line, ch, scroll)
        }
        Some(Commands::Remove { id }) => commands::remove::execute(&mut ctx, &id),
        Some(Commands::Version) => {
            println!("irq {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("irq - Incremental reading queue. Use --help for usage.");
            Ok(())
        }
    };

    if let Err(error) = result {
        // Expected store failures were already reported through the
        // notification sink; exit nonzero without printing twice.
        if error
            .downcast_ref::<QueueError>()
            .is_some_and(|e| !e.is_fatal())
        {
            std::process::exit(1);
        }
        return Err(error);
    }

    Ok(())
}
