//! Command implementations.
//!
//! Each command module exposes an `execute` function taking the shared
//! [`Context`]: the vault, its settings, and the queue store built from
//! them.

pub mod add;
pub mod create;
pub mod current;
pub mod delete;
pub mod dismiss;
pub mod list;
pub mod load;
pub mod mark;
pub mod next;
pub mod remove;
pub mod status;

use anyhow::Result;
use irq_lib::{DiskVault, QueueStore, TracingSink};

use crate::config::{self, Settings};

/// Shared command context: the vault and its settings.
pub struct Context {
    pub vault: DiskVault,
    pub settings: Settings,
}

impl Context {
    /// Open the vault at `root` and load its settings.
    #[must_use]
    pub fn open(root: &str) -> Self {
        let vault = DiskVault::new(root);
        let settings = Settings::load(&vault);
        Self { vault, settings }
    }

    /// Build a queue store over the vault. Store notices go through
    /// tracing, which the logging setup routes to stderr.
    #[must_use]
    pub fn store(&self) -> QueueStore<DiskVault, TracingSink> {
        QueueStore::new(
            self.vault.clone(),
            TracingSink,
            self.settings.queue_folder.clone(),
        )
    }

    /// The active queue path, creating and activating the default queue
    /// when nothing usable is configured.
    ///
    /// # Errors
    ///
    /// Fails when the default queue cannot be created or settings cannot
    /// be saved.
    pub fn active_queue(&mut self) -> Result<String> {
        let store = self.store();
        config::ensure_active_queue(&mut self.settings, &self.vault, &store)
    }

    /// Persist the active queue selection.
    ///
    /// # Errors
    ///
    /// Fails when the settings file cannot be written.
    pub fn set_active_queue(&mut self, queue_path: String) -> Result<()> {
        self.settings.active_queue_path = Some(queue_path);
        self.settings.save(&self.vault)
    }
}
