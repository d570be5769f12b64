//! Vault settings for `irq_rust`.
//!
//! Settings are one JSON document at `.irq/settings.json` under the vault
//! root: the queue folder and the path of the active queue. A missing or
//! unreadable settings file falls back to defaults rather than failing.

use anyhow::{Context as _, Result};
use irq_lib::{DiskVault, EntryKind, NotificationSink, QueueStore, SchedulerConfig, Vault};
use serde::{Deserialize, Serialize};

/// Folder queue files live under when not configured otherwise.
pub const DEFAULT_QUEUE_FOLDER: &str = "IncrementalReading";

/// Name of the queue created when none is active.
pub const DEFAULT_QUEUE_NAME: &str = "default";

const SETTINGS_FOLDER: &str = ".irq";
const SETTINGS_PATH: &str = ".irq/settings.json";

/// Persisted CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub queue_folder: String,
    pub active_queue_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            queue_folder: DEFAULT_QUEUE_FOLDER.to_string(),
            active_queue_path: None,
        }
    }
}

impl Settings {
    /// Load settings from the vault, falling back to defaults when the
    /// settings file is missing or unreadable.
    #[must_use]
    pub fn load(vault: &DiskVault) -> Self {
        vault
            .read(SETTINGS_PATH)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Persist settings to the vault.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings folder or file cannot be written.
    pub fn save(&self, vault: &DiskVault) -> Result<()> {
        if vault.entry_kind(SETTINGS_FOLDER).is_none() {
            vault
                .create_folder(SETTINGS_FOLDER)
                .with_context(|| format!("failed to create {SETTINGS_FOLDER}"))?;
        }

        let serialized = serde_json::to_string_pretty(self)?;
        let result = match vault.entry_kind(SETTINGS_PATH) {
            Some(EntryKind::File) => vault.modify(SETTINGS_PATH, &serialized),
            _ => vault.create(SETTINGS_PATH, &serialized),
        };
        result.with_context(|| format!("failed to write {SETTINGS_PATH}"))
    }
}

/// Resolve the active queue path, creating and activating the `default`
/// queue when nothing usable is configured. The chosen path is saved back
/// to the settings file.
///
/// # Errors
///
/// Returns an error when the fallback queue cannot be created or the
/// settings cannot be saved.
pub fn ensure_active_queue<V: Vault, N: NotificationSink>(
    settings: &mut Settings,
    vault: &DiskVault,
    store: &QueueStore<V, N>,
) -> Result<String> {
    if let Some(path) = &settings.active_queue_path {
        if store.queue_exists(path) {
            return Ok(path.clone());
        }
    }

    let default_path = store.resolve_queue_path(DEFAULT_QUEUE_NAME);
    if !store.queue_exists(&default_path) {
        store.create_queue(DEFAULT_QUEUE_NAME, SchedulerConfig::default())?;
    }

    settings.active_queue_path = Some(default_path.clone());
    settings.save(vault)?;
    Ok(default_path)
}
