//! Queue persistence: path resolution, whole-document load/save, and
//! item-level CRUD with duplicate/missing-id detection.
//!
//! Every operation is an independent resolve → read → mutate → write pass
//! over the whole document. There is no cross-call transaction: two
//! concurrent writers against the same queue race last-write-wins, an
//! accepted property of the model rather than a bug to paper over.

use chrono::Utc;

use crate::error::{QueueError, Result};
use crate::json;
use crate::markdown;
use crate::model::{QueueItem, QueueState, SchedulerConfig};
use crate::util;
use crate::vault::{EntryKind, NotificationSink, Vault};

/// Extension of the human-editable markdown encoding. New queues are
/// written in this form.
pub const QUEUE_FILE_EXTENSION: &str = ".irqueue.md";

/// Extension of the structured JSON encoding.
pub const QUEUE_FILE_EXTENSION_JSON: &str = ".irqueue.json";

/// Persistent queue store over an abstract vault.
///
/// Queue identity is content-addressed by normalized path under the queue
/// folder; there is no internal registry. The encoding is chosen by file
/// extension, so both queue flavors can coexist in one folder.
pub struct QueueStore<V, N> {
    vault: V,
    sink: N,
    queue_folder: String,
}

impl<V: Vault, N: NotificationSink> QueueStore<V, N> {
    /// Create a store over `vault`, reporting failures to `sink`, with
    /// queue files under `queue_folder`.
    pub fn new(vault: V, sink: N, queue_folder: impl Into<String>) -> Self {
        Self {
            vault,
            sink,
            queue_folder: util::normalize_path(&queue_folder.into()),
        }
    }

    /// Report an expected failure through the sink, then return it.
    /// Fatal errors pass through silently; they are not user notices.
    fn fail<T>(&self, error: QueueError) -> Result<T> {
        if !error.is_fatal() {
            self.sink.notify(&error.to_string());
        }
        Err(error)
    }

    // ========================================================================
    // Paths
    // ========================================================================

    /// Resolve a bare name or path to a normalized path inside the queue
    /// folder, carrying a queue extension.
    #[must_use]
    pub fn resolve_queue_path(&self, name_or_path: &str) -> String {
        let normalized = util::normalize_path(name_or_path);
        let with_extension = if has_queue_extension(&normalized) {
            normalized
        } else {
            format!("{normalized}{QUEUE_FILE_EXTENSION}")
        };

        if with_extension == self.queue_folder
            || with_extension.starts_with(&format!("{}/", self.queue_folder))
        {
            with_extension
        } else {
            util::normalize_path(&format!("{}/{}", self.queue_folder, with_extension))
        }
    }

    /// True iff the resolved path names an existing file (not a folder).
    pub fn queue_exists(&self, name_or_path: &str) -> bool {
        let path = self.resolve_queue_path(name_or_path);
        self.vault.entry_kind(&path) == Some(EntryKind::File)
    }

    /// All queue files under the queue folder, lexicographically ascending.
    #[must_use]
    pub fn list_queue_paths(&self) -> Vec<String> {
        let prefix = format!("{}/", self.queue_folder);
        let mut paths: Vec<String> = self
            .vault
            .list_files()
            .into_iter()
            .filter(|path| has_queue_extension(path))
            .filter(|path| path.starts_with(&prefix))
            .collect();
        paths.sort();
        paths
    }

    /// Strip the queue folder prefix and queue extension from a path.
    #[must_use]
    pub fn display_name(&self, queue_path: &str) -> String {
        let normalized = util::normalize_path(queue_path);
        let prefix = format!("{}/", self.queue_folder);
        let relative = normalized.strip_prefix(&prefix).unwrap_or(&normalized);
        strip_queue_extension(relative).to_string()
    }

    // ========================================================================
    // Whole-document operations
    // ========================================================================

    /// Create a new, empty queue at the resolved path.
    ///
    /// The queue name is taken from the resolved file name. The existing
    /// entry, if any, is left untouched.
    ///
    /// # Errors
    ///
    /// `QueueExists` / `TargetIsFolder` when the path is occupied,
    /// `FolderBlocked` when a parent segment is a plain file, plus I/O
    /// failures from the vault.
    pub fn create_queue(
        &self,
        name_or_path: &str,
        scheduler: SchedulerConfig,
    ) -> Result<QueueState> {
        let path = self.resolve_queue_path(name_or_path);

        match self.vault.entry_kind(&path) {
            Some(EntryKind::File) => return self.fail(QueueError::QueueExists { path }),
            Some(EntryKind::Folder) => return self.fail(QueueError::TargetIsFolder { path }),
            None => {}
        }

        self.ensure_parent_folders(&path)?;

        let state = QueueState::new(file_stem(&path), scheduler);
        let serialized = encode_for(&path, &state)?;
        if let Err(source) = self.vault.create(&path, &serialized) {
            return self.fail(QueueError::Write { path, source });
        }

        Ok(state)
    }

    /// Load and validate the queue at the resolved path.
    ///
    /// # Errors
    ///
    /// `QueueNotFound` when no file exists, `Read` when reading fails,
    /// `Decode` / `InvalidSchema` when the content does not decode into a
    /// valid state. Each class keeps a distinguishable message.
    pub fn load_queue(&self, name_or_path: &str) -> Result<QueueState> {
        let path = self.resolve_queue_path(name_or_path);

        if self.vault.entry_kind(&path) != Some(EntryKind::File) {
            return self.fail(QueueError::QueueNotFound { path });
        }

        let raw = match self.vault.read(&path) {
            Ok(raw) => raw,
            Err(source) => return self.fail(QueueError::Read { path, source }),
        };

        match decode_for(&path, &raw) {
            Ok(state) => Ok(state),
            Err(error) => self.fail(error),
        }
    }

    /// Persist the state to the resolved path, overwriting an existing
    /// file or creating a new one.
    ///
    /// # Errors
    ///
    /// `TargetIsFolder` when a folder occupies the path, `FolderBlocked`
    /// for an inconsistent parent, plus write failures.
    pub fn save_queue(&self, name_or_path: &str, state: &QueueState) -> Result<()> {
        let path = self.resolve_queue_path(name_or_path);
        self.ensure_parent_folders(&path)?;

        let serialized = encode_for(&path, state)?;
        match self.vault.entry_kind(&path) {
            Some(EntryKind::File) => {
                if let Err(source) = self.vault.modify(&path, &serialized) {
                    return self.fail(QueueError::Write { path, source });
                }
                Ok(())
            }
            Some(EntryKind::Folder) => self.fail(QueueError::TargetIsFolder { path }),
            None => {
                if let Err(source) = self.vault.create(&path, &serialized) {
                    return self.fail(QueueError::Write { path, source });
                }
                Ok(())
            }
        }
    }

    /// Delete the queue file at the resolved path.
    ///
    /// # Errors
    ///
    /// `QueueNotFound` when no file exists there.
    pub fn delete_queue(&self, name_or_path: &str) -> Result<()> {
        let path = self.resolve_queue_path(name_or_path);

        if self.vault.entry_kind(&path) != Some(EntryKind::File) {
            return self.fail(QueueError::QueueNotFound { path });
        }

        if let Err(source) = self.vault.remove(&path) {
            return self.fail(QueueError::Io(source));
        }
        Ok(())
    }

    // ========================================================================
    // Item CRUD
    // ========================================================================

    /// Append an item to the queue and persist.
    ///
    /// Bumps both the item's and the queue's `updated_at`.
    ///
    /// # Errors
    ///
    /// `DuplicateItem` when an item with the same id already exists, plus
    /// every load/save failure.
    pub fn add_item(&self, name_or_path: &str, item: QueueItem) -> Result<QueueState> {
        let mut queue = self.load_queue(name_or_path)?;

        if queue.items.iter().any(|existing| existing.id == item.id) {
            return self.fail(QueueError::DuplicateItem { id: item.id });
        }

        let now = Utc::now();
        let mut item = item;
        item.updated_at = now;
        queue.items.push(item);
        queue.metadata.updated_at = now;

        self.save_queue(name_or_path, &queue)?;
        Ok(queue)
    }

    /// Replace the item with `item_id` by `transform(existing)` and
    /// persist. The transform may change any field; `updated_at` is
    /// overwritten afterwards either way.
    ///
    /// # Errors
    ///
    /// `ItemNotFound` when no item carries that id, plus every load/save
    /// failure.
    pub fn update_item(
        &self,
        name_or_path: &str,
        item_id: &str,
        transform: impl FnOnce(QueueItem) -> QueueItem,
    ) -> Result<QueueState> {
        let mut queue = self.load_queue(name_or_path)?;

        let Some(index) = queue.items.iter().position(|item| item.id == item_id) else {
            return self.fail(QueueError::ItemNotFound {
                id: item_id.to_string(),
            });
        };

        let now = Utc::now();
        let mut updated = transform(queue.items[index].clone());
        updated.updated_at = now;
        queue.items[index] = updated;
        queue.metadata.updated_at = now;

        self.save_queue(name_or_path, &queue)?;
        Ok(queue)
    }

    /// Remove the item with `item_id` and persist.
    ///
    /// # Errors
    ///
    /// `ItemNotFound` when no item carries that id, plus every load/save
    /// failure.
    pub fn remove_item(&self, name_or_path: &str, item_id: &str) -> Result<QueueState> {
        let mut queue = self.load_queue(name_or_path)?;

        let before = queue.items.len();
        queue.items.retain(|item| item.id != item_id);
        if queue.items.len() == before {
            return self.fail(QueueError::ItemNotFound {
                id: item_id.to_string(),
            });
        }

        queue.touch();
        self.save_queue(name_or_path, &queue)?;
        Ok(queue)
    }

    // ========================================================================
    // Folders
    // ========================================================================

    /// Create missing parent folders segment by segment. Existing folders
    /// are skipped.
    ///
    /// # Errors
    ///
    /// `FolderBlocked` when a plain file occupies a folder segment — the
    /// one failure that propagates without a notice, since the external
    /// file tree is inconsistent and cannot be routed around.
    fn ensure_parent_folders(&self, file_path: &str) -> Result<()> {
        let normalized = util::normalize_path(file_path);
        let Some((parents, _)) = normalized.rsplit_once('/') else {
            return Ok(());
        };

        let mut current = String::new();
        for segment in parents.split('/') {
            if current.is_empty() {
                current.push_str(segment);
            } else {
                current = format!("{current}/{segment}");
            }

            match self.vault.entry_kind(&current) {
                Some(EntryKind::Folder) => {}
                Some(EntryKind::File) => {
                    return Err(QueueError::FolderBlocked { path: current });
                }
                None => {
                    if let Err(source) = self.vault.create_folder(&current) {
                        return self.fail(QueueError::Io(source));
                    }
                }
            }
        }

        Ok(())
    }
}

fn has_queue_extension(path: &str) -> bool {
    path.ends_with(QUEUE_FILE_EXTENSION) || path.ends_with(QUEUE_FILE_EXTENSION_JSON)
}

fn strip_queue_extension(path: &str) -> &str {
    path.strip_suffix(QUEUE_FILE_EXTENSION)
        .or_else(|| path.strip_suffix(QUEUE_FILE_EXTENSION_JSON))
        .unwrap_or(path)
}

fn file_stem(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    strip_queue_extension(name).to_string()
}

fn encode_for(path: &str, state: &QueueState) -> Result<String> {
    if path.ends_with(QUEUE_FILE_EXTENSION_JSON) {
        json::encode(state)
    } else {
        Ok(markdown::encode(state))
    }
}

fn decode_for(path: &str, raw: &str) -> Result<QueueState> {
    if path.ends_with(QUEUE_FILE_EXTENSION_JSON) {
        json::decode(path, raw)
    } else {
        markdown::decode(path, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchedulerKind;
    use crate::scheduler::SimpleScheduler;
    use crate::vault::DiskVault;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl NotificationSink for RecordingSink {
        fn notify(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn test_store(dir: &tempfile::TempDir) -> QueueStore<DiskVault, RecordingSink> {
        QueueStore::new(
            DiskVault::new(dir.path()),
            RecordingSink::default(),
            "IncrementalReading",
        )
    }

    fn notices(store: &QueueStore<DiskVault, RecordingSink>) -> Vec<String> {
        store.sink.0.lock().unwrap().clone()
    }

    #[test]
    fn resolve_appends_extension_and_folder_prefix() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        assert_eq!(
            store.resolve_queue_path("daily"),
            "IncrementalReading/daily.irqueue.md"
        );
        assert_eq!(
            store.resolve_queue_path("daily.irqueue.md"),
            "IncrementalReading/daily.irqueue.md"
        );
        assert_eq!(
            store.resolve_queue_path("archive.irqueue.json"),
            "IncrementalReading/archive.irqueue.json"
        );
        assert_eq!(
            store.resolve_queue_path("IncrementalReading/daily"),
            "IncrementalReading/daily.irqueue.md"
        );
        assert_eq!(
            store.resolve_queue_path("sub/daily"),
            "IncrementalReading/sub/daily.irqueue.md"
        );
    }

    #[test]
    fn display_name_strips_prefix_and_extension() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        assert_eq!(
            store.display_name("IncrementalReading/daily.irqueue.md"),
            "daily"
        );
        assert_eq!(
            store.display_name("IncrementalReading/sub/weekly.irqueue.json"),
            "sub/weekly"
        );
    }

    #[test]
    fn create_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let created = store
            .create_queue("daily", SchedulerConfig::default())
            .unwrap();
        assert_eq!(created.metadata.name, "daily");
        assert_eq!(created.metadata.scheduler.kind, SchedulerKind::Simple);
        assert!(created.items.is_empty());

        let loaded = store.load_queue("daily").unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn create_existing_queue_fails_and_leaves_the_file_alone() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store
            .create_queue("daily", SchedulerConfig::default())
            .unwrap();
        store
            .add_item("daily", QueueItem::note("notes/a.md"))
            .unwrap();
        let path = store.resolve_queue_path("daily");
        let before = store.vault.read(&path).unwrap();

        let error = store
            .create_queue("daily", SchedulerConfig::default())
            .unwrap_err();
        assert!(matches!(error, QueueError::QueueExists { .. }));
        assert_eq!(store.vault.read(&path).unwrap(), before);
        assert!(notices(&store).iter().any(|n| n.contains("already exists")));
    }

    #[test]
    fn load_missing_queue_is_not_found() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let error = store.load_queue("ghost").unwrap_err();
        assert!(matches!(error, QueueError::QueueNotFound { .. }));
    }

    #[test]
    fn load_garbage_is_a_decode_error_distinct_from_not_found() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store.vault.create_folder("IncrementalReading").unwrap();
        store
            .vault
            .create("IncrementalReading/bad.irqueue.md", "no table here\n")
            .unwrap();
        store
            .vault
            .create("IncrementalReading/bad.irqueue.json", "{ not json")
            .unwrap();

        assert!(matches!(
            store.load_queue("bad").unwrap_err(),
            QueueError::Decode { .. }
        ));
        assert!(matches!(
            store.load_queue("bad.irqueue.json").unwrap_err(),
            QueueError::Decode { .. }
        ));
    }

    #[test]
    fn save_to_folder_path_fails() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store.vault.create_folder("IncrementalReading").unwrap();
        store
            .vault
            .create_folder("IncrementalReading/daily.irqueue.md")
            .unwrap();

        let state = QueueState::new("daily", SchedulerConfig::default());
        let error = store.save_queue("daily", &state).unwrap_err();
        assert!(matches!(error, QueueError::TargetIsFolder { .. }));
    }

    #[test]
    fn delete_missing_queue_fails() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        assert!(matches!(
            store.delete_queue("ghost").unwrap_err(),
            QueueError::QueueNotFound { .. }
        ));

        store
            .create_queue("daily", SchedulerConfig::default())
            .unwrap();
        store.delete_queue("daily").unwrap();
        assert!(!store.queue_exists("daily"));
    }

    #[test]
    fn add_item_with_duplicate_id_leaves_the_stored_count_unchanged() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store
            .create_queue("daily", SchedulerConfig::default())
            .unwrap();
        let item = QueueItem::note("notes/a.md");
        store.add_item("daily", item.clone()).unwrap();

        let error = store.add_item("daily", item).unwrap_err();
        assert!(matches!(error, QueueError::DuplicateItem { .. }));
        assert_eq!(store.load_queue("daily").unwrap().items.len(), 1);
    }

    #[test]
    fn update_item_applies_the_transform_and_bumps_timestamps() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store
            .create_queue("daily", SchedulerConfig::default())
            .unwrap();
        let item = QueueItem::note("notes/a.md");
        let item_id = item.id.clone();
        store.add_item("daily", item).unwrap();

        let position = crate::model::ReadingPosition {
            cursor: Some(crate::model::CursorPosition { line: 3, ch: 1 }),
            scroll_top: Some(42.0),
        };
        let updated = store
            .update_item("daily", &item_id, |item| {
                item.with_reading_position(position)
            })
            .unwrap();

        assert_eq!(updated.items[0].reading_position, position);

        let reloaded = store.load_queue("daily").unwrap();
        assert_eq!(reloaded.items[0].reading_position, position);
    }

    #[test]
    fn update_and_remove_against_missing_ids_fail_without_mutation() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store
            .create_queue("daily", SchedulerConfig::default())
            .unwrap();
        store
            .add_item("daily", QueueItem::note("notes/a.md"))
            .unwrap();
        let before = store.load_queue("daily").unwrap();

        assert!(matches!(
            store.update_item("daily", "item-ghost", |i| i).unwrap_err(),
            QueueError::ItemNotFound { .. }
        ));
        assert!(matches!(
            store.remove_item("daily", "item-ghost").unwrap_err(),
            QueueError::ItemNotFound { .. }
        ));
        assert_eq!(store.load_queue("daily").unwrap().items, before.items);
    }

    #[test]
    fn list_queue_paths_is_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store
            .create_queue("zeta", SchedulerConfig::default())
            .unwrap();
        store
            .create_queue("alpha", SchedulerConfig::default())
            .unwrap();
        store
            .create_queue("mid.irqueue.json", SchedulerConfig::default())
            .unwrap();
        store
            .vault
            .create("IncrementalReading/notes.md", "not a queue")
            .unwrap();

        assert_eq!(
            store.list_queue_paths(),
            vec![
                "IncrementalReading/alpha.irqueue.md".to_string(),
                "IncrementalReading/mid.irqueue.json".to_string(),
                "IncrementalReading/zeta.irqueue.md".to_string(),
            ]
        );
    }

    #[test]
    fn folder_blocked_by_file_propagates_without_a_notice() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store
            .vault
            .create("IncrementalReading", "a file, not a folder")
            .unwrap();

        let error = store
            .create_queue("daily", SchedulerConfig::default())
            .unwrap_err();
        assert!(matches!(error, QueueError::FolderBlocked { .. }));
        assert!(error.is_fatal());
        assert!(notices(&store).is_empty());
    }

    #[test]
    fn nested_queue_paths_create_parent_folders() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store
            .create_queue("topics/rust/daily", SchedulerConfig::default())
            .unwrap();
        assert!(store.queue_exists("topics/rust/daily"));
        assert_eq!(
            store.display_name(&store.resolve_queue_path("topics/rust/daily")),
            "topics/rust/daily"
        );
    }

    #[test]
    fn rotation_and_dismissal_survive_a_reload() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store
            .create_queue("Daily", SchedulerConfig::default())
            .unwrap();
        let note = QueueItem::note("a.md");
        let note_id = note.id.clone();
        store.add_item("Daily", note).unwrap();
        store
            .add_item("Daily", QueueItem::block("b.md", "x1"))
            .unwrap();

        let mut state = store.load_queue("Daily").unwrap();
        let next = SimpleScheduler::next(&mut state).expect("two items");
        assert_eq!(next.file_path, "b.md");
        store.save_queue("Daily", &state).unwrap();

        let mut state = store.load_queue("Daily").unwrap();
        let removed = SimpleScheduler::dismiss_current(&mut state).expect("non-empty");
        assert_eq!(removed.file_path, "b.md");
        store.save_queue("Daily", &state).unwrap();

        let reloaded = store.load_queue("Daily").unwrap();
        assert_eq!(reloaded.items.len(), 1);
        assert_eq!(reloaded.items[0].id, note_id);
        assert_eq!(reloaded.items[0].file_path, "a.md");
    }
}
