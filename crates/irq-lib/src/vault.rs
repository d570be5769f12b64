//! Collaborator seams for the queue store.
//!
//! The store never touches the file system or the user directly: it goes
//! through a [`Vault`] for files and folders and a [`NotificationSink`]
//! for user-facing failure notices, both injected at construction. Paths
//! are vault-relative, `/`-separated, and normalized.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::util;

/// What kind of entry occupies a vault path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

/// Abstract file store.
///
/// Implementations suspend only at the I/O boundary; no locking, retry,
/// or timeout behavior is expected of them.
pub trait Vault {
    /// The kind of entry at `path`, or `None` when nothing exists there.
    fn entry_kind(&self, path: &str) -> Option<EntryKind>;

    /// Read the full text of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; also fails when no file exists.
    fn read(&self, path: &str) -> io::Result<String>;

    /// Create a new file with the given contents.
    ///
    /// # Errors
    ///
    /// Fails if anything already exists at `path`, or on I/O error.
    fn create(&self, path: &str, contents: &str) -> io::Result<()>;

    /// Overwrite the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn modify(&self, path: &str, contents: &str) -> io::Result<()>;

    /// Delete the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; also fails when no file exists.
    fn remove(&self, path: &str) -> io::Result<()>;

    /// Create a folder at `path`.
    ///
    /// # Errors
    ///
    /// Fails if anything already exists at `path`, or on I/O error.
    fn create_folder(&self, path: &str) -> io::Result<()>;

    /// Every file in the vault, as normalized relative paths.
    fn list_files(&self) -> Vec<String>;
}

/// `std::fs`-backed vault rooted at a directory.
#[derive(Debug, Clone)]
pub struct DiskVault {
    root: PathBuf,
}

impl DiskVault {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(util::normalize_path(path))
    }
}

impl Vault for DiskVault {
    fn entry_kind(&self, path: &str) -> Option<EntryKind> {
        let metadata = fs::metadata(self.absolute(path)).ok()?;
        if metadata.is_dir() {
            Some(EntryKind::Folder)
        } else {
            Some(EntryKind::File)
        }
    }

    fn read(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.absolute(path))
    }

    fn create(&self, path: &str, contents: &str) -> io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.absolute(path))?;
        file.write_all(contents.as_bytes())
    }

    fn modify(&self, path: &str, contents: &str) -> io::Result<()> {
        fs::write(self.absolute(path), contents)
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        fs::remove_file(self.absolute(path))
    }

    fn create_folder(&self, path: &str) -> io::Result<()> {
        fs::create_dir(self.absolute(path))
    }

    fn list_files(&self) -> Vec<String> {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.root)
                    .ok()
                    .map(|relative| util::normalize_path(&relative.to_string_lossy()))
            })
            .collect()
    }
}

/// Fire-and-forget sink for user-facing failure notices.
pub trait NotificationSink {
    fn notify(&self, message: &str);
}

/// Routes notices to the tracing `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Writes notices straight to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl NotificationSink for StderrSink {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}
