//! Block reference helpers.
//!
//! A block reference is a trailing ` ^anchor` token on a line of a note.
//! Adding a block item reuses the line's existing anchor or mints a fresh
//! one and rewrites the file, so the `path#^anchor` target in the queue
//! always resolves to a real location.

use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use irq_lib::Vault;

static BLOCK_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\^([A-Za-z0-9_-]+)\s*$").expect("valid block ref pattern"));

const ANCHOR_LENGTH: usize = 7;

/// Extract the trailing block anchor from a line, if present.
#[must_use]
pub fn extract_block_id(line_text: &str) -> Option<String> {
    BLOCK_REF_RE
        .captures(line_text)
        .map(|captures| captures[1].to_string())
}

/// Mint a short anchor token derived from the target location and the
/// current instant.
#[must_use]
pub fn create_block_id(file_path: &str, line: usize) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(format!("{file_path}|{line}|{nanos}").as_bytes());
    let digest = hasher.finalize();

    let mut num = 0u64;
    for &byte in digest.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    base36_encode(num, ANCHOR_LENGTH)
}

/// Return the anchor for `line` (1-based) in the vault file, appending a
/// fresh ` ^anchor` and rewriting the file when the line has none yet.
///
/// # Errors
///
/// Fails when the file cannot be read or written, or when `line` is out
/// of range.
pub fn ensure_block_reference(vault: &impl Vault, file_path: &str, line: usize) -> Result<String> {
    let content = vault.read(file_path)?;
    let mut lines: Vec<String> = content.lines().map(ToString::to_string).collect();

    if line == 0 || line > lines.len() {
        bail!("Line {line} is out of range for {file_path}");
    }
    let index = line - 1;

    if let Some(existing) = extract_block_id(&lines[index]) {
        return Ok(existing);
    }

    let block_id = create_block_id(file_path, line);
    lines[index] = format!("{} ^{block_id}", lines[index]);

    let mut updated = lines.join("\n");
    if content.ends_with('\n') {
        updated.push('\n');
    }
    vault.modify(file_path, &updated)?;

    Ok(block_id)
}

fn base36_encode(mut num: u64, length: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    let encoded: String = chars.into_iter().rev().collect();

    if encoded.len() < length {
        format!("{encoded:0>length$}")
    } else {
        encoded.chars().take(length).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irq_lib::DiskVault;
    use tempfile::tempdir;

    #[test]
    fn extracts_a_trailing_anchor() {
        assert_eq!(
            extract_block_id("Some interesting line ^blk1"),
            Some("blk1".to_string())
        );
        assert_eq!(
            extract_block_id("Trailing spaces ^a-b_C9   "),
            Some("a-b_C9".to_string())
        );
        assert_eq!(extract_block_id("No anchor here"), None);
        assert_eq!(extract_block_id("caret^mid-line"), None);
    }

    #[test]
    fn minted_anchors_are_short_tokens() {
        let id = create_block_id("notes/a.md", 3);
        assert_eq!(id.len(), ANCHOR_LENGTH);
        assert!(irq_lib::util::is_valid_block_id(&id));
    }

    #[test]
    fn ensure_block_reference_reuses_an_existing_anchor() {
        let dir = tempdir().unwrap();
        let vault = DiskVault::new(dir.path());
        vault.create("a.md", "first line ^keepme\nsecond\n").unwrap();

        let id = ensure_block_reference(&vault, "a.md", 1).unwrap();
        assert_eq!(id, "keepme");
        assert_eq!(vault.read("a.md").unwrap(), "first line ^keepme\nsecond\n");
    }

    #[test]
    fn ensure_block_reference_appends_a_fresh_anchor() {
        let dir = tempdir().unwrap();
        let vault = DiskVault::new(dir.path());
        vault.create("a.md", "first\nsecond\n").unwrap();

        let id = ensure_block_reference(&vault, "a.md", 2).unwrap();
        let content = vault.read("a.md").unwrap();
        assert!(content.contains(&format!("second ^{id}")));
        assert_eq!(extract_block_id(&format!("second ^{id}")), Some(id));
    }

    #[test]
    fn ensure_block_reference_rejects_out_of_range_lines() {
        let dir = tempdir().unwrap();
        let vault = DiskVault::new(dir.path());
        vault.create("a.md", "only line\n").unwrap();

        assert!(ensure_block_reference(&vault, "a.md", 0).is_err());
        assert!(ensure_block_reference(&vault, "a.md", 5).is_err());
    }
}
