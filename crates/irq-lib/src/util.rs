//! Id generation and path normalization utilities.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use sha2::{Digest, Sha256};

// ============================================================================
// Id generation
// ============================================================================

static ID_NONCE: AtomicU64 = AtomicU64::new(0);

/// Generate a unique entity id with the given prefix.
///
/// SHA-256 over the hint, the creation instant in nanoseconds, and a
/// process-local nonce, base36-encoded to twelve characters. The nonce
/// makes consecutive calls unique even within the same nanosecond.
#[must_use]
pub fn generate_id(prefix: &str, hint: &str) -> String {
    let nonce = ID_NONCE.fetch_add(1, Ordering::Relaxed);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let seed = format!("{hint}|{nanos}|{nonce}");
    format!("{prefix}-{}", compute_id_hash(&seed, 12))
}

fn compute_id_hash(input: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();

    let mut num = 0u64;
    for &byte in result.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let mut encoded = base36_encode(num);
    if encoded.len() < length {
        encoded = format!("{encoded:0>length$}");
    }
    encoded.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.into_iter().rev().collect()
}

// ============================================================================
// Paths and anchors
// ============================================================================

/// Normalize a vault-relative path: forward slashes only, no leading,
/// trailing, or repeated separators, no `.` segments.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    let mut out = String::with_capacity(forward.len());

    for segment in forward.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }

    out
}

/// True when `id` is a legal block anchor token (alphanumeric, hyphen,
/// underscore; at least one character).
#[must_use]
pub fn is_valid_block_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
