//! Human-editable markdown codec for queue files.
//!
//! A queue document is a short `key: value` header block between two `---`
//! lines, then a pipe-delimited table with one row per item. The format is
//! meant to survive hand-editing: unknown header keys and table columns are
//! ignored, missing header fields fall back to fresh defaults, and rows
//! that no longer make sense are skipped rather than failing the load.
//! Only a document with no table structure at all refuses to load.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{QueueError, Result};
use crate::model::{
    CursorPosition, ItemKind, QUEUE_SCHEMA_VERSION, QueueItem, QueueMetadata, QueueState,
    ReadingPosition, SchedulerConfig, SchedulerKind,
};
use crate::util;

const COLUMNS: [&str; 8] = [
    "id",
    "type",
    "target",
    "cursorLine",
    "cursorCh",
    "scrollTop",
    "createdAt",
    "updatedAt",
];

const HEADER_DELIMITER: &str = "---";

// ============================================================================
// Encoding
// ============================================================================

/// Serialize a queue state to the human-editable encoding.
#[must_use]
pub fn encode(state: &QueueState) -> String {
    let mut out = String::new();

    out.push_str(HEADER_DELIMITER);
    out.push('\n');
    push_header_line(&mut out, "schemaVersion", &state.schema_version.to_string());
    push_header_line(&mut out, "id", &state.metadata.id);
    push_header_line(&mut out, "name", &state.metadata.name);
    push_header_line(&mut out, "scheduler", state.metadata.scheduler.kind.as_str());
    push_header_line(&mut out, "createdAt", &format_timestamp(state.metadata.created_at));
    push_header_line(&mut out, "updatedAt", &format_timestamp(state.metadata.updated_at));
    out.push_str(HEADER_DELIMITER);
    out.push_str("\n\n");

    push_row(&mut out, &COLUMNS.map(ToString::to_string));
    push_row(&mut out, &COLUMNS.map(|_| "---".to_string()));

    for item in &state.items {
        let cursor = item.reading_position.cursor;
        let cells = [
            escape_cell(&item.id),
            item_type(&item.kind).to_string(),
            escape_cell(&item.display_label()),
            cursor.map(|c| c.line.to_string()).unwrap_or_default(),
            cursor.map(|c| c.ch.to_string()).unwrap_or_default(),
            item.reading_position
                .scroll_top
                .map(|v| v.to_string())
                .unwrap_or_default(),
            format_timestamp(item.created_at),
            format_timestamp(item.updated_at),
        ];
        push_row(&mut out, &cells);
    }

    out
}

fn push_header_line(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&quote_header_value(value));
    out.push('\n');
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

/// The `type` cell for an item variant.
const fn item_type(kind: &ItemKind) -> &'static str {
    match kind {
        ItemKind::Note => "note",
        ItemKind::Block { .. } => "block",
    }
}

fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode and validate a queue state from the human-editable encoding.
///
/// `path` is carried for error context only.
///
/// # Errors
///
/// `Decode` when the document contains no table structure (fewer than two
/// pipe-marker lines); `InvalidSchema` when the assembled state fails
/// validation (e.g. an unsupported schema version). Everything else is
/// recovered: missing header fields become fresh defaults and unparsable
/// rows are skipped.
pub fn decode(path: &str, raw: &str) -> Result<QueueState> {
    let lines: Vec<&str> = raw.lines().collect();

    let table_lines: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| line.trim_start().starts_with('|'))
        .collect();

    if table_lines.len() < 2 {
        return Err(QueueError::Decode {
            path: path.to_string(),
            reason: "no queue table found".to_string(),
        });
    }

    let columns = parse_columns(table_lines[0]);

    let mut items = Vec::new();
    for line in &table_lines[1..] {
        if is_alignment_row(line) {
            continue;
        }
        if let Some(item) = parse_row(&columns, line) {
            items.push(item);
        } else {
            tracing::debug!("skipping unparsable queue row: {line}");
        }
    }

    let header = parse_header(&lines);
    let state = QueueState {
        schema_version: header
            .get("schemaVersion")
            .and_then(|v| v.parse().ok())
            .unwrap_or(QUEUE_SCHEMA_VERSION),
        metadata: assemble_metadata(&header),
        items,
    };

    state
        .validate()
        .map_err(|errors| QueueError::invalid_schema(path, &errors))?;

    Ok(state)
}

/// Collect `key: value` pairs between the first two `---` lines. A
/// document without a header block yields an empty map; every field then
/// falls back to its fresh default.
fn parse_header(lines: &[&str]) -> HashMap<String, String> {
    let mut header = HashMap::new();

    let mut delimiters = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == HEADER_DELIMITER)
        .map(|(index, _)| index);
    let (Some(start), Some(end)) = (delimiters.next(), delimiters.next()) else {
        return header;
    };

    for line in &lines[start + 1..end] {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        header.insert(key.trim().to_string(), unquote_header_value(value));
    }

    header
}

fn assemble_metadata(header: &HashMap<String, String>) -> QueueMetadata {
    let name = header.get("name").cloned().unwrap_or_default();
    let id = header
        .get("id")
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| util::generate_id("queue", &name));
    let kind = header
        .get("scheduler")
        .and_then(|value| SchedulerKind::from_tag(value))
        .unwrap_or_default();

    QueueMetadata {
        id,
        name,
        scheduler: SchedulerConfig { kind },
        created_at: parse_timestamp(header.get("createdAt").map(String::as_str)),
        updated_at: parse_timestamp(header.get("updatedAt").map(String::as_str)),
    }
}

fn parse_timestamp(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map_or_else(Utc::now, |parsed| parsed.with_timezone(&Utc))
}

/// Map column names from the table header row to cell indices. Unknown
/// names are kept and simply never looked up; missing ones resolve to
/// empty cells.
fn parse_columns(line: &str) -> HashMap<String, usize> {
    split_row(line)
        .into_iter()
        .enumerate()
        .map(|(index, name)| (name, index))
        .collect()
}

fn is_alignment_row(line: &str) -> bool {
    let cells = split_row(line);
    !cells.is_empty()
        && cells
            .iter()
            .all(|cell| !cell.is_empty() && cell.chars().all(|ch| ch == '-' || ch == ':'))
}

/// Parse one table row into an item, or `None` when the row should be
/// skipped: an empty target, a type that is neither `note` nor `block`,
/// or a block target without a valid `#^anchor`.
fn parse_row(columns: &HashMap<String, usize>, line: &str) -> Option<QueueItem> {
    let cells = split_row(line);

    let target = cell(columns, &cells, "target");
    if target.is_empty() {
        return None;
    }

    let (file_path, kind) = match cell(columns, &cells, "type") {
        "note" => (target.to_string(), ItemKind::Note),
        "block" => {
            let (path, block_id) = split_block_target(target)?;
            (path, ItemKind::Block { block_id })
        }
        _ => return None,
    };

    let id = match cell(columns, &cells, "id") {
        "" => util::generate_id("item", &file_path),
        id => id.to_string(),
    };

    let cursor = match (
        cell(columns, &cells, "cursorLine").parse::<u32>(),
        cell(columns, &cells, "cursorCh").parse::<u32>(),
    ) {
        (Ok(line), Ok(ch)) => Some(CursorPosition { line, ch }),
        _ => None,
    };
    let scroll_top = cell(columns, &cells, "scrollTop")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite());

    Some(QueueItem {
        id,
        file_path,
        created_at: parse_timestamp(
            Some(cell(columns, &cells, "createdAt")).filter(|v| !v.is_empty()),
        ),
        updated_at: parse_timestamp(
            Some(cell(columns, &cells, "updatedAt")).filter(|v| !v.is_empty()),
        ),
        reading_position: ReadingPosition { cursor, scroll_top },
        kind,
    })
}

/// Look up a named cell in a row, resolving a missing column or cell to
/// an empty string.
fn cell<'a>(columns: &HashMap<String, usize>, cells: &'a [String], name: &str) -> &'a str {
    columns
        .get(name)
        .and_then(|&index| cells.get(index))
        .map_or("", String::as_str)
}

/// Split `path#^anchor`, requiring a non-empty path and a legal anchor.
fn split_block_target(target: &str) -> Option<(String, String)> {
    let (path, block_id) = target.rsplit_once("#^")?;
    if path.is_empty() || !util::is_valid_block_id(block_id) {
        return None;
    }
    Some((path.to_string(), block_id.to_string()))
}

// ============================================================================
// Escaping
// ============================================================================

/// Split a table row on unescaped pipes, dropping the cells produced by
/// the leading and trailing delimiters, trimming and unescaping the rest.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for ch in line.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
        } else if ch == '\\' {
            current.push(ch);
            escaped = true;
        } else if ch == '|' {
            cells.push(current.clone());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    cells.push(current);

    if cells.first().is_some_and(|c| c.trim().is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.trim().is_empty()) {
        cells.pop();
    }

    cells
        .into_iter()
        .map(|cell| unescape(cell.trim()))
        .collect()
}

fn escape_cell(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\\' || ch == '|' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Remove one level of backslash escaping. A trailing lone backslash is
/// kept literally.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }

    out
}

fn needs_quoting(value: &str) -> bool {
    value
        .chars()
        .any(|ch| ch.is_whitespace() || matches!(ch, ':' | '#' | '-'))
}

/// Quote a header value iff it contains whitespace or `:`, `#`, `-`,
/// backslash-escaping inner quotes and backslashes.
fn quote_header_value(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

fn unquote_header_value(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        unescape(&trimmed[1..trimmed.len() - 1])
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchedulerConfig;

    fn sample_state() -> QueueState {
        let mut state = QueueState::new("Daily", SchedulerConfig::default());
        state.items.push(QueueItem::note("notes/a.md"));
        state.items.push(
            QueueItem::block("notes/b.md", "x1").with_reading_position(ReadingPosition {
                cursor: Some(CursorPosition { line: 12, ch: 4 }),
                scroll_top: Some(180.5),
            }),
        );
        state
    }

    #[test]
    fn round_trip_preserves_the_state() {
        let state = sample_state();
        let encoded = encode(&state);
        let decoded = decode("daily.irqueue.md", &encoded).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn encode_writes_header_block_and_table() {
        let encoded = encode(&sample_state());
        let lines: Vec<&str> = encoded.lines().collect();

        assert_eq!(lines[0], "---");
        assert_eq!(lines[1], "schemaVersion: 1");
        assert!(lines.iter().filter(|l| **l == "---").count() >= 2);
        assert!(
            encoded.contains(
                "| id | type | target | cursorLine | cursorCh | scrollTop | createdAt | updatedAt |"
            )
        );
        assert!(encoded.contains("| note | notes/a.md |"));
        assert!(encoded.contains("| block | notes/b.md#^x1 | 12 | 4 | 180.5 |"));
    }

    #[test]
    fn header_values_with_reserved_characters_are_quoted() {
        let mut state = sample_state();
        state.metadata.name = "reading: daily #1".to_string();
        let encoded = encode(&state);

        assert!(encoded.contains(r#"name: "reading: daily #1""#));

        let decoded = decode("q.irqueue.md", &encoded).unwrap();
        assert_eq!(decoded.metadata.name, "reading: daily #1");
    }

    #[test]
    fn header_quotes_are_escaped() {
        let mut state = sample_state();
        state.metadata.name = r#"the "daily" queue"#.to_string();
        let encoded = encode(&state);

        let decoded = decode("q.irqueue.md", &encoded).unwrap();
        assert_eq!(decoded.metadata.name, state.metadata.name);
    }

    #[test]
    fn timestamps_are_quoted_and_round_trip_exactly() {
        let state = sample_state();
        let encoded = encode(&state);

        // RFC 3339 values contain `-` and `:`, so they must be quoted.
        assert!(encoded.contains("createdAt: \""));

        let decoded = decode("q.irqueue.md", &encoded).unwrap();
        assert_eq!(decoded.metadata.created_at, state.metadata.created_at);
        assert_eq!(decoded.items[0].created_at, state.items[0].created_at);
    }

    #[test]
    fn pipe_characters_in_cells_round_trip() {
        let mut state = QueueState::new("q", SchedulerConfig::default());
        state.items.push(QueueItem::note("notes/a|b.md"));

        let encoded = encode(&state);
        assert!(encoded.contains(r"notes/a\|b.md"));

        let decoded = decode("q.irqueue.md", &encoded).unwrap();
        assert_eq!(decoded.items[0].file_path, "notes/a|b.md");
    }

    #[test]
    fn backslashes_in_cells_round_trip() {
        let mut state = QueueState::new("q", SchedulerConfig::default());
        state.items.push(QueueItem::note(r"notes\a.md"));

        let decoded = decode("q.irqueue.md", &encode(&state)).unwrap();
        assert_eq!(decoded.items[0].file_path, r"notes\a.md");
    }

    #[test]
    fn unescape_tolerates_a_trailing_backslash() {
        assert_eq!(unescape(r"a\"), r"a\");
        assert_eq!(unescape(r"a\|b"), "a|b");
    }

    #[test]
    fn block_target_decodes_into_path_and_anchor() {
        let raw = "\
| id | type | target | cursorLine | cursorCh | scrollTop | createdAt | updatedAt |
| --- | --- | --- | --- | --- | --- | --- | --- |
| item-1 | block | notes/a.md#^blk1 |  |  |  | 2026-01-01T00:00:00Z | 2026-01-01T00:00:00Z |
";
        let decoded = decode("q.irqueue.md", raw).unwrap();
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.items[0].file_path, "notes/a.md");
        assert_eq!(
            decoded.items[0].kind,
            ItemKind::Block {
                block_id: "blk1".to_string()
            }
        );
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let raw = "\
| id | type | target | cursorLine | cursorCh | scrollTop | createdAt | updatedAt |
| --- | --- | --- | --- | --- | --- | --- | --- |
| item-1 | note | notes/a.md |  |  |  |  |  |
| item-2 | chapter | notes/b.md |  |  |  |  |  |
| item-3 | block | notes/c.md |  |  |  |  |  |
| item-4 |  |  |  |  |  |  |  |
";
        let decoded = decode("q.irqueue.md", raw).unwrap();
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.items[0].id, "item-1");
    }

    #[test]
    fn missing_header_falls_back_to_fresh_defaults() {
        let raw = "\
| id | type | target | cursorLine | cursorCh | scrollTop | createdAt | updatedAt |
| --- | --- | --- | --- | --- | --- | --- | --- |
| item-1 | note | notes/a.md |  |  |  |  |  |
";
        let decoded = decode("q.irqueue.md", raw).unwrap();
        assert_eq!(decoded.schema_version, QUEUE_SCHEMA_VERSION);
        assert!(decoded.metadata.id.starts_with("queue-"));
        assert_eq!(decoded.metadata.name, "");
        assert_eq!(decoded.metadata.scheduler.kind, SchedulerKind::Simple);
    }

    #[test]
    fn unknown_columns_and_missing_columns_are_tolerated() {
        let raw = "\
---
name: partial
---

| target | type | mood |
| --- | --- | --- |
| notes/a.md | note | sleepy |
";
        let decoded = decode("q.irqueue.md", raw).unwrap();
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.items[0].file_path, "notes/a.md");
        assert!(decoded.items[0].id.starts_with("item-"));
        assert_eq!(decoded.items[0].reading_position, ReadingPosition::default());
    }

    #[test]
    fn document_without_a_table_fails_to_decode() {
        let raw = "---\nname: broken\n---\n\njust prose, no table\n";
        let error = decode("q.irqueue.md", raw).unwrap_err();
        assert!(matches!(error, QueueError::Decode { .. }));
    }

    #[test]
    fn wrong_schema_version_fails_validation() {
        let mut state = sample_state();
        state.schema_version = 2;
        let encoded = encode(&state);

        let error = decode("q.irqueue.md", &encoded).unwrap_err();
        assert!(matches!(error, QueueError::InvalidSchema { .. }));
    }

    #[test]
    fn half_present_cursor_decodes_as_no_cursor() {
        let raw = "\
| id | type | target | cursorLine | cursorCh | scrollTop | createdAt | updatedAt |
| --- | --- | --- | --- | --- | --- | --- | --- |
| item-1 | note | notes/a.md | 7 |  |  |  |  |
";
        let decoded = decode("q.irqueue.md", raw).unwrap();
        assert_eq!(decoded.items[0].reading_position.cursor, None);
    }

    #[test]
    fn integral_scroll_offsets_round_trip() {
        let mut state = QueueState::new("q", SchedulerConfig::default());
        state
            .items
            .push(QueueItem::note("a.md").with_reading_position(ReadingPosition {
                cursor: None,
                scroll_top: Some(240.0),
            }));

        let encoded = encode(&state);
        assert!(encoded.contains("| 240 |"));

        let decoded = decode("q.irqueue.md", &encoded).unwrap();
        assert_eq!(decoded.items[0].reading_position.scroll_top, Some(240.0));
    }
}
