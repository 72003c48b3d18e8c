use tracing::debug;

use crate::observability::metrics;
use crate::types::RawRow;

/// Lex a CSV blob into rows of trimmed fields.
///
/// A leading UTF-8 byte order mark, as written by spreadsheet "CSV UTF-8"
/// exports, is skipped.
///
/// Lines are split on `\n` before quote handling, so a quoted field cannot
/// span lines. Lines whose fields are all empty are dropped. The scanner
/// never fails: unbalanced quotes just leave the rest of the line in the
/// current field.
pub fn tokenize(text: &str) -> Vec<RawRow> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut dropped = 0usize;
    let rows: Vec<RawRow> = text
        .split('\n')
        .filter_map(|line| {
            let fields = tokenize_line(line);
            if fields.iter().all(String::is_empty) {
                dropped += 1;
                None
            } else {
                Some(RawRow::new(fields))
            }
        })
        .collect();

    debug!(
        "tokenize: bytes={} rows={} dropped_lines={}",
        text.len(),
        rows.len(),
        dropped
    );
    metrics::tokenizer::bytes_processed(text.len());
    metrics::tokenizer::rows_emitted(rows.len());
    metrics::tokenizer::blank_lines_dropped(dropped);

    rows
}

/// Split one line into fields, honoring `"` quoting and `""` escapes.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
