//! The persisted CSV record format.
//!
//! Comma delimiter, double-quote quote character, minimal quoting. None of
//! the four fields can ever contain a delimiter or quote, so the writer
//! never quotes; the reader still strips balanced quotes so hand-edited
//! files load. `synced` round-trips as the literal `True`/`False` and the
//! comparison on read is case-sensitive.
//!
//! Sync matching compares entries through this formatted representation
//! (weight at two decimals, timestamp through the configured pattern), so
//! in-memory float precision can never produce a false mismatch against
//! what is on disk.

use chrono::NaiveDateTime;
use tare_core::WeightEntry;

/// The mandatory first line of the log file.
pub const HEADER: &str = "user_id,weight,logged_at,synced";

/// Serialize one entry as a CSV row (no trailing newline).
pub(crate) fn format_row(entry: &WeightEntry, datetime_format: &str) -> String {
    format!(
        "{},{},{},{}",
        entry.user_id,
        format_weight(entry.weight_kg),
        entry.logged_at.format(datetime_format),
        format_synced(entry.synced),
    )
}

/// The persisted weight representation: exactly two decimal digits.
pub(crate) fn format_weight(weight_kg: f64) -> String {
    format!("{weight_kg:.2}")
}

pub(crate) const fn format_synced(synced: bool) -> &'static str {
    if synced { "True" } else { "False" }
}

/// Parse one CSV row. Returns `None` for anything malformed: wrong column
/// count, unparsable number or date, an unknown synced literal, or a zero
/// user id.
pub(crate) fn parse_row(line: &str, datetime_format: &str) -> Option<WeightEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let fields = split_fields(line);
    if fields.len() != 4 {
        return None;
    }

    let user_id: u32 = fields[0].trim().parse().ok()?;
    if user_id == 0 {
        return None;
    }
    let weight_kg: f64 = fields[1].trim().parse().ok()?;
    let logged_at = NaiveDateTime::parse_from_str(fields[2].trim(), datetime_format).ok()?;
    let synced = match fields[3].trim() {
        "True" => true,
        "False" => false,
        _ => return None,
    };

    Some(WeightEntry {
        user_id,
        weight_kg,
        logged_at,
        synced,
    })
}

/// Match key for the synced-flag update: the persisted representation of
/// (user, weight, timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SyncKey {
    user_id: u32,
    weight: String,
    logged_at: String,
}

impl SyncKey {
    pub(crate) fn of(entry: &WeightEntry, datetime_format: &str) -> Self {
        Self {
            user_id: entry.user_id,
            weight: format_weight(entry.weight_kg),
            logged_at: entry.logged_at.format(datetime_format).to_string(),
        }
    }
}

/// Split a CSV line on commas, honoring double-quoted fields with `""`
/// escapes.
pub(crate) fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
