//! Row classifier and input file reader.
//!
//! Every line is split on tabs and classified by field count alone:
//! - 8 fields: rating row `objectId, userId, rating, status, ...`
//! - 4 fields: trust row `trusterId, trusteeId, value, createdAt`
//! - anything else: malformed
//!
//! Classification never fails hard. A bad row becomes
//! `InputRecord::Malformed` and the caller decides how to count it.

use crate::error::{DataLoadError, Result, RowError};
use crate::types::*;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const RATING_FIELDS: usize = 8;
const TRUST_FIELDS: usize = 4;

/// Read an input file into lines.
///
/// Bytes are decoded lossily: the dump occasionally carries stray
/// non-UTF-8 bytes in free-text columns we never look at.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content = String::from_utf8_lossy(&bytes);
    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Classify one raw input line.
///
/// Returns `None` for blank lines, which are neither records nor errors.
/// A line holding a tab is never blank: tabs are field separators, so a
/// tabs-only line still has a field count and is classified by it.
pub fn parse_line(line: &str) -> Option<InputRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    if !line.contains('\t') && line.trim().is_empty() {
        return None;
    }

    let parts: Vec<&str> = line.split('\t').collect();
    let record = match parts.len() {
        RATING_FIELDS => match parse_rating(&parts) {
            Ok(rating) => InputRecord::Rating(rating),
            Err(e) => InputRecord::Malformed(e),
        },
        TRUST_FIELDS => match parse_trust(&parts) {
            Ok(edge) => InputRecord::Trust(edge),
            Err(e) => InputRecord::Malformed(e),
        },
        found => InputRecord::Malformed(RowError::MalformedRow { found }),
    };
    Some(record)
}

fn parse_rating(parts: &[&str]) -> std::result::Result<RatingRecord, RowError> {
    let rating = parse_int_in(parts[2], "rating", |v| (1..=5).contains(&v))?;

    Ok(RatingRecord {
        item_id: parts[0].trim().to_string(),
        user_id: parts[1].trim().to_string(),
        rating: rating as u8,
        visible: parts[3].trim() == "1",
    })
}

fn parse_trust(parts: &[&str]) -> std::result::Result<TrustEdge, RowError> {
    let value = parse_int_in(parts[2], "trust value", |v| v == 1 || v == -1)?;

    Ok(TrustEdge {
        truster: parts[0].trim().to_string(),
        trustee: parts[1].trim().to_string(),
        value: value as i8,
    })
}

/// Parse an integer field and check it against its allowed domain
fn parse_int_in(
    raw: &str,
    field: &'static str,
    allowed: impl Fn(i64) -> bool,
) -> std::result::Result<i64, RowError> {
    let invalid = || RowError::InvalidNumericField {
        field,
        value: raw.to_string(),
    };
    let value: i64 = raw.trim().parse().map_err(|_| invalid())?;
    if allowed(value) { Ok(value) } else { Err(invalid()) }
}
