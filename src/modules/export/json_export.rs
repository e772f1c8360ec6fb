//! JSON Export
//!
//! Writes listed rows as a pretty-printed JSON array.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

/// Write rows to a JSON file
pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<usize> {
    let json = serde_json::to_string_pretty(rows)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(rows.len())
}
