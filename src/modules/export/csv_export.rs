//! CSV Export
//!
//! Writes extrinsics, blocks, events, and calls to CSV files.

use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::infrastructure::archive::{Block, Call, Event, Extrinsic};

/// Row type with a flat CSV layout
pub trait CsvRow {
    const HEADER: &'static [&'static str];

    fn record(&self) -> Vec<String>;
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

fn json(value: Option<&Value>) -> String {
    value.map(Value::to_string).unwrap_or_default()
}

impl CsvRow for Extrinsic {
    const HEADER: &'static [&'static str] =
        &["id", "hash", "block_height", "call", "signer", "success", "timestamp"];

    fn record(&self) -> Vec<String> {
        let block = self.block.as_ref();
        vec![
            self.id.clone(),
            self.hash.clone(),
            opt(block.and_then(|block| block.height)),
            opt(self.call_name()),
            opt(self.signer_address()),
            opt(self.success),
            opt(block.and_then(|block| block.timestamp.as_deref())),
        ]
    }
}

impl CsvRow for Block {
    const HEADER: &'static [&'static str] = &["id", "height", "hash", "timestamp", "spec_version"];

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.height.to_string(),
            self.hash.clone(),
            opt(self.timestamp.as_deref()),
            opt(self.spec_version),
        ]
    }
}

impl CsvRow for Event {
    const HEADER: &'static [&'static str] = &["id", "name", "extrinsic", "args"];

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            opt(self.extrinsic.as_ref().map(|ext| ext.id.as_str())),
            json(self.args.as_ref()),
        ]
    }
}

impl CsvRow for Call {
    const HEADER: &'static [&'static str] = &["id", "name", "success", "extrinsic", "args"];

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            opt(self.success),
            opt(self.extrinsic.as_ref().map(|ext| ext.id.as_str())),
            json(self.args.as_ref()),
        ]
    }
}

/// Write rows as CSV into any writer
pub fn write_rows<W: Write, T: CsvRow>(writer: W, rows: &[T]) -> anyhow::Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(T::HEADER)?;
    for row in rows {
        wtr.write_record(row.record())?;
    }

    wtr.flush()?;
    Ok(rows.len())
}

/// Write rows to a CSV file
pub fn write_csv<T: CsvRow>(path: &Path, rows: &[T]) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)?;
    write_rows(file, rows)
}
