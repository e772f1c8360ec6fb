//! Export Module
//!
//! Provides CSV and JSON export for listed archive rows.
//!
//! - `--export csv` / `--export json` on any list command
//! - Files saved to the platform data dir under `exports/`

mod csv_export;
mod json_export;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use directories::ProjectDirs;
use serde::Serialize;
use tracing::info;

pub use csv_export::{write_csv, write_rows, CsvRow};
pub use json_export::write_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Get the export directory path, creating it if needed
pub fn get_export_dir() -> std::io::Result<PathBuf> {
    let export_dir = ProjectDirs::from("io", "calamar", "calamar")
        .map(|dirs| dirs.data_dir().join("exports"))
        .unwrap_or_else(|| PathBuf::from(".calamar").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
pub fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Export `rows` into `dir`, returning the written file
pub fn export_rows_to<T: CsvRow + Serialize>(
    dir: &Path,
    prefix: &str,
    rows: &[T],
    format: ExportFormat,
) -> anyhow::Result<PathBuf> {
    if rows.is_empty() {
        anyhow::bail!("No {} to export", prefix);
    }

    let path = dir.join(generate_filename(prefix, format.extension()));
    let count = match format {
        ExportFormat::Csv => write_csv(&path, rows)?,
        ExportFormat::Json => write_json(&path, rows)?,
    };
    info!(count, path = %path.display(), "exported rows");
    Ok(path)
}

/// Export `rows` into the default export directory
pub fn export_rows<T: CsvRow + Serialize>(
    prefix: &str,
    rows: &[T],
    format: ExportFormat,
) -> anyhow::Result<PathBuf> {
    let dir = get_export_dir()?;
    export_rows_to(&dir, prefix, rows, format)
}
