//! # File I/O Module
//!
//! Reads beam force tables from disk and writes report artifacts safely.
//!
//! - **Spreadsheets**: `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods` are read
//!   with calamine (first worksheet, first row is the header).
//! - **CSV**: `.csv` files are read with the csv crate.
//! - **Atomic writes**: write to `.tmp`, sync, rename, so an interrupted run
//!   never leaves a truncated report behind.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::file_io::load_dataset;
//! use std::path::Path;
//!
//! let dataset = load_dataset(Path::new("beam_forces.xlsx"))?;
//! println!("{} samples over {}", dataset.len(), dataset.span());
//! # Ok::<(), beam_core::errors::ReportError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use tracing::info;

use crate::dataset::{Dataset, RawTable};
use crate::errors::{ReportError, ReportResult};

/// Extensions handled by the workbook reader
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Load and validate a force table.
///
/// # Returns
///
/// * `Ok(Dataset)` - At least three complete rows with all required columns
/// * `Err(ReportError::FileNotFound)` - The path does not exist
/// * `Err(ReportError::UnsupportedFormat)` - Unknown file extension
/// * `Err(ReportError::Spreadsheet)` - The file could not be parsed
/// * `Err(ReportError::MissingColumn)` - A required column has no matching header
/// * `Err(ReportError::InsufficientData)` - Fewer than three complete rows
pub fn load_dataset(path: &Path) -> ReportResult<Dataset> {
    if !path.exists() {
        return Err(ReportError::file_not_found(path.display().to_string()));
    }

    let table = read_table(path)?;
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        columns = table.headers.len(),
        "read force table"
    );

    Dataset::from_table(&table)
}

/// Read the header row and numeric cells of a table file, dispatching on
/// the file extension.
pub fn read_table(path: &Path) -> ReportResult<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(path),
        e if WORKBOOK_EXTENSIONS.contains(&e) => read_workbook(path),
        other => Err(ReportError::UnsupportedFormat {
            path: path.display().to_string(),
            extension: other.to_string(),
        }),
    }
}

fn read_csv(path: &Path) -> ReportResult<RawTable> {
    let spreadsheet_err = |e: csv::Error| ReportError::spreadsheet(path.display().to_string(), e.to_string());

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(spreadsheet_err)?;

    let headers = reader
        .headers()
        .map_err(spreadsheet_err)?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(spreadsheet_err)?;
        rows.push(record.iter().map(parse_number).collect());
    }

    Ok(RawTable { headers, rows })
}

fn read_workbook(path: &Path) -> ReportResult<RawTable> {
    let display = path.display().to_string();

    let mut workbook =
        open_workbook_auto(path).map_err(|e| ReportError::spreadsheet(&display, e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::spreadsheet(&display, "workbook has no worksheets"))?
        .map_err(|e| ReportError::spreadsheet(&display, e.to_string()))?;

    let mut rows_iter = range.rows();
    let headers = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
        None => Vec::new(),
    };
    let rows = rows_iter
        .map(|row| row.iter().map(cell_to_f64).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f).filter(|v| v.is_finite()),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}

/// Numeric text as a finite value. `NaN` and `inf` spellings count as blank.
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Write bytes to `path` atomically.
///
/// The data goes to a sibling `.tmp` file first, is synced to disk and then
/// renamed over the destination.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ReportResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        ReportError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        ReportError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        ReportError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        ReportError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
