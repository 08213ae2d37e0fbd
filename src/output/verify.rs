//! Post-run checks on the written output files.

use crate::output::error::OutputError;
use crate::output::OutputFiles;
use crate::types::rows::{ALERT_COLUMNS, MERGED_COLUMNS, WEATHER_COLUMNS};
use polars::prelude::*;
use std::path::Path;

/// Row counts of the three verified files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationReport {
    pub weather_rows: usize,
    pub alert_rows: usize,
    pub merged_rows: usize,
}

fn read_output(path: &Path) -> Result<DataFrame, OutputError> {
    if !path.is_file() {
        return Err(OutputError::MissingFile(path.to_path_buf()));
    }
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| OutputError::CsvRead(path.to_path_buf(), e))
}

fn check_file(path: &Path, expected: &[&str], non_null: &[&str]) -> Result<usize, OutputError> {
    let frame = read_output(path)?;

    let found: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    if found != expected {
        return Err(OutputError::ColumnMismatch {
            path: path.to_path_buf(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            found,
        });
    }

    for name in non_null {
        // Presence was established by the column check above.
        let count = frame
            .column(name)
            .map(|c| c.null_count())
            .map_err(|e| OutputError::CsvRead(path.to_path_buf(), e))?;
        if count > 0 {
            return Err(OutputError::NullValues {
                path: path.to_path_buf(),
                column: name.to_string(),
                count,
            });
        }
    }

    Ok(frame.height())
}

/// Checks the three output files in `dir`: each exists, has exactly the expected columns in
/// order, and has no nulls in measurement or count columns.
///
/// # Errors
///
/// The first failed check, as [`OutputError::MissingFile`], [`OutputError::ColumnMismatch`]
/// or [`OutputError::NullValues`].
pub fn verify_outputs(dir: &Path, files: &OutputFiles) -> Result<VerificationReport, OutputError> {
    let weather_rows = check_file(
        &dir.join(&files.weather),
        &WEATHER_COLUMNS,
        &WEATHER_COLUMNS[2..],
    )?;
    let alert_rows = check_file(
        &dir.join(&files.alerts),
        &ALERT_COLUMNS,
        &ALERT_COLUMNS[2..],
    )?;
    let merged_rows = check_file(
        &dir.join(&files.merged),
        &MERGED_COLUMNS,
        &MERGED_COLUMNS[2..],
    )?;

    Ok(VerificationReport {
        weather_rows,
        alert_rows,
        merged_rows,
    })
}
