//! Reads a raw table from a CSV file on disk.

use crate::source::error::SourceError;
use crate::source::RecordSource;
use log::{info, warn};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::task;

/// Drops every record with more fields than the header.
///
/// Records end at a newline outside double quotes, and fields are split on commas outside
/// quotes. Returns the remaining bytes and the number of records dropped.
fn drop_overlong_records(data: &[u8]) -> (Vec<u8>, usize) {
    let mut kept = Vec::with_capacity(data.len());
    let mut dropped = 0;
    let mut header_fields = None;
    let mut keep = |record: &[u8], fields: usize| match header_fields {
        None => {
            header_fields = Some(fields);
            kept.extend_from_slice(record);
        }
        Some(expected) if fields > expected => dropped += 1,
        Some(_) => kept.extend_from_slice(record),
    };

    let mut start = 0;
    let mut fields = 1;
    let mut quoted = false;
    for (i, &byte) in data.iter().enumerate() {
        match byte {
            b'"' => quoted = !quoted,
            b',' if !quoted => fields += 1,
            b'\n' if !quoted => {
                keep(&data[start..=i], fields);
                start = i + 1;
                fields = 1;
            }
            _ => {}
        }
    }
    if start < data.len() {
        keep(&data[start..], fields);
    }
    (kept, dropped)
}

/// Reads `path` as CSV on the current thread.
///
/// Every column is read as text (no type inference) so that extraction decides how each
/// field is parsed. Records with more fields than the header are dropped with a warning.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame, SourceError> {
    let location = path.display().to_string();
    let data = std::fs::read(path).map_err(|e| SourceError::FileRead(path.to_path_buf(), e))?;
    let (data, dropped) = drop_overlong_records(&data);
    if dropped > 0 {
        warn!(
            "Skipped {} lines with more fields than the header in {}",
            dropped, location
        );
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_ignore_errors(true)
        .map_parse_options(|options| options.with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(data))
        .finish()
        .map_err(|e| SourceError::CsvRead {
            location,
            source: e,
        })
}

/// A CSV file that already sits on the local filesystem.
///
/// # Example
///
/// ```no_run
/// use fireweather::{LocalCsvSource, RecordSource};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = LocalCsvSource::new("data/daily_weather_data.csv");
/// let frame = source.load().await?;
/// println!("{} raw rows", frame.height());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalCsvSource {
    path: PathBuf,
}

impl LocalCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for LocalCsvSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<DataFrame, SourceError> {
        if tokio::fs::metadata(&self.path).await.is_err() {
            return Err(SourceError::FileNotFound(self.path.clone()));
        }
        let path = self.path.clone();
        let frame = task::spawn_blocking(move || read_csv(&path)).await??;
        info!(
            "Read {} rows and {} columns from {}",
            frame.height(),
            frame.width(),
            self.path.display()
        );
        Ok(frame)
    }
}
