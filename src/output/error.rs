use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to create output file '{0}'")]
    FileCreate(PathBuf, #[source] std::io::Error),

    #[error("Failed to build output table for '{0}'")]
    FrameBuild(PathBuf, #[source] PolarsError),

    #[error("Failed to write CSV file '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),

    #[error("Failed to read back output file '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Output file '{0}' does not exist")]
    MissingFile(PathBuf),

    #[error("Columns of '{path}' do not match: expected {expected:?}, found {found:?}")]
    ColumnMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Column '{column}' of '{path}' has {count} null values")]
    NullValues {
        path: PathBuf,
        column: String,
        count: usize,
    },
}
