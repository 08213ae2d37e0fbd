use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Input file '{0}' does not exist")]
    FileNotFound(PathBuf),

    #[error("Failed to read input file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to resolve cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Data download or decompression failed")]
    DownloadIo(#[from] std::io::Error),

    #[error("Failed to parse CSV data from '{location}'")]
    CsvRead {
        location: String,
        #[source]
        source: PolarsError,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Required column '{column}' not found in '{location}'")]
    MissingColumn { location: String, column: String },

    #[error("Failed to read column '{column}' from '{location}': {source}")]
    ColumnOperation {
        location: String,
        column: String,
        #[source]
        source: PolarsError,
    },
}
