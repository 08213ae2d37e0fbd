//! Acquisition of raw tables. The normalizers never see where the data came from.

pub mod error;
pub mod extract;
pub mod local;
pub mod remote;

use crate::source::error::SourceError;
use polars::prelude::DataFrame;
use std::future::Future;

/// Something that can produce a raw table, such as a file on disk or a URL.
///
/// Implementors return every column as loaded; trimming column names and picking the
/// fields happens in [`extract`].
pub trait RecordSource: Send + Sync {
    /// Human-readable location, used in log lines and error messages.
    fn location(&self) -> String;

    fn load(&self) -> impl Future<Output = Result<DataFrame, SourceError>> + Send;
}
