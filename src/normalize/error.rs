use crate::types::week::WeekKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Row {row}: date '{value}' does not match the day-month-year format '{format}'")]
    DateParse {
        row: usize,
        value: String,
        format: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Row {row}: date is missing")]
    MissingDate { row: usize },

    #[error("Invalid week window: {start} to {end}")]
    InvalidWindow { start: WeekKey, end: WeekKey },
}
