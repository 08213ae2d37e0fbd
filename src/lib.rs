//! Weekly weather and wildfire alert aggregation.
//!
//! Daily weather observations and per-event fire alert counts are both reduced to one row
//! per ISO week inside a configurable window, then inner-joined on (year, week):
//!
//! * [`normalize_weather`]: country filter, ISO week, window, mean, round to one decimal.
//! * [`normalize_alerts`]: window, integer sum, malformed rows skipped with a warning.
//! * [`join`]: weeks present in both tables.
//!
//! [`Pipeline`] wires these to a [`RecordSource`] per dataset and writes the three CSV
//! outputs. Logging goes through the `log` facade; install any logger to see it.

mod config;
mod error;
mod join;
mod normalize;
mod output;
mod pipeline;
mod source;
mod types;
mod utils;

pub use config::{PipelineConfig, DEFAULT_COUNTRY};
pub use error::{ConfigError, FireWeatherError};
pub use join::join;
pub use pipeline::{Pipeline, PipelineOutput, PipelineReport};
pub use utils::round_to_tenth;

pub use normalize::alerts::normalize_alerts;
pub use normalize::error::NormalizeError;
pub use normalize::weather::{normalize_weather, WEATHER_DATE_FORMAT};

pub use output::error::OutputError;
pub use output::verify::{verify_outputs, VerificationReport};
pub use output::writer::{write_alerts, write_merged, write_weather};
pub use output::OutputFiles;

pub use source::error::SourceError;
pub use source::extract::{alert_records, weather_records};
pub use source::local::LocalCsvSource;
pub use source::remote::HttpCsvSource;
pub use source::RecordSource;

pub use types::records::{AlertRecord, WeatherRecord};
pub use types::rows::{
    MergedRow, NormalizedAlertRow, NormalizedWeatherRow, WeeklyWeather, ALERT_COLUMNS,
    MERGED_COLUMNS, WEATHER_COLUMNS,
};
pub use types::week::{WeekKey, WeekRange};
