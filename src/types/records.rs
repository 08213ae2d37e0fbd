//! Raw input records as they come out of a loaded table, before any validation.

/// Column names of the raw daily weather table.
pub(crate) mod weather_columns {
    pub const COUNTRY: &str = "country";
    pub const DATE: &str = "date";
    pub const TEMP_AVG: &str = "tavg";
    pub const TEMP_MIN: &str = "tmin";
    pub const TEMP_MAX: &str = "tmax";
    pub const WIND_DIR: &str = "wdir";
    pub const WIND_SPEED: &str = "wspd";
    pub const PRESSURE: &str = "pres";
}

/// Column names of the raw fire alert table.
pub(crate) mod alert_columns {
    pub const YEAR: &str = "alert__year";
    pub const WEEK: &str = "alert__week";
    pub const COUNT: &str = "alert__count";
}

/// One daily weather observation.
///
/// The date is kept as text: parsing it is part of normalization, where a bad date
/// aborts the run with the row number attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherRecord {
    /// Zero-based data row index in the source table (header excluded).
    pub row: usize,
    pub country: Option<String>,
    pub date: Option<String>,
    pub temp_avg: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub wind_dir: Option<f64>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
}

/// One fire alert event line.
///
/// All three fields are raw text; rows that fail to parse are skipped during normalization
/// instead of failing the run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlertRecord {
    pub row: usize,
    pub alert_year: Option<String>,
    pub alert_week: Option<String>,
    pub alert_count: Option<String>,
}

impl AlertRecord {
    /// Convenience constructor for already-numeric values.
    pub fn new(row: usize, year: i32, week: u32, count: u64) -> Self {
        Self {
            row,
            alert_year: Some(year.to_string()),
            alert_week: Some(week.to_string()),
            alert_count: Some(count.to_string()),
        }
    }
}
