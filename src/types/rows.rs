//! Normalized output rows, one per [`WeekKey`].

use crate::types::week::WeekKey;

/// Output column names of the weekly weather table.
pub const WEATHER_COLUMNS: [&str; 8] = [
    "year", "week", "temp.avg", "temp.min", "temp.max", "winddir", "windspd", "pressure",
];

/// Output column names of the weekly alert table.
pub const ALERT_COLUMNS: [&str; 3] = ["alert__year", "alert__week", "alert__count"];

/// Output column names of the merged table.
pub const MERGED_COLUMNS: [&str; 9] = [
    "year",
    "week",
    "temp.avg",
    "temp.min",
    "temp.max",
    "winddir",
    "windspd",
    "pressure",
    "alert__count",
];

/// Weekly means of the weather measurements, rounded to one decimal.
///
/// A measurement is `None` only when every daily value of the week was missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyWeather {
    pub temp_avg: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub wind_dir: Option<f64>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
}

impl WeeklyWeather {
    pub(crate) fn values(&self) -> [Option<f64>; 6] {
        [
            self.temp_avg,
            self.temp_min,
            self.temp_max,
            self.wind_dir,
            self.wind_speed,
            self.pressure,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedWeatherRow {
    pub key: WeekKey,
    pub weather: WeeklyWeather,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedAlertRow {
    pub key: WeekKey,
    pub alert_count: u64,
}

/// A week present in both the weather and the alert table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedRow {
    pub key: WeekKey,
    pub weather: WeeklyWeather,
    pub alert_count: u64,
}
