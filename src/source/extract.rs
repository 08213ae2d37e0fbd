//! Converts loaded raw tables into typed records.
//!
//! Column names are matched after trimming surrounding whitespace, since the upstream
//! exports pad some headers. Columns that aren't needed are never touched, so optional
//! metadata such as `iso` or `confidence__cat` may or may not be present.

use crate::source::error::SourceError;
use crate::types::records::{alert_columns, weather_columns, AlertRecord, WeatherRecord};
use polars::prelude::*;

fn find_column<'a>(
    frame: &'a DataFrame,
    name: &str,
    location: &str,
) -> Result<&'a Column, SourceError> {
    frame
        .get_columns()
        .iter()
        .find(|c| c.name().as_str().trim() == name)
        .ok_or_else(|| SourceError::MissingColumn {
            location: location.to_string(),
            column: name.to_string(),
        })
}

fn text_values(
    frame: &DataFrame,
    name: &str,
    location: &str,
) -> Result<Vec<Option<String>>, SourceError> {
    let column_err = |source: PolarsError| SourceError::ColumnOperation {
        location: location.to_string(),
        column: name.to_string(),
        source,
    };
    let column = find_column(frame, name, location)?;
    let as_text = column.cast(&DataType::String).map_err(column_err)?;
    let values = as_text.str().map_err(column_err)?;
    Ok(values
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Empty or non-numeric cells become `None`.
fn float_values(
    frame: &DataFrame,
    name: &str,
    location: &str,
) -> Result<Vec<Option<f64>>, SourceError> {
    Ok(text_values(frame, name, location)?
        .into_iter()
        .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
        .collect())
}

/// Reads the daily weather columns out of `frame`.
///
/// # Errors
///
/// [`SourceError::MissingColumn`] if any of `country`, `date`, `tavg`, `tmin`, `tmax`,
/// `wdir`, `wspd` or `pres` is absent.
pub fn weather_records(
    frame: &DataFrame,
    location: &str,
) -> Result<Vec<WeatherRecord>, SourceError> {
    let countries = text_values(frame, weather_columns::COUNTRY, location)?;
    let dates = text_values(frame, weather_columns::DATE, location)?;
    let temp_avg = float_values(frame, weather_columns::TEMP_AVG, location)?;
    let temp_min = float_values(frame, weather_columns::TEMP_MIN, location)?;
    let temp_max = float_values(frame, weather_columns::TEMP_MAX, location)?;
    let wind_dir = float_values(frame, weather_columns::WIND_DIR, location)?;
    let wind_speed = float_values(frame, weather_columns::WIND_SPEED, location)?;
    let pressure = float_values(frame, weather_columns::PRESSURE, location)?;

    Ok(countries
        .into_iter()
        .zip(dates)
        .enumerate()
        .map(|(row, (country, date))| WeatherRecord {
            row,
            country,
            date,
            temp_avg: temp_avg[row],
            temp_min: temp_min[row],
            temp_max: temp_max[row],
            wind_dir: wind_dir[row],
            wind_speed: wind_speed[row],
            pressure: pressure[row],
        })
        .collect())
}

/// Reads the fire alert columns out of `frame`. Values stay text until normalization.
///
/// # Errors
///
/// [`SourceError::MissingColumn`] if any of `alert__year`, `alert__week` or `alert__count`
/// is absent.
pub fn alert_records(
    frame: &DataFrame,
    location: &str,
) -> Result<Vec<AlertRecord>, SourceError> {
    let years = text_values(frame, alert_columns::YEAR, location)?;
    let weeks = text_values(frame, alert_columns::WEEK, location)?;
    let counts = text_values(frame, alert_columns::COUNT, location)?;

    Ok(years
        .into_iter()
        .zip(weeks)
        .zip(counts)
        .enumerate()
        .map(|(row, ((alert_year, alert_week), alert_count))| AlertRecord {
            row,
            alert_year,
            alert_week,
            alert_count,
        })
        .collect())
}
