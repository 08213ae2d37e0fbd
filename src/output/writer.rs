//! Writes normalized tables as CSV with a header row and no index column.

use crate::output::error::OutputError;
use crate::types::rows::{
    MergedRow, NormalizedAlertRow, NormalizedWeatherRow, WeeklyWeather, ALERT_COLUMNS,
    MERGED_COLUMNS, WEATHER_COLUMNS,
};
use crate::types::week::WeekKey;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

fn key_columns(keys: &[WeekKey], names: [&str; 2]) -> [Column; 2] {
    [
        Column::new(
            names[0].into(),
            keys.iter().map(|k| k.year).collect::<Vec<i32>>(),
        ),
        Column::new(
            names[1].into(),
            keys.iter().map(|k| k.week).collect::<Vec<u32>>(),
        ),
    ]
}

/// The six measurement columns, in output order, starting at `names[0]`.
fn weather_columns(weather: &[WeeklyWeather], names: &[&str]) -> Vec<Column> {
    (0..6)
        .map(|i| {
            Column::new(
                names[i].into(),
                weather.iter().map(|w| w.values()[i]).collect::<Vec<Option<f64>>>(),
            )
        })
        .collect()
}

fn write_frame(columns: Vec<Column>, path: &Path) -> Result<usize, OutputError> {
    let mut frame =
        DataFrame::new(columns).map_err(|e| OutputError::FrameBuild(path.to_path_buf(), e))?;
    let file = File::create(path).map_err(|e| OutputError::FileCreate(path.to_path_buf(), e))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| OutputError::CsvWrite(path.to_path_buf(), e))?;
    info!("Wrote {} rows to {}", frame.height(), path.display());
    Ok(frame.height())
}

/// Columns: `year, week, temp.avg, temp.min, temp.max, winddir, windspd, pressure`.
pub fn write_weather(rows: &[NormalizedWeatherRow], path: &Path) -> Result<usize, OutputError> {
    let keys: Vec<_> = rows.iter().map(|r| r.key).collect();
    let weather: Vec<_> = rows.iter().map(|r| r.weather).collect();

    let mut columns = Vec::from(key_columns(&keys, [WEATHER_COLUMNS[0], WEATHER_COLUMNS[1]]));
    columns.extend(weather_columns(&weather, &WEATHER_COLUMNS[2..]));
    write_frame(columns, path)
}

/// Columns: `alert__year, alert__week, alert__count`.
pub fn write_alerts(rows: &[NormalizedAlertRow], path: &Path) -> Result<usize, OutputError> {
    let keys: Vec<_> = rows.iter().map(|r| r.key).collect();

    let mut columns = Vec::from(key_columns(&keys, [ALERT_COLUMNS[0], ALERT_COLUMNS[1]]));
    columns.push(Column::new(
        ALERT_COLUMNS[2].into(),
        rows.iter().map(|r| r.alert_count).collect::<Vec<u64>>(),
    ));
    write_frame(columns, path)
}

/// Weather columns followed by `alert__count`.
pub fn write_merged(rows: &[MergedRow], path: &Path) -> Result<usize, OutputError> {
    let keys: Vec<_> = rows.iter().map(|r| r.key).collect();
    let weather: Vec<_> = rows.iter().map(|r| r.weather).collect();

    let mut columns = Vec::from(key_columns(&keys, [MERGED_COLUMNS[0], MERGED_COLUMNS[1]]));
    columns.extend(weather_columns(&weather, &MERGED_COLUMNS[2..8]));
    columns.push(Column::new(
        MERGED_COLUMNS[8].into(),
        rows.iter().map(|r| r.alert_count).collect::<Vec<u64>>(),
    ));
    write_frame(columns, path)
}
