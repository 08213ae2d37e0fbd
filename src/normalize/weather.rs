//! Weekly aggregation of daily weather observations for a single country.

use crate::normalize::error::NormalizeError;
use crate::types::records::WeatherRecord;
use crate::types::rows::{NormalizedWeatherRow, WeeklyWeather};
use crate::types::week::{WeekKey, WeekRange};
use crate::utils::round_to_tenth;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Day-month-year, e.g. `16-10-2022`.
pub const WEATHER_DATE_FORMAT: &str = "%d-%m-%Y";

/// Running sum and count of the non-missing values of one measurement.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn rounded(&self) -> Option<f64> {
        (self.count > 0).then(|| round_to_tenth(self.sum / self.count as f64))
    }
}

#[derive(Debug, Default)]
struct WeekAccumulator {
    temp_avg: Mean,
    temp_min: Mean,
    temp_max: Mean,
    wind_dir: Mean,
    wind_speed: Mean,
    pressure: Mean,
}

impl WeekAccumulator {
    fn push(&mut self, record: &WeatherRecord) {
        self.temp_avg.push(record.temp_avg);
        self.temp_min.push(record.temp_min);
        self.temp_max.push(record.temp_max);
        self.wind_dir.push(record.wind_dir);
        self.wind_speed.push(record.wind_speed);
        self.pressure.push(record.pressure);
    }

    fn finish(&self) -> WeeklyWeather {
        WeeklyWeather {
            temp_avg: self.temp_avg.rounded(),
            temp_min: self.temp_min.rounded(),
            temp_max: self.temp_max.rounded(),
            wind_dir: self.wind_dir.rounded(),
            wind_speed: self.wind_speed.rounded(),
            pressure: self.pressure.rounded(),
        }
    }
}

fn parse_date(record: &WeatherRecord) -> Result<NaiveDate, NormalizeError> {
    let value = record
        .date
        .as_deref()
        .ok_or(NormalizeError::MissingDate { row: record.row })?;
    NaiveDate::parse_from_str(value.trim(), WEATHER_DATE_FORMAT).map_err(|source| {
        NormalizeError::DateParse {
            row: record.row,
            value: value.to_string(),
            format: WEATHER_DATE_FORMAT,
            source,
        }
    })
}

/// Reduces daily weather observations to one row per ISO week.
///
/// Rows whose trimmed `country` is missing or differs from `country` are discarded. Every
/// retained row must carry a `dd-mm-yyyy` date; the first one that doesn't aborts the run.
/// Rows outside `window` are dropped, the rest are averaged per [`WeekKey`] (missing values
/// don't count towards the mean) and rounded with [`round_to_tenth`].
///
/// The result is sorted by week.
///
/// # Errors
///
/// [`NormalizeError::DateParse`] or [`NormalizeError::MissingDate`] for the first retained
/// row without a usable date.
///
/// # Example
///
/// ```
/// use fireweather::{normalize_weather, WeatherRecord, WeekKey, WeekRange};
///
/// let rows: Vec<WeatherRecord> = (0..2)
///     .map(|i| WeatherRecord {
///         row: i,
///         country: Some(" Greece ".to_string()),
///         date: Some(format!("1{}-10-2022", i)),
///         temp_avg: Some(20.0 + i as f64),
///         ..Default::default()
///     })
///     .collect();
///
/// let weekly = normalize_weather(&rows, "Greece", &WeekRange::default()).unwrap();
/// assert_eq!(weekly.len(), 1);
/// assert_eq!(weekly[0].key, WeekKey::new(2022, 41));
/// assert_eq!(weekly[0].weather.temp_avg, Some(20.5));
/// ```
pub fn normalize_weather(
    rows: &[WeatherRecord],
    country: &str,
    window: &WeekRange,
) -> Result<Vec<NormalizedWeatherRow>, NormalizeError> {
    let mut weeks: BTreeMap<WeekKey, WeekAccumulator> = BTreeMap::new();

    for record in rows {
        let matches_country = record
            .country
            .as_deref()
            .is_some_and(|c| c.trim() == country);
        if !matches_country {
            continue;
        }

        let key = WeekKey::from_date(parse_date(record)?);
        if !window.contains(key) {
            continue;
        }
        weeks.entry(key).or_default().push(record);
    }

    Ok(weeks
        .into_iter()
        .map(|(key, acc)| NormalizedWeatherRow {
            key,
            weather: acc.finish(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, country: &str, date: &str, temp_avg: f64) -> WeatherRecord {
        WeatherRecord {
            row,
            country: Some(country.to_string()),
            date: Some(date.to_string()),
            temp_avg: Some(temp_avg),
            temp_min: Some(temp_avg - 5.0),
            temp_max: Some(temp_avg + 5.0),
            wind_dir: Some(180.0),
            wind_speed: Some(10.0),
            pressure: Some(1013.0),
        }
    }

    #[test]
    fn test_week_41_of_2022_mean() -> Result<(), Box<dyn std::error::Error>> {
        // Monday 10 Oct 2022 to Sunday 16 Oct 2022
        let temps = [20.0, 21.0, 22.0, 19.0, 23.0, 20.0, 21.0];
        let rows: Vec<_> = temps
            .iter()
            .enumerate()
            .map(|(i, t)| record(i, "Greece", &format!("{}-10-2022", 10 + i), *t))
            .collect();

        let weekly = normalize_weather(&rows, "Greece", &WeekRange::default())?;

        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].key, WeekKey::new(2022, 41));
        assert_eq!(weekly[0].weather.temp_avg, Some(20.9));
        assert_eq!(weekly[0].weather.temp_min, Some(15.9));
        assert_eq!(weekly[0].weather.pressure, Some(1013.0));
        Ok(())
    }

    #[test]
    fn test_filters_other_countries_and_missing_country() -> Result<(), Box<dyn std::error::Error>>
    {
        let mut rows = vec![
            record(0, "  Greece", "10-10-2022", 20.0),
            record(1, "Italy", "10-10-2022", 30.0),
            record(2, "Greece ", "11-10-2022", 22.0),
        ];
        rows.push(WeatherRecord {
            row: 3,
            country: None,
            date: Some("12-10-2022".to_string()),
            temp_avg: Some(40.0),
            ..Default::default()
        });

        let weekly = normalize_weather(&rows, "Greece", &WeekRange::default())?;
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].weather.temp_avg, Some(21.0));
        Ok(())
    }

    #[test]
    fn test_other_country_bad_date_is_ignored() -> Result<(), Box<dyn std::error::Error>> {
        let rows = vec![
            record(0, "Greece", "10-10-2022", 20.0),
            record(1, "Italy", "not a date", 30.0),
        ];
        let weekly = normalize_weather(&rows, "Greece", &WeekRange::default())?;
        assert_eq!(weekly.len(), 1);
        Ok(())
    }

    #[test]
    fn test_unparseable_date_fails_the_run() {
        let rows = vec![
            record(0, "Greece", "10-10-2022", 20.0),
            record(1, "Greece", "2022-10-11", 21.0),
        ];
        let err = normalize_weather(&rows, "Greece", &WeekRange::default()).unwrap_err();
        match err {
            NormalizeError::DateParse { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "2022-10-11");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_date_fails_the_run() {
        let rows = vec![WeatherRecord {
            row: 7,
            country: Some("Greece".to_string()),
            ..Default::default()
        }];
        let err = normalize_weather(&rows, "Greece", &WeekRange::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingDate { row: 7 }));
    }

    #[test]
    fn test_window_boundaries() -> Result<(), Box<dyn std::error::Error>> {
        let rows = vec![
            record(0, "Greece", "07-10-2018", 1.0), // 2018-W40 (Sunday)
            record(1, "Greece", "08-10-2018", 2.0), // 2018-W41 (Monday)
            record(2, "Greece", "16-10-2022", 3.0), // 2022-W41 (Sunday)
            record(3, "Greece", "17-10-2022", 4.0), // 2022-W42 (Monday)
        ];
        let window = WeekRange::default();
        let weekly = normalize_weather(&rows, "Greece", &window)?;

        let keys: Vec<_> = weekly.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![WeekKey::new(2018, 41), WeekKey::new(2022, 41)]);
        assert!(keys.iter().all(|k| window.contains(*k)));
        Ok(())
    }

    #[test]
    fn test_iso_year_grouping_across_new_year() -> Result<(), Box<dyn std::error::Error>> {
        let rows = vec![
            record(0, "Greece", "31-12-2020", 10.0),
            record(1, "Greece", "03-01-2021", 12.0),
            record(2, "Greece", "04-01-2021", 14.0),
        ];
        let weekly = normalize_weather(&rows, "Greece", &WeekRange::default())?;
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].key, WeekKey::new(2020, 53));
        assert_eq!(weekly[0].weather.temp_avg, Some(11.0));
        assert_eq!(weekly[1].key, WeekKey::new(2021, 1));
        Ok(())
    }

    #[test]
    fn test_output_sorted_by_week() -> Result<(), Box<dyn std::error::Error>> {
        let rows = vec![
            record(0, "Greece", "05-03-2020", 1.0),
            record(1, "Greece", "05-03-2019", 1.0),
            record(2, "Greece", "20-12-2018", 1.0),
        ];
        let weekly = normalize_weather(&rows, "Greece", &WeekRange::default())?;
        let keys: Vec<_> = weekly.iter().map(|r| r.key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        Ok(())
    }

    #[test]
    fn test_missing_values_are_skipped_in_mean() -> Result<(), Box<dyn std::error::Error>> {
        let mut a = record(0, "Greece", "10-10-2022", 20.0);
        let mut b = record(1, "Greece", "11-10-2022", 22.0);
        a.wind_speed = None;
        b.wind_speed = Some(7.0);
        a.pressure = None;
        b.pressure = None;

        let weekly = normalize_weather(&[a, b], "Greece", &WeekRange::default())?;
        assert_eq!(weekly[0].weather.wind_speed, Some(7.0));
        assert_eq!(weekly[0].weather.pressure, None);
        Ok(())
    }

    #[test]
    fn test_half_rounds_away_from_zero() -> Result<(), Box<dyn std::error::Error>> {
        let rows = vec![
            record(0, "Greece", "10-10-2022", 21.0),
            record(1, "Greece", "11-10-2022", 21.1),
        ];
        let weekly = normalize_weather(&rows, "Greece", &WeekRange::default())?;
        assert_eq!(weekly[0].weather.temp_avg, Some(21.1));
        Ok(())
    }

    #[test]
    fn test_single_row_weeks_are_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let rows = vec![
            record(0, "Greece", "10-10-2022", 20.9),
            record(1, "Greece", "17-10-2021", 18.4),
        ];
        let window = WeekRange::default();
        let once = normalize_weather(&rows, "Greece", &window)?;

        // Feed the weekly values back in as one row per week.
        let again_rows: Vec<_> = rows
            .iter()
            .map(|r| WeatherRecord {
                temp_avg: once
                    .iter()
                    .find(|w| {
                        let date = NaiveDate::parse_from_str(
                            r.date.as_deref().unwrap(),
                            WEATHER_DATE_FORMAT,
                        )
                        .unwrap();
                        w.key == WeekKey::from_date(date)
                    })
                    .and_then(|w| w.weather.temp_avg),
                ..r.clone()
            })
            .collect();
        let twice = normalize_weather(&again_rows, "Greece", &window)?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn test_empty_input_gives_empty_output() -> Result<(), Box<dyn std::error::Error>> {
        assert!(normalize_weather(&[], "Greece", &WeekRange::default())?.is_empty());
        Ok(())
    }
}
