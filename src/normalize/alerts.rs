//! Weekly aggregation of fire alert event counts.

use crate::types::records::{alert_columns, AlertRecord};
use crate::types::rows::NormalizedAlertRow;
use crate::types::week::{WeekKey, WeekRange};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Why an alert row was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Malformed {
    Missing(&'static str),
    NotAnInteger(&'static str, String),
    WeekOutOfRange(u32),
}

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Parses an integer field. Exports that went through a float column write `3.0`,
/// so an integral float within the exact `f64` range is accepted too.
fn parse_field<T>(value: Option<&str>, field: &'static str) -> Result<T, Malformed>
where
    T: FromStr + TryFrom<i64>,
{
    let text = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(Malformed::Missing(field))?;
    if let Ok(parsed) = text.parse::<T>() {
        return Ok(parsed);
    }
    text.parse::<f64>()
        .ok()
        .filter(|v| v.fract() == 0.0 && v.abs() <= MAX_EXACT_FLOAT)
        .and_then(|v| T::try_from(v as i64).ok())
        .ok_or_else(|| Malformed::NotAnInteger(field, text.to_string()))
}

fn parse_record(record: &AlertRecord) -> Result<(WeekKey, u64), Malformed> {
    let year: i32 = parse_field(record.alert_year.as_deref(), alert_columns::YEAR)?;
    let week: u32 = parse_field(record.alert_week.as_deref(), alert_columns::WEEK)?;
    let count: u64 = parse_field(record.alert_count.as_deref(), alert_columns::COUNT)?;
    if !WeekKey::is_valid_week(week) {
        return Err(Malformed::WeekOutOfRange(week));
    }
    Ok((WeekKey::new(year, week), count))
}

/// Sums fire alert counts per ISO week inside `window`.
///
/// Event logs are expected to carry the odd corrupt line. A row is logged with `warn!` and
/// skipped when its year, week or count is missing or not an integer (`3.0` counts as 3),
/// when the count is negative, when the week is outside `1..=53`, or when adding the count
/// would overflow the week's `u64` total. It never fails the run.
///
/// The result is sorted by week.
///
/// # Example
///
/// ```
/// use fireweather::{normalize_alerts, AlertRecord, WeekKey, WeekRange};
///
/// let rows = vec![AlertRecord::new(0, 2022, 41, 3), AlertRecord::new(1, 2022, 41, 5)];
/// let weekly = normalize_alerts(&rows, &WeekRange::default());
/// assert_eq!(weekly.len(), 1);
/// assert_eq!(weekly[0].key, WeekKey::new(2022, 41));
/// assert_eq!(weekly[0].alert_count, 8);
/// ```
pub fn normalize_alerts(rows: &[AlertRecord], window: &WeekRange) -> Vec<NormalizedAlertRow> {
    let mut weeks: BTreeMap<WeekKey, u64> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in rows {
        let (key, count) = match parse_record(record) {
            Ok(parsed) => parsed,
            Err(reason) => {
                skipped += 1;
                match reason {
                    Malformed::Missing(field) => {
                        warn!("Skipping alert row {}: '{}' is missing", record.row, field)
                    }
                    Malformed::NotAnInteger(field, value) => warn!(
                        "Skipping alert row {}: '{}' value '{}' is not a valid integer",
                        record.row, field, value
                    ),
                    Malformed::WeekOutOfRange(week) => warn!(
                        "Skipping alert row {}: week {} is not an ISO week",
                        record.row, week
                    ),
                }
                continue;
            }
        };

        if !window.contains(key) {
            continue;
        }
        let total = weeks.entry(key).or_insert(0);
        match total.checked_add(count) {
            Some(sum) => *total = sum,
            None => {
                skipped += 1;
                warn!(
                    "Skipping alert row {}: count {} overflows the total of week {}",
                    record.row, count, key
                );
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} malformed alert rows out of {}", skipped, rows.len());
    }

    weeks
        .into_iter()
        .map(|(key, alert_count)| NormalizedAlertRow { key, alert_count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row: usize, year: &str, week: &str, count: &str) -> AlertRecord {
        AlertRecord {
            row,
            alert_year: Some(year.to_string()),
            alert_week: Some(week.to_string()),
            alert_count: Some(count.to_string()),
        }
    }

    #[test]
    fn test_sums_counts_within_a_week() {
        let rows = vec![AlertRecord::new(0, 2022, 41, 3), AlertRecord::new(1, 2022, 41, 5)];
        let weekly = normalize_alerts(&rows, &WeekRange::default());
        assert_eq!(
            weekly,
            vec![NormalizedAlertRow {
                key: WeekKey::new(2022, 41),
                alert_count: 8
            }]
        );
    }

    #[test]
    fn test_sum_is_exact_for_large_groups() {
        let counts: Vec<u64> = (0..500).map(|i| (i * 7919) % 1013).collect();
        let rows: Vec<_> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| AlertRecord::new(i, 2020, 10, *c))
            .collect();
        let weekly = normalize_alerts(&rows, &WeekRange::default());
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].alert_count, counts.iter().sum::<u64>());
    }

    #[test]
    fn test_window_boundaries() {
        let rows = vec![
            AlertRecord::new(0, 2018, 40, 1),
            AlertRecord::new(1, 2018, 41, 2),
            AlertRecord::new(2, 2022, 41, 3),
            AlertRecord::new(3, 2022, 42, 4),
            AlertRecord::new(4, 2017, 52, 5),
        ];
        let window = WeekRange::default();
        let weekly = normalize_alerts(&rows, &window);
        let keys: Vec<_> = weekly.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![WeekKey::new(2018, 41), WeekKey::new(2022, 41)]);
        assert!(keys.iter().all(|k| window.contains(*k)));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let rows = vec![
            raw(0, "2020", "10", "4"),
            raw(1, "twenty", "10", "4"),
            raw(2, "2020", "10", "3.5"),
            raw(3, "2020", "", "4"),
            raw(4, "2020", "60", "4"),
            raw(5, "2020", "10", "-2"),
            AlertRecord {
                row: 6,
                alert_year: Some("2020".to_string()),
                alert_week: Some("10".to_string()),
                alert_count: None,
            },
            raw(7, " 2020 ", " 10", "6 "),
        ];
        let weekly = normalize_alerts(&rows, &WeekRange::default());
        assert_eq!(
            weekly,
            vec![NormalizedAlertRow {
                key: WeekKey::new(2020, 10),
                alert_count: 10
            }]
        );
    }

    #[test]
    fn test_overflowing_count_is_skipped() {
        let rows = vec![
            AlertRecord::new(0, 2020, 10, u64::MAX),
            AlertRecord::new(1, 2020, 10, 1),
            AlertRecord::new(2, 2020, 11, 1),
        ];
        let weekly = normalize_alerts(&rows, &WeekRange::default());
        assert_eq!(
            weekly,
            vec![
                NormalizedAlertRow {
                    key: WeekKey::new(2020, 10),
                    alert_count: u64::MAX
                },
                NormalizedAlertRow {
                    key: WeekKey::new(2020, 11),
                    alert_count: 1
                }
            ]
        );
    }

    #[test]
    fn test_integral_float_fields_are_accepted() {
        let rows = vec![
            raw(0, "2020.0", "10.0", "3.0"),
            raw(1, "2020", "10", "4"),
            raw(2, "2020", "10", "2.5"),
            raw(3, "2020", "10", "-1.0"),
            raw(4, "2020", "10", "1e300"),
            raw(5, "2020", "10", "NaN"),
        ];
        let weekly = normalize_alerts(&rows, &WeekRange::default());
        assert_eq!(
            weekly,
            vec![NormalizedAlertRow {
                key: WeekKey::new(2020, 10),
                alert_count: 7
            }]
        );
    }

    #[test]
    fn test_output_sorted_by_week() {
        let rows = vec![
            AlertRecord::new(0, 2021, 3, 1),
            AlertRecord::new(1, 2019, 50, 1),
            AlertRecord::new(2, 2021, 1, 1),
            AlertRecord::new(3, 2019, 50, 1),
        ];
        let weekly = normalize_alerts(&rows, &WeekRange::default());
        let keys: Vec<_> = weekly.iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            vec![
                WeekKey::new(2019, 50),
                WeekKey::new(2021, 1),
                WeekKey::new(2021, 3)
            ]
        );
        assert_eq!(weekly[0].alert_count, 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize_alerts(&[], &WeekRange::default()).is_empty());
    }
}
