//! Inner join of the weekly weather and weekly alert tables.

use crate::types::rows::{MergedRow, NormalizedAlertRow, NormalizedWeatherRow};
use crate::types::week::WeekKey;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Joins weekly weather and weekly alert rows on their [`WeekKey`].
///
/// Only weeks present on both sides survive. If a key shows up more than once on one side,
/// its first occurrence is used. The result is sorted by week, so an empty side simply
/// gives an empty result.
///
/// # Example
///
/// ```
/// use fireweather::{join, NormalizedAlertRow, NormalizedWeatherRow, WeekKey, WeeklyWeather};
///
/// let weather = WeeklyWeather {
///     temp_avg: Some(20.9), temp_min: Some(15.0), temp_max: Some(27.1),
///     wind_dir: Some(210.0), wind_speed: Some(12.4), pressure: Some(1013.2),
/// };
/// let merged = join(
///     &[
///         NormalizedWeatherRow { key: WeekKey::new(2019, 10), weather },
///         NormalizedWeatherRow { key: WeekKey::new(2022, 41), weather },
///     ],
///     &[NormalizedAlertRow { key: WeekKey::new(2022, 41), alert_count: 8 }],
/// );
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].key, WeekKey::new(2022, 41));
/// assert_eq!(merged[0].alert_count, 8);
/// ```
pub fn join(weather: &[NormalizedWeatherRow], alerts: &[NormalizedAlertRow]) -> Vec<MergedRow> {
    let mut alert_counts: BTreeMap<WeekKey, u64> = BTreeMap::new();
    for row in alerts {
        alert_counts.entry(row.key).or_insert(row.alert_count);
    }

    let mut merged: BTreeMap<WeekKey, MergedRow> = BTreeMap::new();
    for row in weather {
        let Some(&alert_count) = alert_counts.get(&row.key) else {
            continue;
        };
        if let Entry::Vacant(slot) = merged.entry(row.key) {
            slot.insert(MergedRow {
                key: row.key,
                weather: row.weather,
                alert_count,
            });
        }
    }

    merged.into_values().collect()
}
