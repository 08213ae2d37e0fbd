pub mod error;
pub mod verify;
pub mod writer;

use serde::{Deserialize, Serialize};

/// File names of the three outputs, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub weather: String,
    pub alerts: String,
    pub merged: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            weather: "greece_weather_weekly_aggregated.csv".to_string(),
            alerts: "processed_fire_alerts_aggregated.csv".to_string(),
            merged: "merged_weather_fire_alerts.csv".to_string(),
        }
    }
}
