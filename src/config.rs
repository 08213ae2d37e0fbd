//! Run configuration: which country, which weeks, where outputs go.

use crate::error::ConfigError;
use crate::output::OutputFiles;
use crate::types::week::WeekRange;
use crate::utils::default_output_dir;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_COUNTRY: &str = "Greece";

/// Parameters of a pipeline run.
///
/// Build one in code with [`PipelineConfig::builder`] or load it from JSON with
/// [`PipelineConfig::from_json_file`]. Every field is optional in both cases:
///
/// * `country`: defaults to `"Greece"`.
/// * `window`: defaults to `[2018-W41, 2022-W41]`.
/// * `output_dir`: defaults to the user's download folder, or `.` if there is none.
/// * `files`: defaults to [`OutputFiles::default`].
///
/// # Examples
///
/// ```
/// use fireweather::{PipelineConfig, WeekKey, WeekRange};
///
/// let config = PipelineConfig::builder()
///     .country("Portugal")
///     .window(WeekRange::new(WeekKey::new(2019, 1), WeekKey::new(2019, 52)).unwrap())
///     .output_dir("out")
///     .build();
/// assert_eq!(config.country, "Portugal");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct PipelineConfig {
    #[builder(into, default = DEFAULT_COUNTRY.to_string())]
    pub country: String,

    #[builder(default)]
    pub window: WeekRange,

    #[builder(into, default = default_output_dir())]
    pub output_dir: PathBuf,

    #[builder(default)]
    pub files: OutputFiles,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PipelineConfig {
    /// Reads a JSON config file. Missing keys take their defaults; an invalid window is
    /// rejected.
    ///
    /// ```json
    /// {
    ///   "country": "Greece",
    ///   "window": { "start": { "year": 2018, "week": 41 }, "end": { "year": 2022, "week": 41 } },
    ///   "output_dir": "/tmp/fireweather"
    /// }
    /// ```
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    pub fn weather_output(&self) -> PathBuf {
        self.output_dir.join(&self.files.weather)
    }

    pub fn alerts_output(&self) -> PathBuf {
        self.output_dir.join(&self.files.alerts)
    }

    pub fn merged_output(&self) -> PathBuf {
        self.output_dir.join(&self.files.merged)
    }
}
