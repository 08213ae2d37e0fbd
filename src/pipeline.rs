//! Runs the whole job: load both sources, normalize, join, write.

use crate::config::PipelineConfig;
use crate::error::FireWeatherError;
use crate::join::join;
use crate::normalize::alerts::normalize_alerts;
use crate::normalize::error::NormalizeError;
use crate::normalize::weather::normalize_weather;
use crate::output::error::OutputError;
use crate::output::writer::{write_alerts, write_merged, write_weather};
use crate::source::extract::{alert_records, weather_records};
use crate::source::RecordSource;
use crate::types::records::{AlertRecord, WeatherRecord};
use crate::types::rows::{MergedRow, NormalizedAlertRow, NormalizedWeatherRow};
use crate::utils::ensure_dir_exists;
use log::info;
use std::path::PathBuf;
use tokio::task;

/// The three result tables of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub weather: Vec<NormalizedWeatherRow>,
    pub alerts: Vec<NormalizedAlertRow>,
    pub merged: Vec<MergedRow>,
}

/// What a completed [`Pipeline::run`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub weather_rows: usize,
    pub alert_rows: usize,
    pub merged_rows: usize,
    pub weather_path: PathBuf,
    pub alerts_path: PathBuf,
    pub merged_path: PathBuf,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalizes both record sets with the configured country and window, then joins them.
    ///
    /// No I/O happens here.
    pub fn transform(
        &self,
        weather: &[WeatherRecord],
        alerts: &[AlertRecord],
    ) -> Result<PipelineOutput, NormalizeError> {
        let weather = normalize_weather(weather, &self.config.country, &self.config.window)?;
        let alerts = normalize_alerts(alerts, &self.config.window);
        let merged = join(&weather, &alerts);
        Ok(PipelineOutput {
            weather,
            alerts,
            merged,
        })
    }

    /// Loads both sources concurrently, runs [`transform`](Self::transform) and writes the
    /// three CSV files into the configured output directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// * [`FireWeatherError::Source`] if a source can't be loaded or lacks a required column.
    /// * [`FireWeatherError::Weather`] if a weather row of the target country has a bad date.
    /// * [`FireWeatherError::Output`] if the outputs can't be written.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fireweather::{LocalCsvSource, Pipeline, PipelineConfig};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), fireweather::FireWeatherError> {
    /// let pipeline = Pipeline::new(PipelineConfig::builder().output_dir("out").build());
    /// let report = pipeline
    ///     .run(
    ///         &LocalCsvSource::new("data/daily_weather_data.csv"),
    ///         &LocalCsvSource::new("data/viirs_fire_alerts__count.csv"),
    ///     )
    ///     .await?;
    /// println!("{} merged weeks in {}", report.merged_rows, report.merged_path.display());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<W, A>(
        &self,
        weather: &W,
        alerts: &A,
    ) -> Result<PipelineReport, FireWeatherError>
    where
        W: RecordSource,
        A: RecordSource,
    {
        let weather_location = weather.location();
        let alert_location = alerts.location();
        info!(
            "Loading weather from {} and fire alerts from {}",
            weather_location, alert_location
        );

        let (weather_frame, alert_frame) = tokio::try_join!(weather.load(), alerts.load())?;
        let weather_rows = weather_records(&weather_frame, &weather_location)?;
        let alert_rows = alert_records(&alert_frame, &alert_location)?;
        drop((weather_frame, alert_frame));

        info!(
            "Normalizing {} weather rows for {} and {} alert rows within {}",
            weather_rows.len(),
            self.config.country,
            alert_rows.len(),
            self.config.window
        );
        let output = self
            .transform(&weather_rows, &alert_rows)
            .map_err(|source| FireWeatherError::Weather {
                location: weather_location,
                source,
            })?;
        if output.merged.is_empty() {
            info!("No week is present in both weather and alert data");
        }

        ensure_dir_exists(&self.config.output_dir)
            .await
            .map_err(|e| OutputError::DirCreation(self.config.output_dir.clone(), e))?;

        let weather_path = self.config.weather_output();
        let alerts_path = self.config.alerts_output();
        let merged_path = self.config.merged_output();
        let paths = (
            weather_path.clone(),
            alerts_path.clone(),
            merged_path.clone(),
        );
        let (weather_rows, alert_rows, merged_rows) = task::spawn_blocking(move || {
            let (weather_path, alerts_path, merged_path) = paths;
            Ok::<_, OutputError>((
                write_weather(&output.weather, &weather_path)?,
                write_alerts(&output.alerts, &alerts_path)?,
                write_merged(&output.merged, &merged_path)?,
            ))
        })
        .await??;

        Ok(PipelineReport {
            weather_rows,
            alert_rows,
            merged_rows,
            weather_path,
            alerts_path,
            merged_path,
        })
    }
}
