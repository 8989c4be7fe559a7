//! Sources of prayer times.
//!
//! A provider only has to hand over a [`PrayerTimes`] value. Failure of any
//! kind (missing file, bad JSON, unparseable Fajr) is reported once as a
//! warning and the plan carries on without Fajr.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

use super::schedule::PrayerSchedule;
use super::{CalculationMethod, PrayerTimes};
use crate::common::constants::DEFAULT_METHOD_NAME;
use crate::common::utils::private_path;
use crate::config::Config;

#[cfg_attr(test, mockall::automock)]
pub trait PrayerTimeProvider {
    /// Read the current prayer times.
    fn fetch(&self) -> Result<PrayerTimes>;

    /// Short description used in log output.
    fn describe(&self) -> String;
}

/// Prayer times read from a JSON payload on disk.
#[derive(Debug, Clone)]
pub struct PayloadFileProvider {
    path: PathBuf,
}

impl PayloadFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrayerTimeProvider for PayloadFileProvider {
    fn fetch(&self) -> Result<PrayerTimes> {
        let content = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Failed to read prayer times from {}",
                private_path(&self.path)
            )
        })?;
        PrayerTimes::from_json(&content)
            .with_context(|| format!("Invalid prayer times in {}", private_path(&self.path)))
    }

    fn describe(&self) -> String {
        format!("payload {}", private_path(&self.path))
    }
}

/// Prayer times typed into the config file.
#[derive(Debug, Clone)]
pub struct ManualProvider {
    times: PrayerTimes,
}

impl ManualProvider {
    /// Build from the config's manual keys, or `None` when no prayer key is set.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.has_manual_times() {
            return None;
        }

        Some(Self {
            times: PrayerTimes {
                fajr: config.fajr.clone(),
                dhuhr: config.dhuhr.clone(),
                asr: config.asr.clone(),
                maghrib: config.maghrib.clone(),
                isha: config.isha.clone(),
                timezone: config.timezone.clone(),
                method: Some(CalculationMethod {
                    name: config
                        .method
                        .clone()
                        .unwrap_or_else(|| DEFAULT_METHOD_NAME.to_string()),
                }),
                hijri: None,
            },
        })
    }
}

impl PrayerTimeProvider for ManualProvider {
    fn fetch(&self) -> Result<PrayerTimes> {
        if self.times.fajr.is_none() {
            bail!("No 'fajr' time in the configuration");
        }
        Ok(self.times.clone())
    }

    fn describe(&self) -> String {
        "manual times from configuration".to_string()
    }
}

/// Pick the provider for this run.
///
/// Precedence: the `--times` file, then the config's `payload_path`, then
/// manual prayer keys in the config. `None` means no prayer data at all.
pub fn select_provider(
    times_override: Option<&Path>,
    config: &Config,
) -> Option<Box<dyn PrayerTimeProvider>> {
    if let Some(path) = times_override {
        return Some(Box::new(PayloadFileProvider::new(path)));
    }
    if let Some(path) = config.payload_path() {
        return Some(Box::new(PayloadFileProvider::new(path)));
    }
    ManualProvider::from_config(config).map(|p| Box::new(p) as Box<dyn PrayerTimeProvider>)
}

/// Fetch and resolve the full schedule, degrading to `None` with a warning.
pub fn resolve_schedule(
    provider: Option<&dyn PrayerTimeProvider>,
    today: NaiveDate,
) -> Option<PrayerSchedule> {
    let provider = provider?;

    let result = provider
        .fetch()
        .and_then(|times| PrayerSchedule::resolve(&times, today));

    match result {
        Ok(schedule) => Some(schedule),
        Err(e) => {
            log_pipe!();
            log_warning!("Prayer times unavailable from {}", provider.describe());
            log_indented!("{:#}", e);
            log_indented!("Wake-up times will not be aligned with Fajr");
            None
        }
    }
}

/// Fajr for tomorrow from `provider`, or `None` when it cannot be determined.
pub fn resolve_fajr(
    provider: Option<&dyn PrayerTimeProvider>,
    today: NaiveDate,
) -> Option<NaiveDateTime> {
    resolve_schedule(provider, today).map(|schedule| schedule.fajr)
}
