//! Configuration system for suhoor.
//!
//! Settings live in a single TOML file:
//! 1. `<DIR>/suhoor.toml` when started with `--config <DIR>`
//! 2. **XDG_CONFIG_HOME**/suhoor/suhoor.toml otherwise
//!
//! A commented default file is written on first load.
//!
//! ```toml
//! #[Sleep]
//! bedtime = "22:30"          # Default bedtime when --bedtime is omitted (HH:MM)
//! time_format = "24h"        # Clock display: "24h" or "12h"
//! refresh_interval = 1       # Watch-loop tick in seconds (1-60)
//!
//! #[Location]
//! city = "Cairo"             # Display only
//! country = "Egypt"          # Display only
//!
//! #[Prayer times]
//! payload_path = "~/prayer-times.json"  # JSON written by a prayer-time tool
//! fajr = "04:32"             # Manual times, used when no payload is configured
//! dhuhr = "11:52"
//! asr = "15:08"
//! maghrib = "17:41"
//! isha = "18:59"
//! timezone = "Africa/Cairo"
//! method = "Egyptian General Authority of Survey"
//! ```
//!
//! Every field is optional. Loading validates clock strings and ranges and
//! fills in defaults for the display settings.

pub mod builder;
pub mod loading;
pub mod validation;
pub mod watcher;

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::common::constants::*;
use crate::common::utils::{expand_tilde, private_path};

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};
pub use watcher::start_config_watcher;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Bedtime used when none is given on the command line ("HH:MM").
    pub bedtime: Option<String>,
    pub time_format: Option<String>, // "24h" or "12h"
    pub refresh_interval: Option<u64>, // seconds between watch-loop ticks

    pub city: Option<String>,
    pub country: Option<String>,

    /// JSON prayer-time payload. Takes precedence over the manual times below.
    pub payload_path: Option<String>,

    pub fajr: Option<String>,
    pub dhuhr: Option<String>,
    pub asr: Option<String>,
    pub maghrib: Option<String>,
    pub isha: Option<String>,
    pub timezone: Option<String>,
    pub method: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load()
    }

    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn time_format(&self) -> &str {
        self.time_format.as_deref().unwrap_or(DEFAULT_TIME_FORMAT)
    }

    pub fn refresh_interval(&self) -> u64 {
        self.refresh_interval.unwrap_or(DEFAULT_REFRESH_INTERVAL)
    }

    /// Payload path with `~` expanded.
    pub fn payload_path(&self) -> Option<PathBuf> {
        self.payload_path.as_deref().map(expand_tilde)
    }

    /// True when any of the five manual prayer keys is set.
    pub fn has_manual_times(&self) -> bool {
        [&self.fajr, &self.dhuhr, &self.asr, &self.maghrib, &self.isha]
            .iter()
            .any(|t| t.is_some())
    }

    /// "Cairo, Egypt", "Cairo" or `None`.
    pub fn location_label(&self) -> Option<String> {
        match (self.city.as_deref(), self.country.as_deref()) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (Some(place), None) | (None, Some(place)) => Some(place.to_string()),
            (None, None) => None,
        }
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        if let Some(location) = self.location_label() {
            log_indented!("Location: {}", location);
        }
        if let Some(ref bedtime) = self.bedtime {
            log_indented!("Default bedtime: {}", bedtime);
        }
        log_indented!("Time format: {}", self.time_format());

        if let Some(path) = self.payload_path() {
            log_indented!("Prayer times: payload {}", private_path(&path));
        } else if self.has_manual_times() {
            log_indented!(
                "Prayer times: manual (Fajr {})",
                self.fajr.as_deref().unwrap_or("not set")
            );
        } else {
            log_indented!("Prayer times: none configured");
        }

        if let Some(ref method) = self.method {
            log_indented!("Method: {}", method);
        }
        log_indented!("Refresh interval: {} seconds", self.refresh_interval());
    }
}
