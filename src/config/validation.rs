//! Configuration validation functionality.
//!
//! Rejects settings the application cannot run with: a malformed bedtime,
//! an unknown time format, an out-of-range refresh interval. Prayer clocks
//! only produce warnings; a bad one leaves that prayer unknown.

use anyhow::{Context, Result};

use super::Config;
use crate::common::constants::*;
use crate::prayer::parse_prayer_clock;
use crate::sleep::BedTime;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(ref format) = config.time_format
        && !SUPPORTED_TIME_FORMATS.contains(&format.as_str())
    {
        anyhow::bail!(
            "time_format ({}) must be one of: {}",
            format,
            SUPPORTED_TIME_FORMATS.join(", ")
        );
    }

    if let Some(interval) = config.refresh_interval
        && !(MINIMUM_REFRESH_INTERVAL..=MAXIMUM_REFRESH_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "refresh_interval ({} seconds) must be between {} and {} seconds",
            interval,
            MINIMUM_REFRESH_INTERVAL,
            MAXIMUM_REFRESH_INTERVAL
        );
    }

    if let Some(ref bedtime) = config.bedtime {
        BedTime::parse(bedtime, crate::time_source::now().date_naive())
            .context("Invalid bedtime in config")?;
    }

    let manual_times = [
        ("fajr", &config.fajr),
        ("dhuhr", &config.dhuhr),
        ("asr", &config.asr),
        ("maghrib", &config.maghrib),
        ("isha", &config.isha),
    ];
    for (key, value) in manual_times {
        if let Some(clock) = value
            && let Err(e) = parse_prayer_clock(clock)
        {
            log_pipe!();
            log_warning!("Invalid {} time in config: {:#}", key, e);
        }
    }

    if let Some(ref payload) = config.payload_path
        && payload.trim().is_empty()
    {
        anyhow::bail!("payload_path must not be empty");
    }

    if let Some(ref tz) = config.timezone
        && tz.parse::<chrono_tz::Tz>().is_err()
    {
        log_pipe!();
        log_warning!("Unknown timezone '{}' in config, shown as-is", tz);
    }

    Ok(())
}
