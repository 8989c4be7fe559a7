//! Command handlers for suhoor.
//!
//! `plan` prints one plan, `watch` keeps it on screen, `simulate` runs the
//! watch loop on an accelerated clock and `help` prints per-command help.
//! All of them build their output from a [`Session`].

pub mod help;
pub mod plan;
pub mod simulate;
pub mod watch;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;

use crate::args::PlanOptions;
use crate::common::utils::{expand_tilde, format_timestamp};
use crate::config::Config;
use crate::prayer::{PrayerSchedule, resolve_schedule, select_provider};
use crate::sleep::{self, BedTime, SleepPlan};

/// Everything needed to render one plan: the classified candidates and the
/// prayer schedule they were aligned against.
#[derive(Debug, Clone)]
pub struct Session {
    pub plan: SleepPlan,
    pub schedule: Option<PrayerSchedule>,
    pub location: Option<String>,
}

/// Bedtime for this run: the `--bedtime` flag, then the config default,
/// then `now`.
pub fn resolve_bedtime(
    flag: Option<&str>,
    config: &Config,
    now: NaiveDateTime,
) -> Result<BedTime> {
    let input = flag.or(config.bedtime.as_deref());
    match input {
        Some(input) => BedTime::parse(input, now.date()).context("Invalid bedtime"),
        None => BedTime::new(now).context("Invalid bedtime"),
    }
}

/// The `--times` payload path, with `~` expanded.
pub fn times_override(options: &PlanOptions) -> Option<PathBuf> {
    options.times_path.as_deref().map(expand_tilde)
}

impl Session {
    /// Resolve bedtime and prayer times, then classify.
    ///
    /// `today` anchors Fajr (always the following day); `now` only supplies
    /// the fallback bedtime.
    pub fn build(
        options: &PlanOptions,
        config: &Config,
        today: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let bedtime = resolve_bedtime(options.bedtime.as_deref(), config, now)?;

        let times_path = times_override(options);
        let provider = select_provider(times_path.as_deref(), config);
        if provider.is_none() {
            log_pipe!();
            log_warning!("No prayer times configured");
            log_indented!("Set payload_path or fajr in the config, or pass --times <FILE>");
        }
        let schedule = resolve_schedule(provider.as_deref(), today);

        let plan = sleep::plan(bedtime, schedule.as_ref().map(|s| s.fajr));

        Ok(Self {
            plan,
            schedule,
            location: config.location_label(),
        })
    }

    pub fn fajr(&self) -> Option<NaiveDateTime> {
        self.plan.fajr
    }

    /// Log the plan, the prayer context and the highlight for `now`.
    pub fn log(&self, now: NaiveDateTime, time_format: &str) {
        sleep::display::log_plan(&self.plan, time_format);

        if let Some(schedule) = &self.schedule {
            log_block_start!("Prayer times for {}", schedule.date.format("%a %Y-%m-%d"));
            if let Some(location) = &self.location {
                log_indented!("Location: {}", location);
            }
            if let Some(hijri) = &schedule.hijri {
                log_indented!("Hijri date: {}", hijri);
            }
            if let Some(method) = &schedule.method {
                log_indented!("Method: {}", method);
            }
            if let Some(tz) = &schedule.timezone {
                log_indented!("Timezone: {}", tz);
            }
            log_pipe!();
            for (prayer, at) in schedule.entries() {
                log_indented!(
                    "{:<8} {}",
                    prayer.name(),
                    format_timestamp(at, now.date(), time_format)
                );
            }
            if let Some((prayer, at)) = schedule.next_prayer(now) {
                log_pipe!();
                log_decorated!(
                    "Next prayer: {} at {}",
                    prayer.name(),
                    format_timestamp(at, now.date(), time_format)
                );
            }
        }

        self.log_highlight(now, time_format);
    }

    /// Log the near-Fajr warning when `now` is inside the window.
    pub fn log_highlight(&self, now: NaiveDateTime, time_format: &str) {
        if let Some(fajr) = self.fajr()
            && sleep::is_near_fajr(now, Some(fajr))
        {
            log_pipe!();
            sleep::display::log_near_fajr(now, fajr, time_format);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleep::Band;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn evening() -> NaiveDateTime {
        day().and_hms_opt(21, 15, 0).unwrap()
    }

    #[test]
    fn test_resolve_bedtime_precedence() {
        let config = Config {
            bedtime: Some("23:00".into()),
            ..Default::default()
        };

        let flag = resolve_bedtime(Some("22:00"), &config, evening()).unwrap();
        assert_eq!(flag.timestamp(), day().and_hms_opt(22, 0, 0).unwrap());

        let configured = resolve_bedtime(None, &config, evening()).unwrap();
        assert_eq!(configured.timestamp(), day().and_hms_opt(23, 0, 0).unwrap());

        let fallback = resolve_bedtime(None, &Config::default(), evening()).unwrap();
        assert_eq!(fallback.timestamp(), evening());
    }

    #[test]
    fn test_resolve_bedtime_rejects_garbage() {
        let err = resolve_bedtime(Some("late"), &Config::default(), evening()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid bedtime"));
    }

    #[test]
    fn test_session_from_manual_config() {
        let config = Config {
            fajr: Some("05:00".into()),
            ..Default::default()
        };
        let options = PlanOptions {
            bedtime: Some("22:00".into()),
            times_path: None,
        };

        let session = Session::build(&options, &config, day(), evening()).unwrap();
        assert_eq!(
            session.fajr(),
            Some(day().succ_opt().unwrap().and_hms_opt(5, 0, 0).unwrap())
        );
        assert_eq!(session.plan.candidates[2].band, Band::Recommended);
    }

    #[test]
    fn test_session_with_malformed_manual_fajr_is_neutral() {
        let config = Config {
            fajr: Some("dawn".into()),
            dhuhr: Some("12:05".into()),
            ..Default::default()
        };
        let options = PlanOptions {
            bedtime: Some("22:00".into()),
            times_path: None,
        };

        let session = Session::build(&options, &config, day(), evening()).unwrap();
        assert!(session.schedule.is_none());
        assert_eq!(session.fajr(), None);
        assert!(session.plan.candidates.iter().all(|c| c.band == Band::Neutral));
    }

    #[test]
    fn test_session_times_flag_overrides_config() {
        let mut payload = NamedTempFile::new().unwrap();
        write!(payload, r#"{{"Fajr": "06:00"}}"#).unwrap();

        let config = Config {
            fajr: Some("05:00".into()),
            ..Default::default()
        };
        let options = PlanOptions {
            bedtime: Some("22:00".into()),
            times_path: Some(payload.path().display().to_string()),
        };

        let session = Session::build(&options, &config, day(), evening()).unwrap();
        assert_eq!(
            session.fajr(),
            Some(day().succ_opt().unwrap().and_hms_opt(6, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_session_without_prayer_times_is_neutral() {
        let options = PlanOptions {
            bedtime: Some("22:00".into()),
            times_path: Some("/nonexistent/suhoor/times.json".into()),
        };

        let session = Session::build(&options, &Config::default(), day(), evening()).unwrap();
        assert!(session.schedule.is_none());
        assert!(session.plan.candidates.iter().all(|c| c.band == Band::Neutral));
    }
}
