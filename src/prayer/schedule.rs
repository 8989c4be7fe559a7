//! Turning prayer clock strings into timestamps.
//!
//! Every prayer clock is placed on the calendar day after the current date,
//! whatever the bedtime. [`fajr_anchor_date`] is the only place that decides
//! this.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::{HijriDate, PrayerTimes};

// "05:12", "5:12", "05:12:30", "05:12 (EET)", "05:12 EET"
static CLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?(?:\s*\([^)]*\)|\s+[A-Za-z0-9+\-:]+)?\s*$")
        .expect("clock pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a prayer clock, ignoring any trailing zone annotation.
pub fn parse_prayer_clock(input: &str) -> Result<NaiveTime> {
    let caps = CLOCK_PATTERN
        .captures(input)
        .ok_or_else(|| anyhow!("'{input}' is not a HH:MM time"))?;

    // Seconds are optional; hours and minutes always match.
    let field = |i: usize| -> Result<u32> {
        match caps.get(i) {
            Some(m) => m
                .as_str()
                .parse()
                .with_context(|| format!("'{input}' has a malformed clock field")),
            None => Ok(0),
        }
    };

    NaiveTime::from_hms_opt(field(1)?, field(2)?, field(3)?)
        .ok_or_else(|| anyhow!("'{input}' is out of range for a time of day"))
}

/// Calendar day that prayer clocks are anchored to: the day after `today`.
pub fn fajr_anchor_date(today: NaiveDate) -> Option<NaiveDate> {
    today.succ_opt()
}

/// Prayer times resolved to absolute timestamps.
///
/// Fajr is mandatory; the other four are kept when they parse and dropped
/// otherwise, since only Fajr drives the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerSchedule {
    pub date: NaiveDate,
    pub fajr: NaiveDateTime,
    pub dhuhr: Option<NaiveDateTime>,
    pub asr: Option<NaiveDateTime>,
    pub maghrib: Option<NaiveDateTime>,
    pub isha: Option<NaiveDateTime>,
    pub timezone: Option<String>,
    pub method: Option<String>,
    pub hijri: Option<HijriDate>,
}

impl PrayerSchedule {
    pub fn resolve(times: &PrayerTimes, today: NaiveDate) -> Result<Self> {
        let date = fajr_anchor_date(today)
            .ok_or_else(|| anyhow!("No calendar day follows {today}"))?;

        let fajr_clock = times
            .fajr
            .as_deref()
            .ok_or_else(|| anyhow!("Prayer times have no Fajr entry"))?;
        let fajr = date.and_time(
            parse_prayer_clock(fajr_clock).context("Failed to parse the Fajr time")?,
        );

        let anchor = |clock: &Option<String>| {
            clock
                .as_deref()
                .and_then(|c| parse_prayer_clock(c).ok())
                .map(|t| date.and_time(t))
        };

        Ok(Self {
            date,
            fajr,
            dhuhr: anchor(&times.dhuhr),
            asr: anchor(&times.asr),
            maghrib: anchor(&times.maghrib),
            isha: anchor(&times.isha),
            timezone: times.timezone.clone(),
            method: times.method_name().map(str::to_string),
            hijri: times.hijri.clone(),
        })
    }

    pub fn get(&self, prayer: Prayer) -> Option<NaiveDateTime> {
        match prayer {
            Prayer::Fajr => Some(self.fajr),
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// Resolved prayers in daily order.
    pub fn entries(&self) -> impl Iterator<Item = (Prayer, NaiveDateTime)> + '_ {
        Prayer::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|t| (p, t)))
    }

    /// First prayer strictly after `now`.
    pub fn next_prayer(&self, now: NaiveDateTime) -> Option<(Prayer, NaiveDateTime)> {
        self.entries().find(|(_, t)| *t > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::test_constants::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn sample_times() -> PrayerTimes {
        PrayerTimes {
            fajr: Some(TEST_FAJR.into()),
            dhuhr: Some(TEST_DHUHR.into()),
            asr: Some(TEST_ASR.into()),
            maghrib: Some(TEST_MAGHRIB.into()),
            isha: Some(TEST_ISHA.into()),
            timezone: Some(TEST_TIMEZONE.into()),
            method: Some(crate::prayer::CalculationMethod {
                name: TEST_METHOD.into(),
            }),
            hijri: None,
        }
    }

    #[test]
    fn test_parse_prayer_clock_variants() {
        let t = |h, m, s| NaiveTime::from_hms_opt(h, m, s).unwrap();

        assert_eq!(parse_prayer_clock("05:12").unwrap(), t(5, 12, 0));
        assert_eq!(parse_prayer_clock("5:12").unwrap(), t(5, 12, 0));
        assert_eq!(parse_prayer_clock(" 05:12 (EET)").unwrap(), t(5, 12, 0));
        assert_eq!(parse_prayer_clock("05:12 EET").unwrap(), t(5, 12, 0));
        assert_eq!(parse_prayer_clock("05:12 +03").unwrap(), t(5, 12, 0));
        assert_eq!(parse_prayer_clock("23:59:30").unwrap(), t(23, 59, 30));
    }

    #[test]
    fn test_parse_prayer_clock_rejects_garbage() {
        for input in ["", "dawn", "0512", "24:00", "05:60", "05:12pm", "05:1", "-05:12"] {
            assert!(parse_prayer_clock(input).is_err(), "{input}");
        }
    }

    #[test]
    fn test_parse_prayer_clock_rejects_non_ascii_digits() {
        // Arabic-Indic and Extended Arabic-Indic digits
        for input in ["٠٤:٣٢", "۰۴:۳۲", "04:٣٢", "04:32:٣٠"] {
            assert!(parse_prayer_clock(input).is_err(), "{input}");
        }
    }

    #[test]
    fn test_resolve_rejects_fajr_in_non_ascii_digits() {
        let mut times = sample_times();
        times.fajr = Some("٠٤:٣٢".into());
        assert!(PrayerSchedule::resolve(&times, day(1)).is_err());
    }

    #[test]
    fn test_anchor_is_always_tomorrow() {
        assert_eq!(fajr_anchor_date(day(1)), Some(day(2)));
        assert_eq!(
            fajr_anchor_date(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()),
            NaiveDate::from_ymd_opt(2027, 1, 1)
        );
        assert_eq!(fajr_anchor_date(NaiveDate::MAX), None);
    }

    #[test]
    fn test_resolve_anchors_all_prayers_to_tomorrow() {
        let schedule = PrayerSchedule::resolve(&sample_times(), day(1)).unwrap();

        assert_eq!(schedule.date, day(2));
        assert_eq!(schedule.fajr, day(2).and_hms_opt(5, 0, 0).unwrap());
        assert_eq!(schedule.isha, Some(day(2).and_hms_opt(19, 10, 0).unwrap()));
        assert_eq!(schedule.method.as_deref(), Some(TEST_METHOD));
        assert_eq!(schedule.entries().count(), 5);
    }

    #[test]
    fn test_resolve_requires_a_valid_fajr() {
        let mut times = sample_times();
        times.fajr = None;
        assert!(PrayerSchedule::resolve(&times, day(1)).is_err());

        times.fajr = Some("25:99".into());
        let err = PrayerSchedule::resolve(&times, day(1)).unwrap_err();
        assert!(format!("{err:#}").contains("Fajr"));
    }

    #[test]
    fn test_resolve_drops_other_malformed_prayers() {
        let mut times = sample_times();
        times.asr = Some("afternoon".into());
        let schedule = PrayerSchedule::resolve(&times, day(1)).unwrap();

        assert_eq!(schedule.asr, None);
        let names: Vec<&str> = schedule.entries().map(|(p, _)| p.name()).collect();
        assert_eq!(names, vec!["Fajr", "Dhuhr", "Maghrib", "Isha"]);
    }

    #[test]
    fn test_next_prayer() {
        let schedule = PrayerSchedule::resolve(&sample_times(), day(1)).unwrap();

        let evening = day(1).and_hms_opt(22, 0, 0).unwrap();
        assert_eq!(schedule.next_prayer(evening).unwrap().0, Prayer::Fajr);

        let noon = day(2).and_hms_opt(12, 30, 0).unwrap();
        assert_eq!(schedule.next_prayer(noon).unwrap().0, Prayer::Asr);

        let night = day(2).and_hms_opt(21, 0, 0).unwrap();
        assert!(schedule.next_prayer(night).is_none());
    }
}
