//! Prayer-time data consumed by the planner.
//!
//! suhoor never computes or fetches prayer times itself. They arrive either
//! as a JSON payload written by some other tool, or as manual clock strings in
//! the config file. Both end up as a [`PrayerTimes`] value, which
//! [`schedule`] turns into timestamps anchored to tomorrow.
//!
//! Two payload shapes are accepted:
//!
//! ```json
//! { "Fajr": "04:32", "Dhuhr": "11:52", "Asr": "15:08", "Maghrib": "17:41",
//!   "Isha": "18:59", "timezone": "Africa/Cairo",
//!   "method": { "name": "Egyptian General Authority of Survey" } }
//! ```
//!
//! or the same timings wrapped as
//! `{ "data": { "timings": {..}, "meta": { "timezone", "method" }, "date": { "hijri": {..} } } }`.

pub mod provider;
pub mod schedule;

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub use provider::{
    ManualProvider, PayloadFileProvider, PrayerTimeProvider, resolve_fajr, resolve_schedule,
    select_provider,
};
pub use schedule::{Prayer, PrayerSchedule, fajr_anchor_date, parse_prayer_clock};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CalculationMethod {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HijriMonth {
    pub number: u32,
    #[serde(default)]
    pub en: String,
}

/// Hijri calendar date as announced by the payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HijriDate {
    pub day: String,
    pub month: HijriMonth,
    pub year: String,
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.month.en.is_empty() {
            write!(f, "{} {} {} AH", self.day, self.month.number, self.year)
        } else {
            write!(f, "{} {} {} AH", self.day, self.month.en, self.year)
        }
    }
}

/// Deserialize an optional field, reading anything malformed as absent.
///
/// Only Fajr drives the plan; a broken display field must not discard it.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// The five daily prayer clocks plus their context.
///
/// Clock strings are kept as received ("HH:MM", optionally followed by a zone
/// annotation); [`schedule::PrayerSchedule::resolve`] parses them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PrayerTimes {
    #[serde(rename = "Fajr", default)]
    pub fajr: Option<String>,
    #[serde(rename = "Dhuhr", default, deserialize_with = "lenient")]
    pub dhuhr: Option<String>,
    #[serde(rename = "Asr", default, deserialize_with = "lenient")]
    pub asr: Option<String>,
    #[serde(rename = "Maghrib", default, deserialize_with = "lenient")]
    pub maghrib: Option<String>,
    #[serde(rename = "Isha", default, deserialize_with = "lenient")]
    pub isha: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub method: Option<CalculationMethod>,
    #[serde(default, deserialize_with = "lenient")]
    pub hijri: Option<HijriDate>,
}

#[derive(Deserialize)]
struct Envelope {
    data: EnvelopeData,
}

#[derive(Deserialize)]
struct EnvelopeData {
    timings: PrayerTimes,
    #[serde(default, deserialize_with = "lenient")]
    meta: Option<EnvelopeMeta>,
    #[serde(default, deserialize_with = "lenient")]
    date: Option<EnvelopeDate>,
}

#[derive(Deserialize)]
struct EnvelopeMeta {
    #[serde(default, deserialize_with = "lenient")]
    timezone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    method: Option<CalculationMethod>,
}

#[derive(Deserialize)]
struct EnvelopeDate {
    #[serde(default, deserialize_with = "lenient")]
    hijri: Option<HijriDate>,
}

impl PrayerTimes {
    /// Parse a payload in either the flat or the `data` envelope shape.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).context("Prayer-time payload is not valid JSON")?;

        if !value.is_object() {
            bail!("Prayer-time payload must be a JSON object");
        }

        if value.get("data").is_some() {
            let envelope: Envelope = serde_json::from_value(value)
                .context("Prayer-time payload has an unexpected 'data' layout")?;
            let EnvelopeData {
                mut timings,
                meta,
                date,
            } = envelope.data;

            if let Some(meta) = meta {
                timings.timezone = timings.timezone.or(meta.timezone);
                timings.method = timings.method.or(meta.method);
            }
            if let Some(date) = date {
                timings.hijri = timings.hijri.or(date.hijri);
            }
            return Ok(timings);
        }

        serde_json::from_value(value).context("Prayer-time payload has malformed fields")
    }

    /// Name of the calculation method, if the source announced one.
    pub fn method_name(&self) -> Option<&str> {
        self.method.as_ref().map(|m| m.name.as_str())
    }

    /// The payload's timezone when it is a known IANA name.
    pub fn tz(&self) -> Option<chrono_tz::Tz> {
        self.timezone.as_deref()?.parse().ok()
    }
}
