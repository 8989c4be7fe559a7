//! Sleep-cycle candidate generation.
//!
//! A bedtime expands into five wake-up candidates, one per whole number of
//! 90-minute cycles from two to six. Arithmetic is plain wall-clock minutes
//! on a `NaiveDateTime`, so wrapping past midnight needs no special casing.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;

use crate::common::constants::{CYCLE_MINUTES, HOURS_PER_CYCLE, MAX_CYCLES, MIN_CYCLES};

/// Rejection of a bedtime at the calculator boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentError {
    /// The input is not a usable timestamp.
    InvalidBedTime { input: String, reason: String },
}

impl fmt::Display for AlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentError::InvalidBedTime { input, reason } => {
                write!(f, "Invalid bedtime '{input}': {reason}")
            }
        }
    }
}

impl std::error::Error for AlignmentError {}

/// Sleep onset as a wall-clock timestamp.
///
/// Only constructible through [`BedTime::new`] or [`BedTime::parse`], both of
/// which guarantee that every candidate wake time is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BedTime(NaiveDateTime);

impl BedTime {
    pub fn new(timestamp: NaiveDateTime) -> Result<Self, AlignmentError> {
        let longest = Duration::minutes(CYCLE_MINUTES * i64::from(MAX_CYCLES));
        if timestamp.checked_add_signed(longest).is_none() {
            return Err(AlignmentError::InvalidBedTime {
                input: timestamp.to_string(),
                reason: "wake-up times would fall outside the supported calendar range".into(),
            });
        }
        Ok(Self(timestamp))
    }

    /// Parse a bedtime from user input.
    ///
    /// Accepts `YYYY-MM-DD HH:MM[:SS]`, or a bare `HH:MM[:SS]` which is placed
    /// on `today`.
    pub fn parse(input: &str, today: NaiveDate) -> Result<Self, AlignmentError> {
        let trimmed = input.trim();

        let timestamp = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .or_else(|| {
                ["%H:%M:%S", "%H:%M"]
                    .iter()
                    .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
                    .map(|time| today.and_time(time))
            })
            .ok_or_else(|| AlignmentError::InvalidBedTime {
                input: input.to_string(),
                reason: "expected HH:MM or YYYY-MM-DD HH:MM".into(),
            })?;

        Self::new(timestamp)
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.0
    }
}

/// One wake-up option after a whole number of sleep cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SleepCandidate {
    pub cycle_count: u8,
    pub duration_hours: f64,
    pub wake_time: NaiveDateTime,
}

/// Expand a bedtime into its five wake-up candidates, ordered by cycle count.
pub fn generate_candidates(bedtime: BedTime) -> Vec<SleepCandidate> {
    (MIN_CYCLES..=MAX_CYCLES)
        .map(|cycle_count| SleepCandidate {
            cycle_count,
            duration_hours: f64::from(cycle_count) * HOURS_PER_CYCLE,
            // BedTime::new already checked the largest offset.
            wake_time: bedtime.0 + Duration::minutes(CYCLE_MINUTES * i64::from(cycle_count)),
        })
        .collect()
}
