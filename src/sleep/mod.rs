//! Sleep-cycle planning aligned with Fajr.
//!
//! Planning never reads a clock or touches the filesystem; only [`display`]
//! produces output. A [`SleepPlan`] is derived from a bedtime and an optional
//! Fajr timestamp, and rebuilt from scratch whenever either changes.
//!
//! - [`cycles`] turns a bedtime into five wake-up candidates
//! - [`alignment`] labels each candidate against Fajr
//! - [`display`] renders a plan through the logger

pub mod alignment;
pub mod cycles;
pub mod display;

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

pub use alignment::{Band, ClassifiedCandidate, classify, is_near_fajr, minutes_to_fajr};
pub use cycles::{AlignmentError, BedTime, SleepCandidate, generate_candidates};

/// Classified wake-up candidates for one bedtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepPlan {
    pub bedtime: BedTime,
    pub fajr: Option<NaiveDateTime>,
    pub candidates: Vec<ClassifiedCandidate>,
}

impl SleepPlan {
    /// Candidates in the recommended band, in wake-up order.
    pub fn recommended(&self) -> impl Iterator<Item = &ClassifiedCandidate> {
        self.candidates
            .iter()
            .filter(|c| c.band == Band::Recommended)
    }

    pub fn has_fajr(&self) -> bool {
        self.fajr.is_some()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Generate and classify the candidates for `bedtime`.
pub fn plan(bedtime: BedTime, fajr: Option<NaiveDateTime>) -> SleepPlan {
    let candidates = generate_candidates(bedtime);
    SleepPlan {
        bedtime,
        fajr,
        candidates: classify(&candidates, fajr),
    }
}
