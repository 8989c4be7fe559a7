//! Classification of wake-up candidates against Fajr.
//!
//! Each candidate lands in exactly one [`Band`], decided by the whole number
//! of minutes between its wake time and Fajr. Rules are checked in order:
//!
//! 1. no Fajr available: `Neutral`
//! 2. waking at or after Fajr (`minutes <= 0`): `TooLate`
//! 3. `1..=20` minutes before Fajr: `Warning`
//! 4. inside `20..=90` and within 30 minutes of the 45-minute mark: `Recommended`
//! 5. anything else: `Neutral`
//!
//! After rule 3 has claimed 20, rule 4 admits 21 through 74 minutes.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use super::cycles::SleepCandidate;
use crate::common::constants::{
    NEAR_FAJR_WINDOW_MINUTES, RECOMMENDED_CENTER_MINUTES, RECOMMENDED_MAX_MINUTES,
    RECOMMENDED_MIN_MINUTES, RECOMMENDED_TOLERANCE_MINUTES, WARNING_MAX_MINUTES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Recommended,
    Warning,
    TooLate,
    Neutral,
}

impl Band {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Band::Recommended => "Recommended",
            Band::Warning => "Warning",
            Band::TooLate => "Too late",
            Band::Neutral => "Neutral",
        }
    }

    /// Short explanation shown next to the label.
    pub fn description(&self) -> &'static str {
        match self {
            Band::Recommended => "time for suhoor before Fajr",
            Band::Warning => "cutting it close to Fajr",
            Band::TooLate => "wakes at or after Fajr",
            Band::Neutral => "not aligned with Fajr",
        }
    }

    /// ANSI color used when rendering the label.
    pub fn color(&self) -> &'static str {
        match self {
            Band::Recommended => "\x1b[32m",
            Band::Warning => "\x1b[33m",
            Band::TooLate => "\x1b[31m",
            Band::Neutral => "\x1b[0m",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedCandidate {
    #[serde(flatten)]
    pub candidate: SleepCandidate,
    pub band: Band,
    /// Whole minutes from wake-up to Fajr, negative when waking after it.
    pub minutes_to_fajr: Option<i64>,
}

/// Whole minutes from `wake` until `fajr`, floored.
pub fn minutes_to_fajr(wake: NaiveDateTime, fajr: NaiveDateTime) -> i64 {
    (fajr - wake).num_milliseconds().div_euclid(60_000)
}

fn band_for(minutes: i64) -> Band {
    // A wake time less than a minute before Fajr floors to 0 and counts as late.
    if minutes <= 0 {
        Band::TooLate
    } else if minutes <= WARNING_MAX_MINUTES {
        Band::Warning
    } else if (RECOMMENDED_MIN_MINUTES..=RECOMMENDED_MAX_MINUTES).contains(&minutes)
        && (minutes - RECOMMENDED_CENTER_MINUTES).abs() < RECOMMENDED_TOLERANCE_MINUTES
    {
        Band::Recommended
    } else {
        Band::Neutral
    }
}

/// Classify every candidate against an optional Fajr timestamp.
///
/// The output has the same length and order as `candidates`.
pub fn classify(
    candidates: &[SleepCandidate],
    fajr: Option<NaiveDateTime>,
) -> Vec<ClassifiedCandidate> {
    candidates
        .iter()
        .map(|&candidate| match fajr {
            None => ClassifiedCandidate {
                candidate,
                band: Band::Neutral,
                minutes_to_fajr: None,
            },
            Some(fajr) => {
                let minutes = minutes_to_fajr(candidate.wake_time, fajr);
                ClassifiedCandidate {
                    candidate,
                    band: band_for(minutes),
                    minutes_to_fajr: Some(minutes),
                }
            }
        })
        .collect()
}

/// True when `now` is within 30 minutes of Fajr on either side.
pub fn is_near_fajr(now: NaiveDateTime, fajr: Option<NaiveDateTime>) -> bool {
    fajr.is_some_and(|fajr| {
        (now - fajr).num_milliseconds().abs()
            <= Duration::minutes(NEAR_FAJR_WINDOW_MINUTES).num_milliseconds()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleep::cycles::{BedTime, generate_candidates};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn bands_for(bedtime: NaiveDateTime, fajr: Option<NaiveDateTime>) -> Vec<Band> {
        let candidates = generate_candidates(BedTime::new(bedtime).unwrap());
        classify(&candidates, fajr).iter().map(|c| c.band).collect()
    }

    fn single(wake: NaiveDateTime) -> SleepCandidate {
        SleepCandidate {
            cycle_count: 4,
            duration_hours: 6.0,
            wake_time: wake,
        }
    }

    fn band_at_offset(minutes_before_fajr: i64) -> Band {
        let fajr = at(2, 5, 0);
        let wake = fajr - Duration::minutes(minutes_before_fajr);
        classify(&[single(wake)], Some(fajr))[0].band
    }

    #[test]
    fn test_bedtime_22_fajr_05_recommends_four_cycles() {
        let classified = classify(
            &generate_candidates(BedTime::new(at(1, 22, 0)).unwrap()),
            Some(at(2, 5, 0)),
        );

        let minutes: Vec<Option<i64>> = classified.iter().map(|c| c.minutes_to_fajr).collect();
        assert_eq!(
            minutes,
            vec![Some(240), Some(150), Some(60), Some(-30), Some(-120)]
        );

        let bands: Vec<Band> = classified.iter().map(|c| c.band).collect();
        assert_eq!(
            bands,
            vec![
                Band::Neutral,
                Band::Neutral,
                Band::Recommended,
                Band::TooLate,
                Band::TooLate
            ]
        );
    }

    #[test]
    fn test_bedtime_after_midnight_is_all_too_late() {
        let bands = bands_for(at(2, 3, 0), Some(at(2, 5, 0)));
        assert_eq!(bands, vec![Band::TooLate; 5]);
    }

    #[test]
    fn test_missing_fajr_is_all_neutral() {
        for bedtime in [at(1, 22, 0), at(2, 3, 0), at(1, 12, 34)] {
            let candidates = generate_candidates(BedTime::new(bedtime).unwrap());
            let classified = classify(&candidates, None);
            assert!(classified.iter().all(|c| c.band == Band::Neutral));
            assert!(classified.iter().all(|c| c.minutes_to_fajr.is_none()));
        }
    }

    #[test]
    fn test_bedtime_just_before_fajr_never_recommends() {
        // 23:30 with Fajr at 01:05: the first wake-up (02:30) is already late.
        let classified = classify(
            &generate_candidates(BedTime::new(at(1, 23, 30)).unwrap()),
            Some(at(2, 1, 5)),
        );

        let wakes: Vec<NaiveDateTime> =
            classified.iter().map(|c| c.candidate.wake_time).collect();
        assert_eq!(
            wakes,
            vec![at(2, 2, 30), at(2, 4, 0), at(2, 5, 30), at(2, 7, 0), at(2, 8, 30)]
        );
        assert!(classified.iter().all(|c| c.band == Band::TooLate));
    }

    #[test]
    fn test_band_boundaries() {
        let cases = [
            (-1, Band::TooLate),
            (0, Band::TooLate),
            (1, Band::Warning),
            (20, Band::Warning),
            (21, Band::Recommended),
            (45, Band::Recommended),
            (74, Band::Recommended),
            (75, Band::Neutral),
            (90, Band::Neutral),
            (91, Band::Neutral),
        ];
        for (minutes, expected) in cases {
            assert_eq!(band_at_offset(minutes), expected, "{minutes} minutes");
        }
    }

    #[test]
    fn test_wake_equal_to_fajr_is_too_late() {
        let fajr = at(2, 5, 0);
        let classified = classify(&[single(fajr)], Some(fajr));
        assert_eq!(classified[0].band, Band::TooLate);
        assert_eq!(classified[0].minutes_to_fajr, Some(0));
    }

    #[test]
    fn test_sub_minute_gap_floors() {
        let fajr = at(2, 5, 0);
        assert_eq!(minutes_to_fajr(fajr - Duration::seconds(30), fajr), 0);
        assert_eq!(minutes_to_fajr(fajr + Duration::seconds(30), fajr), -1);
        assert_eq!(
            classify(&[single(fajr - Duration::seconds(30))], Some(fajr))[0].band,
            Band::TooLate
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let candidates = generate_candidates(BedTime::new(at(1, 22, 15)).unwrap());
        let fajr = Some(at(2, 4, 40));
        assert_eq!(classify(&candidates, fajr), classify(&candidates, fajr));
    }

    #[test]
    fn test_is_near_fajr() {
        let fajr = at(2, 5, 0);
        assert!(is_near_fajr(at(2, 4, 30), Some(fajr)));
        assert!(is_near_fajr(at(2, 5, 30), Some(fajr)));
        assert!(is_near_fajr(fajr, Some(fajr)));
        assert!(!is_near_fajr(at(2, 4, 29), Some(fajr)));
        assert!(!is_near_fajr(at(2, 5, 31), Some(fajr)));
        assert!(!is_near_fajr(fajr, None));
    }

    #[test]
    fn test_band_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Band::TooLate).unwrap(),
            "\"too_late\""
        );
    }

    proptest! {
        #[test]
        fn prop_at_most_one_recommended_and_one_warning(
            bed_minute in 0i64..(24 * 60),
            fajr_offset in -(12 * 60i64)..(24 * 60),
        ) {
            let bedtime = at(1, 0, 0) + Duration::minutes(bed_minute);
            let fajr = bedtime + Duration::minutes(fajr_offset);
            let bands = bands_for(bedtime, Some(fajr));

            prop_assert_eq!(bands.len(), 5);
            prop_assert!(bands.iter().filter(|b| **b == Band::Recommended).count() <= 1);
            prop_assert!(bands.iter().filter(|b| **b == Band::Warning).count() <= 1);
        }

        #[test]
        fn prop_too_late_is_a_suffix(
            bed_minute in 0i64..(24 * 60),
            fajr_offset in -(12 * 60i64)..(24 * 60),
        ) {
            let bedtime = at(1, 0, 0) + Duration::minutes(bed_minute);
            let bands = bands_for(bedtime, Some(bedtime + Duration::minutes(fajr_offset)));

            if let Some(first) = bands.iter().position(|b| *b == Band::TooLate) {
                prop_assert!(bands[first..].iter().all(|b| *b == Band::TooLate));
            }
        }
    }
}
