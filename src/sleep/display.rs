//! Terminal rendering of a sleep plan.

use chrono::NaiveDateTime;

use super::{Band, ClassifiedCandidate, SleepPlan};
use crate::common::utils::format_timestamp;

const RESET: &str = "\x1b[0m";

/// Render one candidate as a table row.
///
/// Example: `04:00 (Mon)  4 cycles (6.0h)  Recommended  60 min before Fajr`
pub fn format_candidate(
    candidate: &ClassifiedCandidate,
    reference_day: chrono::NaiveDate,
    time_format: &str,
) -> String {
    let wake = format_timestamp(candidate.candidate.wake_time, reference_day, time_format);
    let band = format!(
        "{}{:<11}{RESET}",
        candidate.band.color(),
        candidate.band.label()
    );

    let offset = match candidate.minutes_to_fajr {
        Some(m) if m > 0 => format!("  {m} min before Fajr"),
        Some(0) => "  at Fajr".to_string(),
        Some(m) => format!("  {} min after Fajr", -m),
        None => String::new(),
    };

    format!(
        "{wake:<12} {} cycles ({:.1}h)  {band}{offset}",
        candidate.candidate.cycle_count, candidate.candidate.duration_hours
    )
}

/// Log the plan as a block of candidate rows followed by a short verdict.
pub fn log_plan(plan: &SleepPlan, time_format: &str) {
    let bedtime = plan.bedtime.timestamp();
    let reference_day = bedtime.date();

    log_block_start!(
        "Sleep plan for bedtime {}",
        format_timestamp(bedtime, reference_day, time_format)
    );
    match plan.fajr {
        Some(fajr) => log_indented!(
            "Fajr: {}",
            format_timestamp(fajr, reference_day, time_format)
        ),
        None => log_indented!("Fajr: unavailable, wake-up times are not aligned"),
    }
    log_pipe!();

    for candidate in &plan.candidates {
        log_indented!("{}", format_candidate(candidate, reference_day, time_format));
    }

    log_pipe!();
    let mut recommended = plan.recommended().peekable();
    if recommended.peek().is_some() {
        for candidate in recommended {
            log_info!(
                "Wake at {} after {} cycles: {}",
                format_timestamp(candidate.candidate.wake_time, reference_day, time_format),
                candidate.candidate.cycle_count,
                Band::Recommended.description()
            );
        }
    } else if plan.has_fajr() {
        if plan.candidates.iter().all(|c| c.band == Band::TooLate) {
            log_warning!("Every wake-up time falls at or after Fajr");
        } else {
            log_warning!("No wake-up time lands in the recommended window before Fajr");
        }
    }
}

/// Log the "Fajr is near" highlight for `now`.
pub fn log_near_fajr(now: NaiveDateTime, fajr: NaiveDateTime, time_format: &str) {
    let minutes = super::minutes_to_fajr(now, fajr);
    let at = format_timestamp(fajr, now.date(), time_format);
    if minutes > 0 {
        log_warning!("Fajr is near: {at}, in {minutes} min");
    } else {
        log_warning!("Fajr is near: {at}, {} min ago", -minutes);
    }
}
