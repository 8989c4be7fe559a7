//! Small helpers shared across the codebase.

use chrono::{NaiveDateTime, NaiveTime};
use std::path::{Path, PathBuf};

/// Render a path for logs with the home directory shortened to `~`.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}

/// Expand a leading `~/` in a user-supplied path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Format a clock time as "HH:MM" (24h) or "h:MM AM" (12h).
pub fn format_clock(time: NaiveTime, time_format: &str) -> String {
    match time_format {
        "12h" => time.format("%-I:%M %p").to_string(),
        _ => time.format("%H:%M").to_string(),
    }
}

/// Format a timestamp for display, adding the weekday when it is not on `reference_day`.
pub fn format_timestamp(
    timestamp: NaiveDateTime,
    reference_day: chrono::NaiveDate,
    time_format: &str,
) -> String {
    let clock = format_clock(timestamp.time(), time_format);
    if timestamp.date() == reference_day {
        clock
    } else {
        format!("{clock} ({})", timestamp.format("%a"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_clock() {
        let t = NaiveTime::from_hms_opt(4, 5, 0).unwrap();
        assert_eq!(format_clock(t, "24h"), "04:05");
        assert_eq!(format_clock(t, "12h"), "4:05 AM");

        let t = NaiveTime::from_hms_opt(22, 30, 0).unwrap();
        assert_eq!(format_clock(t, "12h"), "10:30 PM");
    }

    #[test]
    fn test_format_timestamp_marks_other_days() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(); // Sunday
        let same = day.and_hms_opt(23, 0, 0).unwrap();
        let next = day.succ_opt().unwrap().and_hms_opt(4, 0, 0).unwrap();

        assert_eq!(format_timestamp(same, day, "24h"), "23:00");
        assert_eq!(format_timestamp(next, day, "24h"), "04:00 (Mon)");
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/tmp/times.json"), PathBuf::from("/tmp/times.json"));
        assert_eq!(expand_tilde("times.json"), PathBuf::from("times.json"));
    }
}
