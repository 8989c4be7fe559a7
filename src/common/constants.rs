//! Application constants and default values for suhoor.
//!
//! Sleep-cycle arithmetic and the Fajr classification thresholds live here
//! next to the configuration defaults and validation limits, so that every
//! number the planner depends on can be read in one place.

// ═══ Sleep Cycle Arithmetic ═══

pub const CYCLE_MINUTES: i64 = 90; // One full sleep cycle
pub const HOURS_PER_CYCLE: f64 = 1.5;
pub const MIN_CYCLES: u8 = 2; // Fewest cycles offered as a wake-up candidate
pub const MAX_CYCLES: u8 = 6; // Most cycles offered as a wake-up candidate
pub const CANDIDATE_COUNT: usize = (MAX_CYCLES - MIN_CYCLES + 1) as usize;

// ═══ Fajr Alignment Thresholds ═══
// All values are whole minutes between a candidate's wake time and Fajr.
//
// The recommended window is the intersection of an outer band
// (RECOMMENDED_MIN..=RECOMMENDED_MAX) with a proximity test around
// RECOMMENDED_CENTER. Both bounds are applied literally; the effective
// window after the warning band is 21..=74 minutes.

pub const WARNING_MAX_MINUTES: i64 = 20; // 1..=20 minutes before Fajr is cutting it close
pub const RECOMMENDED_MIN_MINUTES: i64 = 20;
pub const RECOMMENDED_MAX_MINUTES: i64 = 90;
pub const RECOMMENDED_CENTER_MINUTES: i64 = 45;
pub const RECOMMENDED_TOLERANCE_MINUTES: i64 = 30; // strict: |Δ - center| < tolerance
pub const NEAR_FAJR_WINDOW_MINUTES: i64 = 30; // inclusive: |now - fajr| <= window

// ═══ Configuration Defaults ═══

pub const APP_NAME: &str = "suhoor";
pub const CONFIG_FILE_NAME: &str = "suhoor.toml";
pub const DEFAULT_TIME_FORMAT: &str = "24h";
pub const DEFAULT_REFRESH_INTERVAL: u64 = 1; // seconds between watch-loop ticks
pub const DEFAULT_METHOD_NAME: &str = "Manual";

// ═══ Validation Limits ═══

pub const MINIMUM_REFRESH_INTERVAL: u64 = 1;
pub const MAXIMUM_REFRESH_INTERVAL: u64 = 60;
pub const SUPPORTED_TIME_FORMATS: &[&str] = &["24h", "12h"];

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1;
