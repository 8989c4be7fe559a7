//! Time source abstraction for real and simulated time.
//!
//! The calculator itself never reads a clock. Only the application shell asks
//! "what time is it" (to pick today's date for Fajr anchoring and to refresh
//! the near-Fajr highlight), and it always asks through this module so that
//! `suhoor simulate` can replay a night in seconds.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::{Duration as StdDuration, Instant};

static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Multiplier used when the caller asks for the default acceleration.
pub const DEFAULT_SIMULATION_MULTIPLIER: f64 = 3600.0;

pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the duration (or pretend to).
    fn sleep(&self, duration: StdDuration);

    fn is_simulated(&self) -> bool;

    /// True once a simulation has reached its end time.
    fn is_ended(&self) -> bool {
        false
    }
}

pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Accelerated clock running from `start_time` to `end_time`.
///
/// With a positive multiplier, simulated time advances continuously at that
/// rate (3600.0 = one hour per real second). A multiplier of exactly 0.0
/// selects fast-forward: every `sleep` jumps the clock forward instantly.
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    time_multiplier: f64,
    /// Simulated time already slept through.
    elapsed: Mutex<StdDuration>,
    /// Sleep currently in progress: (real start, simulated length).
    sleep_in_progress: Mutex<Option<(Instant, StdDuration)>>,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, multiplier: f64) -> Self {
        let time_multiplier = if multiplier == 0.0 {
            0.0
        } else if multiplier < 0.0 {
            DEFAULT_SIMULATION_MULTIPLIER
        } else {
            multiplier
        };

        Self {
            start_time,
            end_time,
            time_multiplier,
            elapsed: Mutex::new(StdDuration::ZERO),
            sleep_in_progress: Mutex::new(None),
        }
    }

    pub fn is_fast_forward(&self) -> bool {
        self.time_multiplier == 0.0
    }

    fn current_time(&self) -> DateTime<Local> {
        let mut total = *self.elapsed.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((started, length)) = *self
            .sleep_in_progress
            .lock()
            .unwrap_or_else(|e| e.into_inner())
        {
            let progressed = started.elapsed().as_secs_f64() * self.time_multiplier;
            total += StdDuration::from_secs_f64(progressed.min(length.as_secs_f64()));
        }

        let simulated = self.start_time
            + ChronoDuration::from_std(total).unwrap_or(ChronoDuration::zero());
        simulated.min(self.end_time)
    }

    /// Portion of `requested` that fits before the end time.
    fn clamp_to_end(&self, requested: StdDuration) -> StdDuration {
        let elapsed = *self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        let current = self.start_time
            + ChronoDuration::from_std(elapsed).unwrap_or(ChronoDuration::zero());

        match (self.end_time - current).to_std() {
            Ok(remaining) => requested.min(remaining),
            Err(_) => StdDuration::ZERO,
        }
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        let step = self.clamp_to_end(duration);

        if self.is_fast_forward() {
            *self.elapsed.lock().unwrap_or_else(|e| e.into_inner()) += step;
            // Let the logger thread and signal thread run.
            std::thread::sleep(StdDuration::from_millis(1));
            return;
        }

        if step.is_zero() {
            return;
        }

        *self
            .sleep_in_progress
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some((Instant::now(), step));

        std::thread::sleep(StdDuration::from_secs_f64(
            step.as_secs_f64() / self.time_multiplier,
        ));

        *self
            .sleep_in_progress
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = None;
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner()) += step;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

/// Install the global time source. Only the first call has an effect.
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

fn source() -> &'static Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource))
}

pub fn now() -> DateTime<Local> {
    source().now()
}

pub fn sleep(duration: StdDuration) {
    source().sleep(duration)
}

pub fn is_simulated() -> bool {
    source().is_simulated()
}

pub fn simulation_ended() -> bool {
    source().is_ended()
}

/// Parse "YYYY-MM-DD HH:MM:SS" as a local wall-clock time.
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "Ambiguous or invalid local time".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(s: &str) -> DateTime<Local> {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("tomorrow-ish").is_err());
        assert!(parse_datetime("2026-10-17 25:00:00").is_err());
    }

    #[test]
    fn test_fast_forward_jumps_by_requested_duration() {
        let sim = SimulatedTimeSource::new(
            local("2026-03-01 22:00:00"),
            local("2026-03-02 06:00:00"),
            0.0,
        );
        assert!(sim.is_fast_forward());
        assert_eq!(sim.now(), local("2026-03-01 22:00:00"));

        sim.sleep(StdDuration::from_secs(90 * 60));
        assert_eq!(sim.now(), local("2026-03-01 23:30:00"));
        assert!(!sim.is_ended());
    }

    #[test]
    fn test_fast_forward_stops_at_end_time() {
        let sim = SimulatedTimeSource::new(
            local("2026-03-01 04:00:00"),
            local("2026-03-01 05:00:00"),
            0.0,
        );
        sim.sleep(StdDuration::from_secs(3 * 3600));
        assert_eq!(sim.now(), local("2026-03-01 05:00:00"));
        assert!(sim.is_ended());
    }

    #[test]
    fn test_negative_multiplier_falls_back_to_default() {
        let sim = SimulatedTimeSource::new(
            local("2026-03-01 04:00:00"),
            local("2026-03-01 05:00:00"),
            -5.0,
        );
        assert!(!sim.is_fast_forward());
        assert!(sim.is_simulated());
    }
}
