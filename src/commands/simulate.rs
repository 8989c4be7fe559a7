//! `suhoor simulate`: replay a night on an accelerated clock.
//!
//! Installs a [`SimulatedTimeSource`] and then runs the normal watch loop, so
//! the near-Fajr highlight can be checked without waiting for dawn.

use anyhow::{Context, Result};
use chrono::Local;
use std::sync::Arc;

use crate::args::{FAST_FORWARD_MULTIPLIER, PlanOptions};
use crate::config::Config;
use crate::logger::{Log, LoggerGuard};
use crate::prayer::select_provider;
use crate::time_source::{self, DEFAULT_SIMULATION_MULTIPLIER, SimulatedTimeSource};

/// Parameters of a `simulate` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub start_time: String,
    pub end_time: String,
    /// 0.0 = default acceleration, [`FAST_FORWARD_MULTIPLIER`] = fast-forward
    pub multiplier: f64,
    pub log_to_file: bool,
}

/// Multiplier to hand to [`SimulatedTimeSource`], which reads 0.0 as fast-forward.
pub(crate) fn time_source_multiplier(multiplier: f64) -> f64 {
    if multiplier == FAST_FORWARD_MULTIPLIER {
        0.0
    } else if multiplier <= 0.0 {
        DEFAULT_SIMULATION_MULTIPLIER
    } else {
        multiplier
    }
}

/// Timezone announced by the prayer-time source, if any can be read.
fn prayer_timezone(options: &PlanOptions) -> Option<chrono_tz::Tz> {
    let config = Config::load().ok()?;
    let times_path = super::times_override(options);
    let provider = select_provider(times_path.as_deref(), &config)?;
    provider.fetch().ok()?.tz()
}

/// Install the simulated clock and announce the run.
///
/// Returns the file-logging guard when `--log` was given; output goes to the
/// file until it is dropped.
fn setup_simulation(
    params: &SimulationParams,
    options: &PlanOptions,
    debug_enabled: bool,
) -> Result<Option<LoggerGuard>> {
    let start = time_source::parse_datetime(&params.start_time)
        .map_err(|e| anyhow::anyhow!("Invalid start time: {}", e))?;
    let end = time_source::parse_datetime(&params.end_time)
        .map_err(|e| anyhow::anyhow!("Invalid end time: {}", e))?;

    if end <= start {
        anyhow::bail!("End time must be after start time");
    }

    let multiplier = time_source_multiplier(params.multiplier);

    // Must precede any logging so every line carries a simulated timestamp.
    time_source::init_time_source(Arc::new(SimulatedTimeSource::new(start, end, multiplier)));
    Log::set_prayer_timezone(prayer_timezone(options));

    let guard = if params.log_to_file {
        let log_filename = format!(
            "suhoor-simulation-{}.log",
            Local::now().format("%Y%m%d-%H%M%S")
        );
        println!("Writing simulation output to {log_filename}");
        Some(Log::start_file_logging(log_filename).context("Failed to start file logging")?)
    } else {
        None
    };

    log_version!();
    log_block_start!("Simulation Mode");
    log_decorated!(
        "Simulating from {} to {}",
        start.format("%Y-%m-%d %H:%M:%S"),
        end.format("%Y-%m-%d %H:%M:%S")
    );

    let duration = end.signed_duration_since(start);
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );

    if multiplier == 0.0 {
        log_indented!("Time acceleration: fast-forward (instant execution)");
    } else {
        log_indented!(
            "Time acceleration: {}x (will complete in ~{:.1} seconds)",
            multiplier as u64,
            duration.num_seconds() as f64 / multiplier
        );
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Simulated time source initialized");
    }

    Ok(guard)
}

/// Run the watch loop on simulated time.
pub fn run_simulate(
    debug_enabled: bool,
    options: PlanOptions,
    params: SimulationParams,
) -> Result<()> {
    let _guard = setup_simulation(&params, &options, debug_enabled)?;
    super::watch::run_watch(debug_enabled, options)
}

/// Help for `suhoor help simulate`.
pub fn display_help() {
    log_version!();
    log_block_start!("simulate - Run the watch loop on simulated time");
    log_block_start!(
        "Usage: suhoor simulate <start> <end> [multiplier | --fast-forward] [--log]"
    );
    log_block_start!("Arguments:");
    log_indented!("start, end    \"YYYY-MM-DD HH:MM:SS\" in local time");
    log_indented!("multiplier    0.1 to 3600 (default 3600, one hour per second)");
    log_block_start!("Options:");
    log_indented!("--fast-forward        Skip every wait instantly");
    log_indented!("--log                 Write output to suhoor-simulation-<time>.log");
    log_indented!("-b, --bedtime <TIME>  Bedtime to plan for");
    log_indented!("-t, --times <FILE>    Prayer-time JSON payload to align with");
    log_block_start!("Example:");
    log_indented!("suhoor simulate \"2026-03-01 22:00:00\" \"2026-03-02 06:00:00\" --fast-forward");
    log_end!();
}
