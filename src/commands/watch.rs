//! `suhoor watch`: keep the plan current and flag the approach of Fajr.
//!
//! The loop ticks every `refresh_interval` seconds of (possibly simulated)
//! time. Each tick only re-checks the near-Fajr window; a reload message from
//! the signal thread or the file watcher rebuilds the whole session from
//! fresh config and prayer data.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::mpsc::TryRecvError;
use std::time::Duration;

use super::{Session, times_override};
use crate::args::PlanOptions;
use crate::config::{self, Config};
use crate::io::signals::{SignalMessage, SignalState, setup_signal_handler};
use crate::sleep;
use crate::time_source;

/// Near-Fajr state as of the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Highlight {
    Off,
    On,
}

impl Highlight {
    pub(crate) fn at(now: NaiveDateTime, fajr: Option<NaiveDateTime>) -> Self {
        if sleep::is_near_fajr(now, fajr) {
            Highlight::On
        } else {
            Highlight::Off
        }
    }
}

struct WatchLoop {
    options: PlanOptions,
    debug_enabled: bool,
    /// Day the watch started; Fajr stays anchored to the day after it.
    today: NaiveDate,
    config: Config,
    session: Session,
    highlight: Highlight,
}

impl WatchLoop {
    fn start(options: PlanOptions, debug_enabled: bool) -> Result<Self> {
        let config = Config::load()?;
        if debug_enabled {
            config.log_config();
        }

        let now = time_source::now().naive_local();
        let today = now.date();
        let session = Session::build(&options, &config, today, now)?;
        session.log(now, config.time_format());

        Ok(Self {
            highlight: Highlight::at(now, session.fajr()),
            options,
            debug_enabled,
            today,
            config,
            session,
        })
    }

    /// Rebuild from disk. A broken config keeps the previous session.
    fn reload(&mut self) {
        let config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                log_pipe!();
                log_error!("Failed to reload configuration: {:#}", e);
                log_indented!("Keeping the previous plan");
                return;
            }
        };
        if self.debug_enabled {
            config.log_config();
        }

        let now = time_source::now().naive_local();
        match Session::build(&self.options, &config, self.today, now) {
            Ok(session) => {
                session.log(now, config.time_format());
                self.highlight = Highlight::at(now, session.fajr());
                self.session = session;
                self.config = config;
            }
            Err(e) => {
                log_pipe!();
                log_error!("Failed to rebuild the plan: {:#}", e);
                log_indented!("Keeping the previous plan");
            }
        }
    }

    /// Log entering and leaving the near-Fajr window.
    fn tick(&mut self) {
        let now = time_source::now().naive_local();
        let highlight = Highlight::at(now, self.session.fajr());
        if highlight == self.highlight {
            return;
        }

        match highlight {
            Highlight::On => self.session.log_highlight(now, self.config.time_format()),
            Highlight::Off => {
                log_pipe!();
                log_info!("Fajr window has passed");
            }
        }
        self.highlight = highlight;
    }

    fn run(&mut self, signal_state: &SignalState) {
        while signal_state.is_running() && !time_source::simulation_ended() {
            time_source::sleep(Duration::from_secs(self.config.refresh_interval()));

            loop {
                match signal_state.signal_receiver.try_recv() {
                    Ok(SignalMessage::Reload) => self.reload(),
                    Ok(SignalMessage::Shutdown) => return,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            self.tick();
        }
    }
}

/// Run the watch loop until a shutdown signal or the end of a simulation.
pub fn run_watch(debug_enabled: bool, options: PlanOptions) -> Result<()> {
    let signal_state = setup_signal_handler(debug_enabled)?;

    let mut watch = WatchLoop::start(options, debug_enabled)?;

    let payload = times_override(&watch.options).or_else(|| watch.config.payload_path());
    if let Err(e) =
        config::start_config_watcher(signal_state.signal_sender.clone(), payload, debug_enabled)
    {
        log_pipe!();
        log_warning!("Hot reload unavailable: {:#}", e);
        log_indented!("Send SIGUSR2 to reload manually");
    }

    log_block_start!("Watching, press Ctrl+C to stop");
    watch.run(&signal_state);

    let farewell = if time_source::simulation_ended() {
        "Simulation complete"
    } else {
        "Shutting down"
    };
    log_block_start!("{}", farewell);
    log_end!();
    Ok(())
}

/// Help for `suhoor help watch`.
pub fn display_help() {
    log_version!();
    log_block_start!("watch - Keep the plan on screen and flag Fajr");
    log_block_start!("Usage: suhoor watch [--bedtime <TIME>] [--times <FILE>]");
    log_block_start!("Behavior:");
    log_indented!("Prints the plan, then warns when Fajr is within 30 minutes");
    log_indented!("Editing the config or the prayer-time payload reloads the plan");
    log_indented!("SIGUSR2 forces a reload, SIGINT/SIGTERM/SIGHUP stop the loop");
    log_block_start!("Options:");
    log_indented!("-b, --bedtime <TIME>  Bedtime to plan for");
    log_indented!("-t, --times <FILE>    Prayer-time JSON payload to align with");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_highlight_follows_window() {
        let fajr = Some(at(2, 5, 0));
        assert_eq!(Highlight::at(at(2, 4, 29), fajr), Highlight::Off);
        assert_eq!(Highlight::at(at(2, 4, 30), fajr), Highlight::On);
        assert_eq!(Highlight::at(at(2, 5, 30), fajr), Highlight::On);
        assert_eq!(Highlight::at(at(2, 5, 31), fajr), Highlight::Off);
        assert_eq!(Highlight::at(at(2, 5, 0), None), Highlight::Off);
    }
}
