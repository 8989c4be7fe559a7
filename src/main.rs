//! Main application entry point.
//!
//! Parses the command line and dispatches to the command handlers in the
//! library. Every error is reported once here, through the logger, before the
//! process exits with [`EXIT_FAILURE`].

use anyhow::Result;

use suhoor::args::{self, CliAction, ParsedArgs};
use suhoor::commands::{self, simulate::SimulationParams};
use suhoor::common::constants::EXIT_FAILURE;
use suhoor::config;
use suhoor::logger::Log;
use suhoor::log_error_exit;

fn run(action: CliAction) -> Result<()> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp | CliAction::ShowHelpDueToError => {
            args::display_help();
            Ok(())
        }
        CliAction::HelpCommand { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Plan {
            debug_enabled,
            config_dir,
            options,
            json,
        } => {
            config::set_config_dir(config_dir)?;
            commands::plan::run_plan(debug_enabled, options, json)
        }
        CliAction::Watch {
            debug_enabled,
            config_dir,
            options,
        } => {
            config::set_config_dir(config_dir)?;
            commands::watch::run_watch(debug_enabled, options)
        }
        CliAction::Simulate {
            debug_enabled,
            config_dir,
            options,
            start_time,
            end_time,
            multiplier,
            log_to_file,
        } => {
            config::set_config_dir(config_dir)?;
            commands::simulate::run_simulate(
                debug_enabled,
                options,
                SimulationParams {
                    start_time,
                    end_time,
                    multiplier,
                    log_to_file,
                },
            )
        }
    }
}

fn main() {
    let parsed_args = ParsedArgs::from_env();
    let failed_usage = parsed_args.action == CliAction::ShowHelpDueToError;

    if let Err(e) = run(parsed_args.action) {
        // `--json` silences the logger; errors must still be visible.
        Log::set_enabled(true);
        log_error_exit!("{:#}", e);
        std::process::exit(EXIT_FAILURE);
    }

    if failed_usage {
        std::process::exit(EXIT_FAILURE);
    }
}
