//! `suhoor plan`: print the wake-up candidates for one bedtime.

use anyhow::Result;

use super::Session;
use crate::args::PlanOptions;
use crate::config::Config;
use crate::logger::Log;
use crate::time_source;

/// Run the plan command.
///
/// With `json` the logger is silenced and stdout carries only the plan
/// document, so it can be piped into other tools.
pub fn run_plan(debug_enabled: bool, options: PlanOptions, json: bool) -> Result<()> {
    if json {
        Log::set_enabled(false);
    }

    log_version!();

    let config = Config::load()?;
    if debug_enabled {
        config.log_config();
    }

    let now = time_source::now().naive_local();
    let session = Session::build(&options, &config, now.date(), now)?;

    if json {
        println!("{}", session.plan.to_json_pretty()?);
        return Ok(());
    }

    session.log(now, config.time_format());
    log_end!();
    Ok(())
}

/// Help for `suhoor help plan`.
pub fn display_help() {
    log_version!();
    log_block_start!("plan - Print wake-up times aligned with Fajr");
    log_block_start!("Usage: suhoor plan [--bedtime <TIME>] [--times <FILE>] [--json]");
    log_block_start!("Options:");
    log_indented!("-b, --bedtime <TIME>  HH:MM (today) or \"YYYY-MM-DD HH:MM\"");
    log_indented!("                      Defaults to 'bedtime' in the config, then now");
    log_indented!("-t, --times <FILE>    Prayer-time JSON payload to align with");
    log_indented!("-j, --json            Print the plan as JSON and nothing else");
    log_block_start!("Bands:");
    log_indented!("Recommended  wake 21-74 minutes before Fajr");
    log_indented!("Warning      wake 1-20 minutes before Fajr");
    log_indented!("TooLate      wake at or after Fajr");
    log_indented!("Neutral      anything else, or Fajr unknown");
    log_block_start!("Examples:");
    log_indented!("suhoor plan --bedtime 22:00");
    log_indented!("suhoor plan -t ~/prayer-times.json --json");
    log_end!();
}
