//! Help command implementation for suhoor.
//!
//! Dispatches `suhoor help [COMMAND]` to the per-command help pages.

use anyhow::Result;

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("plan") | Some("p") => super::plan::display_help(),
        Some("watch") | Some("w") => super::watch::display_help(),
        Some("simulate") | Some("S") => super::simulate::display_help(),
        Some("help") | Some("h") => display_help_help(),
        Some(unknown) => {
            log_warning_standalone!("Unknown command: {}", unknown);
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("plan, p                 Print wake-up times for a bedtime (default)");
    log_indented!("watch, w                Keep the plan up to date and flag Fajr");
    log_indented!("simulate, S <s> <e>     Run the watch loop on simulated time");
    log_indented!("help, h [COMMAND]       Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'suhoor help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'suhoor --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: suhoor help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("suhoor help");
    log_indented!("suhoor help plan");
    log_end!();
}
