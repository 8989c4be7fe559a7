//! Command-line argument parsing and processing.
//!
//! ```text
//! suhoor [OPTIONS] [COMMAND]
//!   plan     [--bedtime <TIME>] [--times <FILE>] [--json]      (default)
//!   watch    [--bedtime <TIME>] [--times <FILE>]
//!   simulate <start> <end> [multiplier | --fast-forward] [--log]
//!   help     [COMMAND]
//! ```
//!
//! Options may appear before or after the command. Unknown options and
//! malformed command arguments produce [`CliAction::ShowHelpDueToError`].

/// Multiplier bounds accepted for `simulate`.
const MIN_SIMULATION_MULTIPLIER: f64 = 0.1;
const MAX_SIMULATION_MULTIPLIER: f64 = 3600.0;

/// Sentinel passed to the simulate command for `--fast-forward`.
pub const FAST_FORWARD_MULTIPLIER: f64 = -1.0;

/// Inputs shared by every command that builds a plan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanOptions {
    /// Bedtime from `--bedtime`, overriding the config default.
    pub bedtime: Option<String>,
    /// Payload from `--times`, overriding the config's prayer-time source.
    pub times_path: Option<String>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Print the classified plan once
    Plan {
        debug_enabled: bool,
        config_dir: Option<String>,
        options: PlanOptions,
        json: bool,
    },
    /// Keep the plan on screen and refresh it
    Watch {
        debug_enabled: bool,
        config_dir: Option<String>,
        options: PlanOptions,
    },
    /// Run the watch loop on simulated time
    Simulate {
        debug_enabled: bool,
        config_dir: Option<String>,
        options: PlanOptions,
        start_time: String,
        end_time: String,
        /// 0.0 = default acceleration, [`FAST_FORWARD_MULTIPLIER`] = fast-forward
        multiplier: f64,
        log_to_file: bool,
    },
    /// `help [COMMAND]`
    HelpCommand { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Plan,
    Watch,
    Simulate,
    Help,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "plan" | "p" => Some(Command::Plan),
            "watch" | "w" => Some(Command::Watch),
            "simulate" | "S" => Some(Command::Simulate),
            "help" | "h" => Some(Command::Help),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Command::Plan => "plan",
            Command::Watch => "watch",
            Command::Simulate => "simulate",
            Command::Help => "help",
        }
    }
}

fn usage_error(message: &str) -> ParsedArgs {
    log_warning_standalone!("{}", message);
    ParsedArgs {
        action: CliAction::ShowHelpDueToError,
    }
}

fn is_valid_simulation_datetime(s: &str) -> bool {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Version and help flags win over everything else.
        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.iter().any(|arg| arg == "--help") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let mut debug_enabled = false;
        let mut config_dir: Option<String> = None;
        let mut options = PlanOptions::default();
        let mut json = false;
        let mut log_to_file = false;
        let mut fast_forward = false;
        let mut command: Option<Command> = None;
        let mut positionals: Vec<String> = Vec::new();

        let mut i = 0;
        while i < args_vec.len() {
            let arg = args_vec[i].as_str();
            match arg {
                "--debug" | "-d" => debug_enabled = true,
                "--json" | "-j" => json = true,
                "--log" => log_to_file = true,
                "--fast-forward" => fast_forward = true,
                "-h" => {
                    return ParsedArgs {
                        action: CliAction::ShowHelp,
                    };
                }
                "--config" | "-c" | "--bedtime" | "-b" | "--times" | "-t" => {
                    let Some(value) = args_vec.get(i + 1).filter(|v| !v.starts_with('-')) else {
                        return usage_error(&format!("Missing value for {arg}"));
                    };
                    match arg {
                        "--config" | "-c" => config_dir = Some(value.clone()),
                        "--bedtime" | "-b" => options.bedtime = Some(value.clone()),
                        _ => options.times_path = Some(value.clone()),
                    }
                    i += 1;
                }
                _ if arg.starts_with('-') && arg.len() > 1 && arg.parse::<f64>().is_err() => {
                    return usage_error(&format!("Unknown option: {arg}"));
                }
                _ if command.is_none() => match Command::from_arg(arg) {
                    Some(cmd) => command = Some(cmd),
                    None => return usage_error(&format!("Unknown command: {arg}")),
                },
                _ => positionals.push(arg.to_string()),
            }
            i += 1;
        }

        let command = command.unwrap_or(Command::Plan);

        if json && command != Command::Plan {
            return usage_error("--json is only supported by 'plan'");
        }
        if (log_to_file || fast_forward) && command != Command::Simulate {
            return usage_error("--log and --fast-forward are only supported by 'simulate'");
        }

        let action = match command {
            Command::Plan | Command::Watch if !positionals.is_empty() => {
                return usage_error(&format!(
                    "Unexpected argument for '{}': {}",
                    command.name(),
                    positionals[0]
                ));
            }
            Command::Plan => CliAction::Plan {
                debug_enabled,
                config_dir,
                options,
                json,
            },
            Command::Watch => CliAction::Watch {
                debug_enabled,
                config_dir,
                options,
            },
            Command::Help => {
                if positionals.len() > 1 {
                    return usage_error("Usage: suhoor help [COMMAND]");
                }
                CliAction::HelpCommand {
                    command: positionals.into_iter().next(),
                }
            }
            Command::Simulate => {
                let (start_time, end_time, multiplier) = match positionals.as_slice() {
                    [start, end] => (start.clone(), end.clone(), None),
                    [start, end, mult] => (start.clone(), end.clone(), Some(mult.clone())),
                    _ => {
                        return usage_error(
                            "Usage: suhoor simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [multiplier | --fast-forward] [--log]",
                        );
                    }
                };

                if !is_valid_simulation_datetime(&start_time) {
                    return usage_error(&format!(
                        "Invalid start time '{start_time}'. Use YYYY-MM-DD HH:MM:SS"
                    ));
                }
                if !is_valid_simulation_datetime(&end_time) {
                    return usage_error(&format!(
                        "Invalid end time '{end_time}'. Use YYYY-MM-DD HH:MM:SS"
                    ));
                }

                let multiplier = match (multiplier, fast_forward) {
                    (Some(_), true) => {
                        return usage_error("Use either a multiplier or --fast-forward, not both");
                    }
                    (None, true) => FAST_FORWARD_MULTIPLIER,
                    (None, false) => 0.0,
                    (Some(m), false) => match m.parse::<f64>() {
                        Ok(value)
                            if (MIN_SIMULATION_MULTIPLIER..=MAX_SIMULATION_MULTIPLIER)
                                .contains(&value) =>
                        {
                            value
                        }
                        _ => {
                            return usage_error(&format!(
                                "Invalid multiplier: {m}. Must be between {MIN_SIMULATION_MULTIPLIER} and {MAX_SIMULATION_MULTIPLIER}."
                            ));
                        }
                    },
                };

                CliAction::Simulate {
                    debug_enabled,
                    config_dir,
                    options,
                    start_time,
                    end_time,
                    multiplier,
                    log_to_file,
                }
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    crate::logger::write_output(&format!("┗ {}\n", env!("CARGO_PKG_DESCRIPTION")));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("suhoor [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-b, --bedtime <time>   Bedtime as HH:MM or \"YYYY-MM-DD HH:MM\"");
    log_indented!("-t, --times <file>     Read prayer times from this JSON payload");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("plan, p                Print wake-up times for a bedtime (default)");
    log_indented!("watch, w               Keep the plan up to date and flag Fajr");
    log_indented!("simulate, S <start> <end> [multiplier]");
    log_indented!("                       Run the watch loop on simulated time");
    log_indented!("help, h [COMMAND]      Show detailed help for a command");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(debug_enabled: bool, options: PlanOptions, json: bool) -> CliAction {
        CliAction::Plan {
            debug_enabled,
            config_dir: None,
            options,
            json,
        }
    }

    #[test]
    fn test_parse_no_args_defaults_to_plan() {
        let parsed = ParsedArgs::parse(vec!["suhoor"]);
        assert_eq!(parsed.action, plan(false, PlanOptions::default(), false));
    }

    #[test]
    fn test_parse_debug_flag() {
        let parsed = ParsedArgs::parse(vec!["suhoor", "-d"]);
        assert_eq!(parsed.action, plan(true, PlanOptions::default(), false));
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "--help"]).action,
            CliAction::ShowHelp
        );
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "-h"]).action,
            CliAction::ShowHelp
        );
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "-V"]).action,
            CliAction::ShowVersion
        );
        // Version takes precedence
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "--help", "--version", "-d"]).action,
            CliAction::ShowVersion
        );
    }

    #[test]
    fn test_parse_plan_with_options() {
        let parsed = ParsedArgs::parse(vec![
            "suhoor",
            "plan",
            "--bedtime",
            "22:00",
            "--times",
            "/tmp/times.json",
            "--json",
        ]);
        assert_eq!(
            parsed.action,
            plan(
                false,
                PlanOptions {
                    bedtime: Some("22:00".into()),
                    times_path: Some("/tmp/times.json".into()),
                },
                true
            )
        );
    }

    #[test]
    fn test_parse_options_before_command() {
        let parsed = ParsedArgs::parse(vec!["suhoor", "-c", "/etc/suhoor", "-b", "23:30", "watch"]);
        assert_eq!(
            parsed.action,
            CliAction::Watch {
                debug_enabled: false,
                config_dir: Some("/etc/suhoor".into()),
                options: PlanOptions {
                    bedtime: Some("23:30".into()),
                    times_path: None,
                },
            }
        );
    }

    #[test]
    fn test_parse_missing_option_value() {
        for args in [
            vec!["suhoor", "--bedtime"],
            vec!["suhoor", "--config"],
            vec!["suhoor", "-t", "-d"],
        ] {
            assert_eq!(
                ParsedArgs::parse(args).action,
                CliAction::ShowHelpDueToError
            );
        }
    }

    #[test]
    fn test_parse_unknown_flag_and_command() {
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "--unknown"]).action,
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "sleep"]).action,
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "plan", "extra"]).action,
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_json_only_for_plan() {
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "watch", "--json"]).action,
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_parse_simulate() {
        let parsed = ParsedArgs::parse(vec![
            "suhoor",
            "simulate",
            "2026-03-01 22:00:00",
            "2026-03-02 06:00:00",
            "600",
            "--log",
            "-b",
            "22:00",
        ]);
        assert_eq!(
            parsed.action,
            CliAction::Simulate {
                debug_enabled: false,
                config_dir: None,
                options: PlanOptions {
                    bedtime: Some("22:00".into()),
                    times_path: None,
                },
                start_time: "2026-03-01 22:00:00".into(),
                end_time: "2026-03-02 06:00:00".into(),
                multiplier: 600.0,
                log_to_file: true,
            }
        );
    }

    #[test]
    fn test_parse_simulate_fast_forward_and_default() {
        let fast = ParsedArgs::parse(vec![
            "suhoor",
            "S",
            "2026-03-01 22:00:00",
            "2026-03-02 06:00:00",
            "--fast-forward",
        ]);
        assert!(matches!(
            fast.action,
            CliAction::Simulate { multiplier, .. } if multiplier == FAST_FORWARD_MULTIPLIER
        ));

        let default = ParsedArgs::parse(vec![
            "suhoor",
            "simulate",
            "2026-03-01 22:00:00",
            "2026-03-02 06:00:00",
        ]);
        assert!(matches!(
            default.action,
            CliAction::Simulate { multiplier, .. } if multiplier == 0.0
        ));
    }

    #[test]
    fn test_parse_simulate_rejects_bad_input() {
        for args in [
            vec!["suhoor", "simulate", "2026-03-01 22:00:00"],
            vec!["suhoor", "simulate", "yesterday", "2026-03-02 06:00:00"],
            vec![
                "suhoor",
                "simulate",
                "2026-03-01 22:00:00",
                "2026-03-02 06:00:00",
                "99999",
            ],
            vec![
                "suhoor",
                "simulate",
                "2026-03-01 22:00:00",
                "2026-03-02 06:00:00",
                "60",
                "--fast-forward",
            ],
        ] {
            assert_eq!(
                ParsedArgs::parse(args).action,
                CliAction::ShowHelpDueToError
            );
        }
    }

    #[test]
    fn test_parse_help_command() {
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "help"]).action,
            CliAction::HelpCommand { command: None }
        );
        assert_eq!(
            ParsedArgs::parse(vec!["suhoor", "help", "plan"]).action,
            CliAction::HelpCommand {
                command: Some("plan".into())
            }
        );
    }
}
