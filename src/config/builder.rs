//! Default config file creation.
//!
//! The generated file is built with [`ConfigBuilder`] so that every setting
//! carries an aligned explanatory comment. Location and prayer-time keys are
//! written commented out: there is no sensible default for them.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::common::constants::*;

pub const DEFAULT_BEDTIME: &str = "22:30";

/// Write the commented default configuration to `path`.
pub fn create_default_config(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", path.display()))?;

    log_block_start!("Created default configuration");
    log_indented!("{}", crate::common::utils::private_path(path));
    Ok(())
}

pub(crate) fn default_config_content() -> String {
    let formats = SUPPORTED_TIME_FORMATS
        .iter()
        .map(|f| format!("\"{f}\""))
        .collect::<Vec<_>>()
        .join(" or ");

    ConfigBuilder::new()
        .add_section("Sleep")
        .add_setting(
            "bedtime",
            &format!("\"{DEFAULT_BEDTIME}\""),
            "Default bedtime when --bedtime is omitted (HH:MM)",
        )
        .add_setting(
            "time_format",
            &format!("\"{DEFAULT_TIME_FORMAT}\""),
            &format!("Clock display: {formats}"),
        )
        .add_setting(
            "refresh_interval",
            &DEFAULT_REFRESH_INTERVAL.to_string(),
            &format!(
                "Watch-loop tick in seconds ({MINIMUM_REFRESH_INTERVAL}-{MAXIMUM_REFRESH_INTERVAL})"
            ),
        )
        .add_section("Location")
        .add_disabled_setting("city", "\"Cairo\"", "Display only")
        .add_disabled_setting("country", "\"Egypt\"", "Display only")
        .add_section("Prayer times")
        .add_disabled_setting(
            "payload_path",
            "\"~/prayer-times.json\"",
            "JSON payload written by a prayer-time tool",
        )
        .add_disabled_setting("fajr", "\"04:32\"", "Manual times, used without a payload")
        .add_disabled_setting("dhuhr", "\"11:52\"", "")
        .add_disabled_setting("asr", "\"15:08\"", "")
        .add_disabled_setting("maghrib", "\"17:41\"", "")
        .add_disabled_setting("isha", "\"18:59\"", "")
        .add_disabled_setting("timezone", "\"Africa/Cairo\"", "IANA name, display only")
        .add_disabled_setting(
            "method",
            "\"Egyptian General Authority of Survey\"",
            "Calculation method name",
        )
        .build()
}

/// Builder for a TOML file with aligned trailing comments.
struct ConfigBuilder {
    entries: Vec<Entry>,
}

enum Entry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(Entry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(Entry::Setting {
            line: format!("{key} = {value}"),
            comment: comment.to_string(),
        });
        self
    }

    /// A setting written as a comment for the user to enable.
    fn add_disabled_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(Entry::Setting {
            line: format!("# {key} = {value}"),
            comment: comment.to_string(),
        });
        self
    }

    fn build(self) -> String {
        let width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Setting { line, .. } => Some(line.chars().count()),
                Entry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for (i, entry) in self.entries.into_iter().enumerate() {
            match entry {
                Entry::Section(title) => {
                    if i > 0 {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                Entry::Setting { line, comment } if comment.is_empty() => lines.push(line),
                Entry::Setting { line, comment } => {
                    let padding = " ".repeat(width - line.chars().count());
                    lines.push(format!("{line}{padding}# {comment}"));
                }
            }
        }

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }
}
