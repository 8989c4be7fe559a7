//! Structured logging system with visual formatting.
//!
//! All terminal output of suhoor goes through the macros defined here. They
//! produce the box-drawing layout used across the application:
//!
//! ```text
//! ┏ suhoor v0.3.0 ━━╸
//! ┃
//! ┣ Sleep plan for bedtime 22:00
//! ┃   01:00  2 cycles (3.0h)  Neutral
//! ┃
//! ┣[WARNING] Prayer times unavailable
//! ╹
//! ```
//!
//! Logging can be switched off at runtime (used by `--json` so that stdout
//! only carries the JSON document) and can be redirected to a file through a
//! background writer thread (used by `simulate --log`).

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Timezone announced by the prayer-time payload, shown next to local time
// in simulation timestamps when the two differ.
static PRAYER_TIMEZONE: OnceLock<Option<chrono_tz::Tz>> = OnceLock::new();

static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Line layouts understood by [`emit`].
///
/// Conventions:
/// - `Block` opens a new conceptual block (a spacer pipe, then `┣ message`).
/// - `Decorated` continues the current block.
/// - `Indented` lists details that belong to the preceding line.
/// - `Pipe` is a bare spacer, used before a leveled message that starts a block.
/// - The leveled layouts (`Info`, `Warning`, ...) carry a colored `[LEVEL]` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Block,
    Decorated,
    Indented,
    Pipe,
    Version,
    End,
    Info,
    Debug,
    Warning,
    WarningStandalone,
    Error,
    ErrorExit,
}

/// Main logging interface.
pub struct Log;

impl Log {
    /// Enable or disable logging.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Record the prayer payload's timezone for simulation timestamps.
    /// Only the first call has an effect.
    pub fn set_prayer_timezone(tz: Option<chrono_tz::Tz>) {
        let _ = PRAYER_TIMEZONE.set(tz);
    }

    fn prayer_timezone() -> Option<chrono_tz::Tz> {
        PRAYER_TIMEZONE.get().and_then(|tz| *tz)
    }

    /// Route all further output to `file_path` until the guard is dropped.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => file.write_all(text.as_bytes())?,
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Timestamp prefix shown while running on simulated time.
    ///
    /// Shows `[HH:MM:SS] ` normally, or `[HH:MM:SSP] [HH:MM:SSL] ` when the
    /// prayer payload's timezone renders the instant differently from the
    /// local clock. Empty outside simulation.
    pub fn timestamp_prefix() -> String {
        if !(crate::time_source::is_initialized() && crate::time_source::is_simulated()) {
            return String::new();
        }

        let local_now = crate::time_source::now();
        let local_str = local_now.format("%H:%M:%S").to_string();

        match Self::prayer_timezone() {
            Some(tz) => {
                let prayer_str = local_now.with_timezone(&tz).format("%H:%M:%S").to_string();
                if prayer_str != local_str {
                    format!("[{prayer_str}P] [{local_str}L] ")
                } else {
                    format!("[{local_str}] ")
                }
            }
            None => format!("[{local_str}] "),
        }
    }
}

/// Keeps the file logger thread alive; flushes and joins it on drop.
#[derive(Debug)]
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Write already formatted text to the active sink.
pub fn write_output(text: &str) {
    if let Some(Some(tx)) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Render `message` in the given layout. Used by the logging macros.
pub fn emit(line: Line, message: &str) {
    if !Log::is_enabled() {
        return;
    }
    write_output(&render(line, message, &Log::timestamp_prefix()));
}

fn render(line: Line, message: &str, p: &str) -> String {
    match line {
        Line::Block => format!("{p}┃\n{p}┣ {message}\n"),
        Line::Decorated => format!("{p}┣ {message}\n"),
        Line::Indented => format!("{p}┃   {message}\n"),
        Line::Pipe => format!("{p}┃\n"),
        Line::Version => format!("{p}┏ suhoor v{} ━━╸\n", env!("CARGO_PKG_VERSION")),
        Line::End => format!("{p}╹\n"),
        Line::Info => format!("{p}┣[\x1b[32mINFO\x1b[0m] {message}\n"),
        Line::Debug => format!("{p}┣[\x1b[32mDEBUG\x1b[0m] {message}\n"),
        Line::Warning => format!("{p}┣[\x1b[33mWARNING\x1b[0m] {message}\n"),
        Line::WarningStandalone => format!("{p}[\x1b[33mWARNING\x1b[0m] {message}\n"),
        Line::Error => format!("{p}┣[\x1b[31mERROR\x1b[0m] {message}\n"),
        Line::ErrorExit => format!("{p}┃\n{p}┗[\x1b[31mERROR\x1b[0m] {message}\n"),
    }
}

// # Logging Macros

#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($line:ident, $fmt:literal $($arg:tt)*) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit($crate::logger::Line::$line, &format!($fmt $($arg)*));
        }
    }};
    ($line:ident, $expr:expr) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit($crate::logger::Line::$line, &$expr.to_string());
        }
    }};
}

/// Continue the current block: `┣ message`.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => { $crate::__log_line!(Decorated, $($arg)+) };
}

/// Detail line under the previous message: `┃   message`.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => { $crate::__log_line!(Indented, $($arg)+) };
}

/// Open a new block: spacer pipe, then `┣ message`.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => { $crate::__log_line!(Block, $($arg)+) };
}

/// Bare spacer pipe.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::emit($crate::logger::Line::Pipe, "")
    };
}

/// Application header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::emit($crate::logger::Line::Version, "")
    };
}

/// Final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::emit($crate::logger::Line::End, "")
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => { $crate::__log_line!(Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => { $crate::__log_line!(Debug, $($arg)+) };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => { $crate::__log_line!(Warning, $($arg)+) };
}

/// Warning outside the box-drawing flow, e.g. before help output.
#[macro_export]
macro_rules! log_warning_standalone {
    ($($arg:tt)+) => { $crate::__log_line!(WarningStandalone, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => { $crate::__log_line!(Error, $($arg)+) };
}

/// Error that terminates the flow: spacer pipe, then `┗[ERROR] message`.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => { $crate::__log_line!(ErrorExit, $($arg)+) };
}
