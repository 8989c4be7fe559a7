//! Unix signal handling for the watch loop.
//!
//! A background thread turns signals into [`SignalMessage`]s on an mpsc
//! channel. The config/payload watcher sends into the same channel, so the
//! loop has a single place to wait for events.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Reload config and prayer times (SIGUSR2 or a watched file changed)
    Reload,
    /// Stop the loop (SIGTERM, SIGINT, SIGHUP)
    Shutdown,
}

/// Signal handling state shared between threads
pub struct SignalState {
    /// Cleared once a shutdown signal arrives
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
    /// Extra senders are handed to the file watcher
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Map a raw signal number to the message it triggers.
pub(crate) fn message_for(signal: i32) -> Option<SignalMessage> {
    match signal {
        SIGUSR2 => Some(SignalMessage::Reload),
        SIGINT | SIGTERM | SIGHUP => Some(SignalMessage::Shutdown),
        _ => None,
    }
}

/// Set up signal handling for the watch loop.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (signal_sender, signal_receiver) = channel::<SignalMessage>();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running_clone = running.clone();
    let sender_clone = signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            let Some(message) = message_for(sig) else {
                continue;
            };

            if debug_enabled {
                log_pipe!();
                log_debug!("Received signal {sig}");
            }

            match message {
                SignalMessage::Reload => {
                    log_pipe!();
                    log_info!("Received reload signal");
                    if sender_clone.send(message).is_err() {
                        break;
                    }
                }
                SignalMessage::Shutdown => {
                    running_clone.store(false, Ordering::SeqCst);
                    let _ = sender_clone.send(message);
                    break;
                }
            }
        }
    });

    Ok(SignalState {
        running,
        signal_receiver,
        signal_sender,
    })
}
