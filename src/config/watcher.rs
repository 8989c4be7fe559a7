//! File watching for hot reload.
//!
//! Watches the config file and, when one is configured, the prayer-time
//! payload. Any change sends [`SignalMessage::Reload`] to the watch loop.

use anyhow::{Context, Result};
use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use crate::common::utils::private_path;
use crate::io::signals::SignalMessage;

/// Editors often write a file in several steps; collapse those into one reload.
const DEBOUNCE_MS: u64 = 500;

pub struct ConfigWatcher {
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
    watched_paths: Vec<PathBuf>,
}

/// True when `event_path` is `watched` or an editor temp file next to it.
pub(crate) fn affects(event_path: &Path, watched: &Path) -> bool {
    if event_path == watched {
        return true;
    }
    if event_path.parent() != watched.parent() {
        return false;
    }
    match (
        event_path.file_name().and_then(|n| n.to_str()),
        watched.file_name().and_then(|n| n.to_str()),
    ) {
        (Some(event_name), Some(watched_name)) => {
            event_name.starts_with(watched_name)
                || event_name.trim_start_matches('.').starts_with(watched_name)
        }
        _ => false,
    }
}

impl ConfigWatcher {
    pub fn new(
        signal_sender: Sender<SignalMessage>,
        paths: Vec<PathBuf>,
        debug_enabled: bool,
    ) -> Self {
        Self {
            signal_sender,
            debug_enabled,
            watched_paths: paths,
        }
    }

    /// Spawn the watcher thread. Paths whose directory does not exist are skipped.
    pub fn start(self) -> Result<()> {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    )
                {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default(),
        )
        .context("Failed to create file watcher")?;

        // Watch parent directories: editors replace files rather than write in place.
        let mut watched_dirs = HashSet::new();
        for path in &self.watched_paths {
            if let Some(parent) = path.parent()
                && parent.is_dir()
                && watched_dirs.insert(parent.to_path_buf())
            {
                watcher
                    .watch(parent, RecursiveMode::NonRecursive)
                    .with_context(|| format!("Failed to watch directory: {}", parent.display()))?;
            }
        }

        if watched_dirs.is_empty() {
            if self.debug_enabled {
                log_pipe!();
                log_debug!("No files to watch for hot reload");
            }
            return Ok(());
        }

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Watching for changes:");
            for path in &self.watched_paths {
                log_indented!("{}", private_path(path));
            }
        }

        let ConfigWatcher {
            signal_sender,
            debug_enabled,
            watched_paths,
        } = self;

        thread::spawn(move || {
            let _watcher = watcher;
            let mut last_reload: Option<Instant> = None;

            for event in rx {
                let relevant = event
                    .paths
                    .iter()
                    .any(|p| watched_paths.iter().any(|w| affects(p, w)));
                if !relevant {
                    continue;
                }

                if let Some(last) = last_reload
                    && last.elapsed() < Duration::from_millis(DEBOUNCE_MS)
                {
                    continue;
                }

                if debug_enabled {
                    log_pipe!();
                    log_info!("File change detected, reloading");
                }

                if signal_sender.send(SignalMessage::Reload).is_err() {
                    break;
                }
                last_reload = Some(Instant::now());
            }
        });

        Ok(())
    }
}

/// Start watching the config file and, if given, the prayer-time payload.
pub fn start_config_watcher(
    signal_sender: Sender<SignalMessage>,
    payload_path: Option<PathBuf>,
    debug_enabled: bool,
) -> Result<()> {
    let mut paths = vec![super::get_config_path()?];
    paths.extend(payload_path);

    ConfigWatcher::new(signal_sender, paths, debug_enabled).start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affects_exact_and_temp_files() {
        let watched = Path::new("/home/u/.config/suhoor/suhoor.toml");

        assert!(affects(watched, watched));
        assert!(affects(
            Path::new("/home/u/.config/suhoor/suhoor.toml~"),
            watched
        ));
        assert!(affects(
            Path::new("/home/u/.config/suhoor/.suhoor.toml.swp"),
            watched
        ));
        assert!(!affects(
            Path::new("/home/u/.config/suhoor/other.toml"),
            watched
        ));
        assert!(!affects(Path::new("/tmp/suhoor.toml"), watched));
    }
}
