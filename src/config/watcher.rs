//! File watcher for the key/value config file.
//!
//! Watches the directory of the installed file and the override directory,
//! and emits an event whenever a file with the config file's name changes
//! in either. Rapid changes are debounced.

use notify_debouncer_mini::{DebouncedEvent, DebouncedEventKind, new_debouncer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Events emitted when the config file changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChangeEvent {
    /// The installed or override config file changed.
    ConfigFile(PathBuf),
    /// Watcher encountered an error.
    Error(String),
}

impl FileChangeEvent {
    pub fn requires_reload(&self) -> bool {
        !matches!(self, FileChangeEvent::Error(_))
    }
}

/// Configuration for the file watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub debounce_duration: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_duration: Duration::from_millis(500),
        }
    }
}

/// Locations to watch.
#[derive(Debug, Clone)]
pub struct WatchPaths {
    /// The installed config file.
    pub canonical: PathBuf,
    /// Directory searched for the override.
    pub working_dir: PathBuf,
}

impl WatchPaths {
    fn file_name(&self) -> Option<OsString> {
        self.canonical.file_name().map(|n| n.to_os_string())
    }

    fn dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(parent) = self.canonical.parent()
            && !parent.as_os_str().is_empty()
        {
            dirs.push(parent.to_path_buf());
        }
        if !dirs.iter().any(|d| same_dir(d, &self.working_dir)) {
            dirs.push(self.working_dir.clone());
        }
        dirs
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Handle to a running watcher. Dropping it stops the watcher.
pub struct FileWatcherHandle {
    pub events: watch::Receiver<Option<FileChangeEvent>>,
    _task_handle: tokio::task::JoinHandle<()>,
}

impl FileWatcherHandle {
    /// Wait for the next change event. Returns `None` once the watcher stops.
    pub async fn wait_for_change(&mut self) -> Option<FileChangeEvent> {
        loop {
            if self.events.changed().await.is_err() {
                return None;
            }
            let event = self.events.borrow().clone();
            if event.is_some() {
                return event;
            }
        }
    }
}

/// Start watching the config file locations. Must run inside a tokio runtime.
pub fn start_file_watcher(
    paths: WatchPaths,
    config: WatcherConfig,
) -> Result<FileWatcherHandle, notify::Error> {
    let (event_tx, event_rx) = watch::channel(None);
    let (notify_tx, notify_rx) = mpsc::channel();

    let mut debouncer = new_debouncer(config.debounce_duration, notify_tx)?;
    let watcher = debouncer.watcher();

    for dir in paths.dirs() {
        if dir.exists() {
            info!("Watching config directory: {}", dir.display());
            watcher.watch(&dir, notify::RecursiveMode::NonRecursive)?;
        } else {
            warn!("Config directory does not exist, skipping watch: {}", dir.display());
        }
    }

    let task_handle = tokio::task::spawn_blocking(move || {
        let _debouncer = debouncer;
        process_notify_events(notify_rx, event_tx, &paths);
    });

    Ok(FileWatcherHandle {
        events: event_rx,
        _task_handle: task_handle,
    })
}

fn process_notify_events(
    rx: mpsc::Receiver<Result<Vec<DebouncedEvent>, notify::Error>>,
    tx: watch::Sender<Option<FileChangeEvent>>,
    paths: &WatchPaths,
) {
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                if let Some(event) = classify_events(&events, paths) {
                    debug!("Config file change detected: {:?}", event);
                    if tx.send(Some(event)).is_err() {
                        info!("Config watcher receiver dropped, stopping");
                        return;
                    }
                }
            }
            Ok(Err(e)) => {
                error!("File watcher error: {}", e);
                let _ = tx.send(Some(FileChangeEvent::Error(e.to_string())));
            }
            Err(_) => {
                info!("Config watcher channel closed, stopping");
                return;
            }
        }
    }
}

/// Collapse a debounced batch into at most one event.
fn classify_events(events: &[DebouncedEvent], paths: &WatchPaths) -> Option<FileChangeEvent> {
    events
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous
            )
        })
        .find_map(|e| classify_path(&e.path, paths))
}

fn classify_path(path: &Path, paths: &WatchPaths) -> Option<FileChangeEvent> {
    let name = paths.file_name()?;
    if path.file_name() == Some(name.as_os_str()) {
        Some(FileChangeEvent::ConfigFile(path.to_path_buf()))
    } else {
        None
    }
}
