//! Watch command: keep a shared registry current as the config file changes.

use crate::config::symbols;
use crate::config::watcher::{WatchPaths, WatcherConfig, start_file_watcher};
use crate::config::{ConfigLoader, ConfigStore, SharedRegistry};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

/// Load once, then reload on every config file change until Ctrl-C.
pub async fn run_watch(loader: &ConfigLoader, store: &dyn ConfigStore) -> Result<()> {
    let shared = SharedRegistry::default();
    let (_, report) = shared.reload(loader, store, Some(symbols::global()))?;
    info!(
        path = %report.file.path.display(),
        total = shared.snapshot().len(),
        loaded_at = %report.loaded_at,
        "Initial configuration loaded"
    );

    let working_dir = match loader.resolver().local_path().and_then(|p| p.parent().map(PathBuf::from)) {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => std::env::current_dir()?,
    };
    let paths = WatchPaths {
        canonical: loader.resolver().canonical_path().to_path_buf(),
        working_dir,
    };
    let mut handle = start_file_watcher(paths, WatcherConfig::default())?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping watch");
                return Ok(());
            }
            event = handle.wait_for_change() => {
                match event {
                    None => return Ok(()),
                    Some(event) if !event.requires_reload() => warn!("Watcher error: {:?}", event),
                    Some(event) => {
                        info!(event = ?event, "Config file changed, reloading");
                        match shared.reload(loader, store, Some(symbols::global())) {
                            Ok((diff, report)) if diff.is_empty() => {
                                info!(loaded_at = %report.loaded_at, "Reload produced no changes")
                            }
                            Ok((diff, report)) => {
                                info!(loaded_at = %report.loaded_at, changes = diff.change_count(), "Configuration reloaded");
                                print!("{}", diff);
                            }
                            Err(e) => warn!("Reload failed, keeping previous configuration: {}", e),
                        }
                    }
                }
            }
        }
    }
}
