//! Config-file change trigger
//!
//! Watches the directory containing the config document and turns any
//! create/modify/remove touching it into a reload event. The daemon reacts
//! with a full stop/start cycle; this module only produces the trigger.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use crate::daemon::Event;

/// Keeps the underlying watcher alive; dropping it stops the notifications
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

pub fn watch(config_path: &Path, tx: Sender<Event>) -> Result<ConfigWatcher> {
    let config_path: PathBuf = config_path.to_path_buf();
    let dir = config_path
        .parent()
        .context("config path has no parent directory")?
        .to_path_buf();

    let watched = config_path.clone();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
        match result {
            Ok(event) => {
                let relevant = matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &watched);
                if relevant {
                    let _ = tx.send(Event::ReloadConfig);
                }
            }
            Err(e) => warn!(error = %e, "config watcher error"),
        }
    })
    .context("could not create config watcher")?;

    // Watch the parent directory: editors typically replace the file, which
    // would invalidate a watch on the path itself
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("could not watch {}", dir.display()))?;

    info!(path = %config_path.display(), "watching config for changes");
    Ok(ConfigWatcher { _watcher: watcher })
}
