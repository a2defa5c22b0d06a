//! Daemon orchestration
//!
//! Single-threaded event loop: timer fires, config-change triggers and
//! shutdown signals all arrive as [`Event`]s on one channel and are handled
//! to completion in order. A config reload fully stops the previous rotation
//! before starting the next one, so two timers never overlap.

use std::path::PathBuf;
use std::process::Command;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::Result;
use tracing::{error, info};

use crate::catalog::{discover, FsSource};
use crate::diagnostics::{Level, TracingSink};
use crate::panel::PanelHost;
use crate::persistence::FilePositionStore;
use crate::rotation::{RotationError, RotationScheduler};
use crate::settings::{config_schema, load_document, Settings};
use crate::timer::ThreadTimerSource;
use crate::wallpaper::GsettingsWallpaper;
use crate::watcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Rotation timer fired
    Tick,
    /// Config document changed on disk
    ReloadConfig,
    /// Terminate cleanly
    Shutdown,
}

pub struct Daemon {
    config_path: PathBuf,
    tx: Sender<Event>,
    rx: Receiver<Event>,
    timers: ThreadTimerSource,
    scheduler: RotationScheduler,
    panel: Box<dyn PanelHost>,
    /// Panel elements currently hidden, restored on stop
    hidden: Vec<String>,
    /// Last validated notifyOnError, used when loading itself fails
    notify_on_error: bool,
}

impl Daemon {
    pub fn new(config_path: PathBuf, panel: Box<dyn PanelHost>) -> Self {
        let (tx, rx) = mpsc::channel();
        let scheduler = RotationScheduler::new(
            Box::new(GsettingsWallpaper),
            Box::new(FilePositionStore::new(FilePositionStore::default_path())),
        );
        Self {
            config_path,
            timers: ThreadTimerSource::new(tx.clone()),
            tx,
            rx,
            scheduler,
            panel,
            hidden: Vec::new(),
            notify_on_error: true,
        }
    }

    /// Channel end for external producers (signal handler, tests)
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Run until a shutdown event arrives
    pub fn run(&mut self) -> Result<()> {
        let _watcher = match watcher::watch(&self.config_path, self.tx.clone()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                error!(error = %e, "config watching unavailable, reload on change disabled");
                None
            }
        };

        self.start();

        while let Ok(event) = self.rx.recv() {
            match event {
                Event::Tick => self.scheduler.tick(),
                Event::ReloadConfig => self.restart(),
                Event::Shutdown => {
                    info!("shutting down");
                    self.stop();
                    break;
                }
            }
        }
        Ok(())
    }

    /// Load, validate and activate the configuration. A document that cannot
    /// be loaded leaves the daemon inert until the next reload trigger; an
    /// empty catalog disables rotation but leaves panel hiding active.
    fn start(&mut self) {
        let schema = match config_schema() {
            Ok(schema) => schema,
            Err(e) => {
                error!(error = %e, "config schema is inconsistent");
                return;
            }
        };

        let document = match load_document(&self.config_path) {
            Ok(document) => document,
            Err(e) => {
                error!(error = %e, "loading config failed");
                if self.notify_on_error {
                    notify_user("Loading config failed", &e.to_string());
                }
                return;
            }
        };

        // Validation diagnostics pass through unfiltered; the subscriber
        // installed in main applies the process-level filter
        let mut validation_sink = TracingSink::new(Level::Debug);
        let settings = Settings::from_document(&document, &schema, &mut validation_sink);
        self.notify_on_error = settings.notify_on_error;

        for element in &settings.hide_from_panel {
            self.panel.hide(element);
        }
        self.hidden = settings.hide_from_panel.clone();

        let mut sink = TracingSink::new(settings.loglevel);
        let found = discover(
            &FsSource,
            &settings.wallpaper.paths,
            settings.wallpaper.recursive,
            &settings.wallpaper.mimetypes,
            &mut sink,
        );
        info!(count = found.len(), "wallpaper discovery finished");

        match self.scheduler.start(
            found,
            settings.wallpaper.interval,
            settings.wallpaper.shuffle,
            &mut self.timers,
        ) {
            Ok(()) => {}
            Err(RotationError::EmptyCatalog) => {
                error!("no wallpapers found under the configured paths, rotation disabled");
            }
        }
    }

    /// Stop rotation and restore hidden panel elements
    fn stop(&mut self) {
        self.scheduler.stop();
        for element in self.hidden.drain(..) {
            self.panel.show(&element);
        }
    }

    fn restart(&mut self) {
        info!("config change detected, restarting");
        self.stop();
        self.start();
    }
}

/// User-facing notification for the fatal config-load condition
fn notify_user(summary: &str, body: &str) {
    let result = Command::new("notify-send")
        .args(["--app-name", "wallshift", summary, body])
        .status();
    if let Err(e) = result {
        error!(error = %e, "could not send desktop notification");
    }
}
