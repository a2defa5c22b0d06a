#![forbid(unsafe_code)]

mod catalog;
mod constants;
mod daemon;
mod diagnostics;
mod panel;
mod persistence;
mod rotation;
mod schema;
mod settings;
mod timer;
mod validator;
mod wallpaper;
mod watcher;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use daemon::{Daemon, Event};
use panel::NullPanel;

/// Rotates the desktop wallpaper over configured image directories
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Config file path (default: ~/.config/wallshift.json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(settings::default_config_path);
    info!(config = %config_path.display(), "starting wallshift");

    let mut daemon = Daemon::new(config_path, Box::new(NullPanel));

    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let tx = daemon.sender();
        std::thread::spawn(move || {
            if signals.forever().next().is_some() {
                let _ = tx.send(Event::Shutdown);
            }
        });
    }

    daemon.run()
}
