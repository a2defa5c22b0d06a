//! Configuration document loading and typed extraction
//!
//! The document lives at `~/.config/wallshift.json` (overridable on the
//! command line) and is restored from a bundled default on first run. Loading
//! and parsing failures are fatal for the startup sequence; everything past
//! that point degrades through validator defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::constants::{config, defaults};
use crate::diagnostics::{DiagnosticSink, Level};
use crate::schema::{Schema, SchemaError, SchemaNode, ValueKind};
use crate::validator::validate;

/// Bundled configuration restored when no document exists yet
const DEFAULT_DOCUMENT: &str = include_str!("../default.json");

/// Fatal startup condition: the config document could not be loaded at all
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not read config file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {detail}")]
    Unparseable { path: PathBuf, detail: String },
}

/// Schema for the whole configuration document
pub fn config_schema() -> Result<Schema, SchemaError> {
    Schema::new(vec![
        SchemaNode::named("notifyOnError", ValueKind::Bool).with_default(json!(true)),
        SchemaNode::named("loglevel", ValueKind::Str)
            .with_default(json!(defaults::LOGLEVEL))
            .with_allowed(["debug", "info", "warning", "error"]),
        SchemaNode::named("hideFromPanel", ValueKind::Map)
            .with_children(vec![SchemaNode::wildcard(ValueKind::Bool)]),
        SchemaNode::named("wallpaper", ValueKind::Map).with_children(vec![
            SchemaNode::named("interval", ValueKind::Num)
                .with_default(json!(defaults::INTERVAL_SECS)),
            SchemaNode::named("recursive", ValueKind::Bool)
                .with_default(json!(defaults::RECURSIVE)),
            SchemaNode::named("shuffle", ValueKind::Bool).with_default(json!(defaults::SHUFFLE)),
            SchemaNode::named("paths", ValueKind::Map),
            SchemaNode::named("mimetypes", ValueKind::Map)
                .with_default(Value::Array(
                    defaults::MIMETYPES.iter().map(|m| json!(m)).collect(),
                )),
        ]),
    ])
}

/// Default config document location under the user's config directory
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(config::FILENAME);
    path
}

/// Read the raw document, restoring the bundled default on first run
pub fn load_document(path: &Path) -> Result<Map<String, Value>, StartupError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match fs::write(path, DEFAULT_DOCUMENT) {
            Ok(()) => info!(path = %path.display(), "config not found, default config restored"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not restore default config"),
        }
    }

    let raw = fs::read_to_string(path).map_err(|source| StartupError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&raw).map_err(|e| StartupError::Unparseable {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StartupError::Unparseable {
            path: path.to_path_buf(),
            detail: "top level is not an object".to_string(),
        }),
    }
}

/// Validated, typed view of the configuration document
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub notify_on_error: bool,
    pub loglevel: Level,
    /// Panel element names to hide, in document order (entries set to false
    /// are listed in the config but left visible)
    pub hide_from_panel: Vec<String>,
    pub wallpaper: WallpaperSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperSettings {
    pub interval: Duration,
    pub recursive: bool,
    pub shuffle: bool,
    pub paths: Vec<String>,
    pub mimetypes: Vec<String>,
}

impl Settings {
    /// Validate the raw document and extract the typed settings
    pub fn from_document(
        source: &Map<String, Value>,
        schema: &Schema,
        sink: &mut dyn DiagnosticSink,
    ) -> Self {
        let doc = validate(source, schema, sink);

        let notify_on_error = doc
            .get("notifyOnError")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let loglevel = doc
            .get("loglevel")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::Warning);

        let hide_from_panel = doc
            .get("hideFromPanel")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter(|(_, v)| v.as_bool().unwrap_or(false))
                    .map(|(k, _)| k.clone())
                    .collect()
            })
            .unwrap_or_default();

        let wallpaper = doc
            .get("wallpaper")
            .and_then(Value::as_object)
            .map(WallpaperSettings::from_map)
            .unwrap_or_else(WallpaperSettings::fallback);

        Self {
            notify_on_error,
            loglevel,
            hide_from_panel,
            wallpaper,
        }
    }
}

impl WallpaperSettings {
    fn from_map(map: &Map<String, Value>) -> Self {
        let mut seconds = map
            .get("interval")
            .and_then(Value::as_f64)
            .unwrap_or(defaults::INTERVAL_SECS);
        if !seconds.is_finite() || seconds <= 0.0 {
            warn!(interval = seconds, "interval is not a positive number of seconds, using default");
            seconds = defaults::INTERVAL_SECS;
        }

        Self {
            interval: Duration::from_secs_f64(seconds),
            recursive: map
                .get("recursive")
                .and_then(Value::as_bool)
                .unwrap_or(defaults::RECURSIVE),
            shuffle: map
                .get("shuffle")
                .and_then(Value::as_bool)
                .unwrap_or(defaults::SHUFFLE),
            paths: map.get("paths").map(string_entries).unwrap_or_default(),
            mimetypes: map
                .get("mimetypes")
                .map(string_entries)
                .unwrap_or_else(|| defaults::MIMETYPES.iter().map(|m| m.to_string()).collect()),
        }
    }

    fn fallback() -> Self {
        Self {
            interval: Duration::from_secs_f64(defaults::INTERVAL_SECS),
            recursive: defaults::RECURSIVE,
            shuffle: defaults::SHUFFLE,
            paths: Vec::new(),
            mimetypes: defaults::MIMETYPES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Collect the string entries of a list-valued config key. Both arrays and
/// objects are accepted; object values are taken in document order.
fn string_entries(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Value::Object(map) => map
            .values()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
