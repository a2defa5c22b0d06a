//! Wallpaper file discovery
//!
//! Walks the configured root paths depth-first and collects every file whose
//! content type is accepted. The walk is tolerant: an unreadable entry is
//! reported and skipped, never aborting discovery of the rest. Filesystem
//! access sits behind [`FileSource`] so the walk logic is testable without
//! touching disk.

use std::io;
use std::path::{Path, PathBuf};

use crate::constants::content_types;
use crate::diagnostics::{DiagnosticSink, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Type could not be determined (permission error, dangling link, ...)
    Unknown,
}

/// Filesystem access used by discovery
pub trait FileSource {
    fn kind(&self, path: &Path) -> EntryKind;

    /// Direct children of a directory, in walk order
    fn children(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    fn content_type(&self, path: &Path) -> String;
}

/// Real filesystem source; content types come from the extension table
pub struct FsSource;

impl FileSource for FsSource {
    fn kind(&self, path: &Path) -> EntryKind {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            Ok(meta) if meta.is_file() => EntryKind::File,
            Ok(_) => EntryKind::Unknown,
            Err(_) => EntryKind::Unknown,
        }
    }

    fn children(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }

    fn content_type(&self, path: &Path) -> String {
        content_type_of(path).to_string()
    }
}

/// Look up a file's content type from its extension (case-insensitive)
pub fn content_type_of(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return content_types::UNKNOWN;
    };
    let ext = ext.to_lowercase();
    content_types::TABLE
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(content_types::UNKNOWN)
}

/// Resolve a leading `~` against the home directory before any filesystem
/// access
pub fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => {
            let mut expanded = home.as_os_str().to_os_string();
            expanded.push(rest);
            PathBuf::from(expanded)
        }
        _ => PathBuf::from(path),
    }
}

/// Discover all accepted files under `roots`, depth-first, in root
/// declaration order. One `recursive` flag governs the whole walk.
pub fn discover(
    source: &dyn FileSource,
    roots: &[String],
    recursive: bool,
    accepted: &[String],
    sink: &mut dyn DiagnosticSink,
) -> Vec<PathBuf> {
    let home = dirs::home_dir();
    let mut found = Vec::new();

    for root in roots {
        let root = expand_tilde(root, home.as_deref());
        match source.kind(&root) {
            EntryKind::Directory => {
                walk_directory(source, &root, recursive, accepted, sink, &mut found);
            }
            kind => take_file(source, &root, kind, accepted, sink, &mut found),
        }
    }

    found
}

fn walk_directory(
    source: &dyn FileSource,
    dir: &Path,
    recursive: bool,
    accepted: &[String],
    sink: &mut dyn DiagnosticSink,
    found: &mut Vec<PathBuf>,
) {
    let children = match source.children(dir) {
        Ok(children) => children,
        Err(e) => {
            sink.emit(
                Level::Error,
                format!("location {} cannot be read: {e}", dir.display()),
            );
            return;
        }
    };

    for child in children {
        match source.kind(&child) {
            EntryKind::Directory if recursive => {
                walk_directory(source, &child, recursive, accepted, sink, found);
            }
            kind => take_file(source, &child, kind, accepted, sink, found),
        }
    }
}

/// Apply the content-type decision to a single non-descended entry
fn take_file(
    source: &dyn FileSource,
    path: &Path,
    kind: EntryKind,
    accepted: &[String],
    sink: &mut dyn DiagnosticSink,
    found: &mut Vec<PathBuf>,
) {
    if kind == EntryKind::Unknown {
        sink.emit(
            Level::Error,
            format!("location {} cannot be accessed", path.display()),
        );
        return;
    }

    let content_type = source.content_type(path);
    if kind == EntryKind::File && accepted.iter().any(|a| *a == content_type) {
        found.push(path.to_path_buf());
    } else {
        sink.emit(
            Level::Error,
            format!("location {} was ignored ({content_type})", path.display()),
        );
    }
}
