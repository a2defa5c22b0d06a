//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Configuration file locations
pub mod config {
    /// Config filename under the user's config directory
    pub const FILENAME: &str = "wallshift.json";

    /// Subdirectory under the data dir for runtime state
    pub const STATE_DIR: &str = "wallshift";

    /// State filename holding the persisted rotation position
    pub const STATE_FILENAME: &str = "state.json";
}

/// Default values applied when the config document omits a key
pub mod defaults {
    /// Rotation interval in seconds
    pub const INTERVAL_SECS: f64 = 30.0;

    /// Descend into subdirectories when discovering wallpapers
    pub const RECURSIVE: bool = true;

    /// Pick the next wallpaper at random (never repeating the current one)
    pub const SHUFFLE: bool = true;

    /// Log level for component diagnostics
    pub const LOGLEVEL: &str = "warning";

    /// Content types accepted by the file catalog
    pub const MIMETYPES: [&str; 2] = ["image/jpeg", "image/png"];
}

/// GNOME desktop settings keys used to apply a wallpaper
pub mod gnome {
    /// gsettings schema for the desktop background
    pub const BACKGROUND_SCHEMA: &str = "org.gnome.desktop.background";

    /// Wallpaper URI key (light mode)
    pub const PICTURE_URI: &str = "picture-uri";

    /// Wallpaper URI key (dark mode)
    pub const PICTURE_URI_DARK: &str = "picture-uri-dark";
}

/// File extension to content type mapping used by the filesystem source.
/// Lookup is on the lower-cased extension.
pub mod content_types {
    pub const TABLE: [(&str, &str); 9] = [
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("png", "image/png"),
        ("gif", "image/gif"),
        ("webp", "image/webp"),
        ("bmp", "image/bmp"),
        ("svg", "image/svg+xml"),
        ("tif", "image/tiff"),
        ("tiff", "image/tiff"),
    ];

    /// Content type reported for files whose extension is not in the table
    pub const UNKNOWN: &str = "application/octet-stream";
}
