//! Applying a wallpaper through the desktop settings
//!
//! Sets the GNOME background keys via `gsettings`. Failures are logged and
//! absorbed here; the scheduler keeps rotating regardless.

use std::path::Path;
use std::process::Command;

use tracing::{debug, error};

use crate::constants::gnome;
use crate::rotation::WallpaperSink;

pub struct GsettingsWallpaper;

impl GsettingsWallpaper {
    fn set_key(&self, key: &str, uri: &str) {
        let status = Command::new("gsettings")
            .args(["set", gnome::BACKGROUND_SCHEMA, key, uri])
            .status();
        match status {
            Ok(status) if status.success() => {}
            Ok(status) => error!(key = key, status = %status, "gsettings rejected the wallpaper"),
            Err(e) => error!(key = key, error = %e, "could not run gsettings"),
        }
    }
}

impl WallpaperSink for GsettingsWallpaper {
    fn apply(&mut self, path: &Path) {
        let uri = file_uri(path);
        debug!(uri = %uri, "applying wallpaper");
        self.set_key(gnome::PICTURE_URI, &uri);
        self.set_key(gnome::PICTURE_URI_DARK, &uri);
    }
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_uri_prefixes_the_scheme() {
        let path = PathBuf::from("/home/user/Pictures/a.jpg");
        assert_eq!(file_uri(&path), "file:///home/user/Pictures/a.jpg");
    }
}
