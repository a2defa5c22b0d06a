//! Panel element visibility
//!
//! The `hideFromPanel` config map names top-bar elements to hide while the
//! daemon runs. The actual shell API lives outside this process, so the
//! integration is a trait; [`NullPanel`] is the standalone stand-in that
//! only records intent in the log.

use tracing::debug;

/// Host desktop-shell panel integration
pub trait PanelHost {
    fn hide(&mut self, element: &str);
    fn show(&mut self, element: &str);
}

/// No-op host used when running outside the shell process
pub struct NullPanel;

impl PanelHost for NullPanel {
    fn hide(&mut self, element: &str) {
        debug!(element = element, "panel hide requested (no shell integration)");
    }

    fn show(&mut self, element: &str) {
        debug!(element = element, "panel show requested (no shell integration)");
    }
}
