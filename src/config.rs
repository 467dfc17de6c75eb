// Desktop tuning knobs, loaded from an optional desktop.json

use crate::error::WindowError;
use crate::input_handler::spatial::{MIN_HEIGHT, MIN_WIDTH, SNAP_THRESHOLD};
use crate::input_handler::Viewport;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesktopConfig {
    /// Distance (px) under which a dragged window snaps to an edge
    pub snap_threshold: f64,
    pub min_width: f64,
    pub min_height: f64,
    /// First-open size as a fraction of the viewport
    pub default_size_ratio: f64,
    pub max_default_width: f64,
    pub max_default_height: f64,
    /// Maximum random offset (px, each axis) applied on first open
    pub open_jitter: f64,
    pub top_bar_height: f64,
    pub dock_height: f64,
    /// z-index of the bottom-most window frame
    pub z_index_base: i32,
    /// Dock entries shown even when the app is closed
    pub pinned_apps: Vec<String>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            snap_threshold: SNAP_THRESHOLD,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            default_size_ratio: 0.6,
            max_default_width: 800.0,
            max_default_height: 600.0,
            open_jitter: 30.0,
            top_bar_height: 30.0,
            dock_height: 100.0,
            z_index_base: 10,
            pinned_apps: ["terminal", "fileSystem", "brave", "firefox", "textEditor"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl DesktopConfig {
    pub fn from_json(raw: &str) -> Result<Self, WindowError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read the config file, falling back to defaults when it is missing or broken
    pub async fn load(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => match Self::from_json(&raw) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded desktop config");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "desktop config unreadable, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Viewport for a host window of the given size with this config's chrome
    pub fn viewport(&self, width: f64, height: f64) -> Viewport {
        Viewport::new(width, height, self.top_bar_height, self.dock_height)
    }
}
