// Persisted layout shape and the JSON file backend

use super::window::{WindowContext, WindowRecord};
use crate::error::WindowError;
use crate::input_handler::Rect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// One window as stored on disk. Every field is optional so a partial record
/// is merged over the registered defaults instead of replacing them.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_minimized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<WindowContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_maximized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore_geometry: Option<Rect>,
}

impl PersistedWindow {
    pub fn from_record(record: &WindowRecord) -> Self {
        let geometry = record.geometry;
        Self {
            is_open: Some(record.is_open),
            is_minimized: Some(record.is_minimized),
            x: geometry.map(|g| g.x),
            y: geometry.map(|g| g.y),
            width: geometry.map(|g| g.width),
            height: geometry.map(|g| g.height),
            context: record.context.clone(),
            is_maximized: Some(record.is_maximized),
            restore_geometry: record.restore_geometry,
        }
    }

    /// Stored geometry, only when all four fields are present and sane
    pub fn geometry(&self) -> Option<Rect> {
        match (self.x, self.y, self.width, self.height) {
            (Some(x), Some(y), Some(width), Some(height)) => {
                Some(Rect::new(x, y, width, height)).filter(Rect::is_well_formed)
            }
            _ => None,
        }
    }

    /// Merge this record over `record`, keeping the defaults for missing or
    /// malformed fields. Repairs `isMinimized` without `isOpen`.
    pub fn apply_to(&self, record: &mut WindowRecord) {
        if let Some(is_open) = self.is_open {
            record.is_open = is_open;
        }
        if let Some(is_minimized) = self.is_minimized {
            record.is_minimized = is_minimized;
        }
        if let Some(geometry) = self.geometry() {
            record.geometry = Some(geometry);
        }
        if self.context.is_some() {
            record.context = self.context.clone();
        }
        if let Some(is_maximized) = self.is_maximized {
            record.is_maximized = is_maximized;
        }
        if let Some(restore) = self.restore_geometry.filter(Rect::is_well_formed) {
            record.restore_geometry = Some(restore);
        }
        if !record.is_open {
            record.is_minimized = false;
            record.context = None;
        }
    }
}

/// Flat layout record keyed by window id, plus paint order and installed apps
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    pub windows: BTreeMap<String, PersistedWindow>,
    pub stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_apps: Option<Vec<String>>,
}

impl LayoutSnapshot {
    /// Strict parse: any malformed entry rejects the whole snapshot
    pub fn from_json(raw: &str) -> Result<Self, WindowError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Best-effort parse. An unparsable document yields `None` (use defaults);
    /// individual malformed windows are skipped so they fall back per id.
    pub fn from_json_lenient(raw: &str) -> Option<Self> {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "layout is not valid JSON, falling back to defaults");
                return None;
            }
        };
        let Some(object) = value.as_object() else {
            warn!("layout is not a JSON object, falling back to defaults");
            return None;
        };

        let mut snapshot = LayoutSnapshot::default();

        if let Some(session) = object.get("sessionId") {
            snapshot.session_id = serde_json::from_value(session.clone()).ok();
        }

        if let Some(windows) = object.get("windows").and_then(|w| w.as_object()) {
            for (id, entry) in windows {
                match serde_json::from_value::<PersistedWindow>(entry.clone()) {
                    Ok(window) => {
                        snapshot.windows.insert(id.clone(), window);
                    }
                    Err(e) => warn!(window = %id, error = %e, "dropping malformed window record"),
                }
            }
        }

        if let Some(stack) = object.get("stack") {
            snapshot.stack = serde_json::from_value(stack.clone()).unwrap_or_else(|e| {
                warn!(error = %e, "dropping malformed stacking order");
                Vec::new()
            });
        }

        if let Some(installed) = object.get("installedApps") {
            snapshot.installed_apps = serde_json::from_value(installed.clone()).ok();
        }

        Some(snapshot)
    }

    pub fn to_json(&self) -> Result<String, WindowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Place in the save order, taken when the snapshot is captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SaveTicket(u64);

/// Layout persisted as a JSON file (e.g. in the app data dir).
///
/// Clones share one writer: saves run one at a time, each replaces the file
/// atomically (temp file + rename), and a save holding an older ticket than
/// the last one written is dropped.
#[derive(Clone, Debug)]
pub struct LayoutFile {
    path: PathBuf,
    issued: Arc<AtomicU64>,
    written: Arc<Mutex<u64>>, // Ticket of the snapshot currently on disk
}

impl LayoutFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            issued: Arc::new(AtomicU64::new(0)),
            written: Arc::new(Mutex::new(0)),
        }
    }

    /// Reserve the next slot in the save order. Take it while the state the
    /// snapshot comes from is still locked, then save from anywhere.
    pub fn reserve(&self) -> SaveTicket {
        SaveTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored layout. A missing file or corrupt contents yield `None`.
    pub async fn load(&self) -> Option<LayoutSnapshot> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => LayoutSnapshot::from_json_lenient(&raw),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no stored layout");
                None
            }
        }
    }

    pub async fn save(&self, snapshot: &LayoutSnapshot) -> Result<(), WindowError> {
        let ticket = self.reserve();
        self.save_reserved(ticket, snapshot).await.map(|_| ())
    }

    /// Write `snapshot` in ticket order. Returns `false` when a newer snapshot
    /// already reached the disk and this one was dropped.
    pub async fn save_reserved(
        &self,
        ticket: SaveTicket,
        snapshot: &LayoutSnapshot,
    ) -> Result<bool, WindowError> {
        let json = snapshot.to_json()?;
        let mut written = self.written.lock().await;
        if ticket.0 <= *written {
            debug!(path = %self.path.display(), ticket = ticket.0, "skipping stale layout save");
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        *written = ticket.0;

        debug!(path = %self.path.display(), windows = snapshot.windows.len(), "layout saved");
        Ok(true)
    }

    /// Forget the stored layout. Saves reserved before this call are dropped.
    pub async fn clear(&self) -> Result<(), WindowError> {
        let mut written = self.written.lock().await;
        *written = (*written).max(self.issued.load(Ordering::SeqCst));
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "layout".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
