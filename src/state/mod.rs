use self::events::{EventBus, Listener, SubscriptionId, WindowEvent};
use self::persistence::{LayoutSnapshot, PersistedWindow};
use self::registry::{AppRegistry, ContentProvider, DefaultContentProvider};
use self::stack::StackingOrder;
use self::window::{WindowContext, WindowRecord};
use crate::config::DesktopConfig;
use crate::error::WindowError;
use crate::input_handler::spatial::{compute_maximized_geometry, default_geometry};
use crate::input_handler::{GeometryPatch, Rect, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub mod events;
pub mod persistence;
pub mod registry;
pub mod stack;
pub mod window;

/// What a taskbar click did to its window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarOutcome {
    Opened,
    Restored,
    Minimized,
    Focused,
}

/// Authoritative window records plus the stacking order.
///
/// Every registered app has exactly one record for the whole session;
/// closing only flips flags so geometry survives until the next open.
pub struct WindowStore {
    windows: HashMap<String, WindowRecord>,
    stack: StackingOrder,
    registry: AppRegistry,
    provider: Box<dyn ContentProvider>,
    events: EventBus,
    config: DesktopConfig,
    rng: StdRng,
}

impl WindowStore {
    pub fn new(registry: AppRegistry, config: DesktopConfig) -> Self {
        let mut store = Self {
            windows: HashMap::new(),
            stack: StackingOrder::new(),
            registry,
            provider: Box::new(DefaultContentProvider),
            events: EventBus::new(),
            config,
            rng: StdRng::from_entropy(),
        };
        store.reset_records();
        store.refresh_all_content();
        store
    }

    /// Seed the open-time jitter so layouts are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_provider(mut self, provider: Box<dyn ContentProvider>) -> Self {
        self.provider = provider;
        self.refresh_all_content();
        self
    }

    // ===== Queries =====

    pub fn get(&self, id: &str) -> Option<&WindowRecord> {
        self.windows.get(id)
    }

    /// All records in registration order
    pub fn windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.registry.apps().filter_map(move |app| self.windows.get(&app.id))
    }

    pub fn stack(&self) -> &StackingOrder {
        &self.stack
    }

    pub fn top_id(&self) -> Option<&str> {
        self.stack.top_id()
    }

    pub fn z_rank(&self, id: &str) -> Option<usize> {
        self.stack.z_rank(id)
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    /// Geometry of every other visible window, in registration order
    pub fn sibling_geometries(&self, id: &str) -> Vec<Rect> {
        self.windows()
            .filter(|w| w.id != id && w.is_visible())
            .filter_map(|w| w.geometry)
            .collect()
    }

    /// Both record/stack invariants hold
    pub fn is_consistent(&self) -> bool {
        let flags_ok = self.windows.values().all(|w| !w.is_minimized || w.is_open);
        let visible = self.windows.values().filter(|w| w.is_visible()).count();
        let stack_ok = self.stack.len() == visible
            && self
                .stack
                .iter()
                .all(|id| self.windows.get(id).map_or(false, WindowRecord::is_visible));
        flags_ok && stack_ok
    }

    // ===== Subscriptions =====

    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ===== Lifecycle operations =====

    /// Open (or re-open) an installed app's window and bring it to the top
    pub fn open(
        &mut self,
        id: &str,
        context: Option<WindowContext>,
        viewport: &Viewport,
    ) -> Result<(), WindowError> {
        let app = match self.registry.check_installed(id) {
            Ok(app) => app,
            Err(e) => {
                warn!(window = %id, error = %e, "open rejected");
                return Err(e);
            }
        };
        let content = self.provider.provide(app, context.as_ref());
        if content.is_none() {
            debug!(window = %id, "no content handle, opening empty");
        }

        let jitter = self.sample_jitter();
        let config = &self.config;
        let Some(win) = self.windows.get_mut(id) else {
            return Err(WindowError::UnknownApp(id.to_string()));
        };
        win.is_open = true;
        win.is_minimized = false;
        win.context = context;
        win.content = content;
        if win.geometry.is_none() {
            let geometry = default_geometry(
                viewport,
                config.default_size_ratio,
                (config.max_default_width, config.max_default_height),
                jitter,
            );
            debug!(window = %id, ?geometry, "first open, assigned default geometry");
            win.geometry = Some(geometry);
        }

        info!(window = %id, "window opened");
        self.events.emit(WindowEvent::Opened { id: id.to_string() });
        self.focus(id);
        Ok(())
    }

    /// Close a window, dropping its context but keeping its geometry
    pub fn close(&mut self, id: &str) -> Result<(), WindowError> {
        let win = self.record_mut(id)?;
        win.is_open = false;
        win.is_minimized = false;
        win.context = None;
        self.stack.remove(id);

        info!(window = %id, "window closed");
        self.events.emit(WindowEvent::Closed { id: id.to_string() });
        Ok(())
    }

    /// Hide an open window while keeping it running in the taskbar
    pub fn minimize(&mut self, id: &str) -> Result<(), WindowError> {
        let win = self.record_mut(id)?;
        if !win.is_open || win.is_minimized {
            return Ok(());
        }
        win.is_minimized = true;
        self.stack.remove(id);

        info!(window = %id, "window minimized");
        self.events.emit(WindowEvent::Minimized { id: id.to_string() });
        Ok(())
    }

    /// Un-minimize an open window and bring it to the top
    pub fn restore(&mut self, id: &str) -> Result<(), WindowError> {
        let win = self.record_mut(id)?;
        if !win.is_open {
            return Ok(());
        }
        if win.is_minimized {
            win.is_minimized = false;
            info!(window = %id, "window restored");
            self.events.emit(WindowEvent::Restored { id: id.to_string() });
        }
        self.focus(id);
        Ok(())
    }

    /// Raise a visible window to the top. Hidden windows are left alone.
    pub fn focus(&mut self, id: &str) -> bool {
        let visible = self.windows.get(id).map_or(false, WindowRecord::is_visible);
        if !visible {
            debug!(window = %id, "focus ignored, window not visible");
            return false;
        }
        if !self.stack.is_top(id) {
            debug!(window = %id, "window focused");
        }
        self.stack.focus(id);
        self.events.emit(WindowEvent::Focused { id: id.to_string() });
        true
    }

    /// Shallow-merge geometry fields. Non-finite values and non-positive sizes
    /// are dropped so the last known-good value stays in place.
    pub fn update_geometry(&mut self, id: &str, patch: GeometryPatch) -> Result<Rect, WindowError> {
        let clean = patch.sanitized();
        if clean != patch {
            warn!(window = %id, ?patch, "dropping malformed geometry fields");
        }
        let win = self.record_mut(id)?;
        let current = win.frame_rect();
        if clean.is_empty() {
            return Ok(current);
        }
        let next = current.merged(&clean);
        win.geometry = Some(next);
        self.events.emit(WindowEvent::GeometryChanged { id: id.to_string() });
        Ok(next)
    }

    /// Enter or leave the maximized state. Returns whether the window is now maximized.
    /// Closed and minimized windows are left untouched.
    pub fn toggle_maximize(&mut self, id: &str, viewport: &Viewport) -> Result<bool, WindowError> {
        let win = self.record(id)?;
        if !win.is_visible() {
            debug!(window = %id, "maximize ignored, window not visible");
            return Ok(win.is_maximized);
        }
        self.focus(id);
        let win = self.record_mut(id)?;

        let maximized = if win.is_maximized {
            match win.restore_geometry.take() {
                Some(saved) => win.geometry = Some(saved),
                None => debug!(window = %id, "no saved geometry, leaving frame as is"),
            }
            win.is_maximized = false;
            false
        } else {
            win.restore_geometry = Some(win.frame_rect());
            win.geometry = Some(compute_maximized_geometry(viewport));
            win.is_maximized = true;
            true
        };

        info!(window = %id, maximized, "maximize toggled");
        self.events.emit(WindowEvent::MaximizeToggled {
            id: id.to_string(),
            maximized,
        });
        Ok(maximized)
    }

    /// Dock button behaviour: open, restore, minimize or raise
    pub fn taskbar_click(&mut self, id: &str, viewport: &Viewport) -> Result<TaskbarOutcome, WindowError> {
        let (is_open, is_minimized) = {
            let win = self.record(id)?;
            (win.is_open, win.is_minimized)
        };

        if !is_open {
            self.open(id, None, viewport)?;
            return Ok(TaskbarOutcome::Opened);
        }
        if is_minimized {
            self.restore(id)?;
            return Ok(TaskbarOutcome::Restored);
        }
        if self.stack.is_top(id) {
            self.minimize(id)?;
            Ok(TaskbarOutcome::Minimized)
        } else {
            self.focus(id);
            Ok(TaskbarOutcome::Focused)
        }
    }

    // ===== Installation =====

    pub fn install(&mut self, id: &str) -> Result<(), WindowError> {
        if self.registry.install(id)? {
            info!(app = %id, "app installed");
            self.events.emit(WindowEvent::InstallChanged {
                id: id.to_string(),
                installed: true,
            });
        }
        Ok(())
    }

    /// Uninstall an app, closing its window first if it is open
    pub fn remove_app(&mut self, id: &str) -> Result<(), WindowError> {
        let protected = self.registry.get(id).map(|app| app.system);
        match protected {
            None => return Err(WindowError::UnknownApp(id.to_string())),
            Some(true) => return Err(WindowError::ProtectedApp(id.to_string())),
            Some(false) => {}
        }
        if self.record(id)?.is_open {
            self.close(id)?;
        }
        if self.registry.uninstall(id)? {
            info!(app = %id, "app removed");
            self.events.emit(WindowEvent::InstallChanged {
                id: id.to_string(),
                installed: false,
            });
        }
        Ok(())
    }

    // ===== Persistence =====

    /// Serializable view of the layout (content handles excluded)
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            session_id: None,
            windows: self
                .windows
                .values()
                .map(|w| (w.id.clone(), PersistedWindow::from_record(w)))
                .collect(),
            stack: self.stack.iter().map(str::to_string).collect(),
            installed_apps: Some(self.registry.installed_ids()),
        }
    }

    /// Replace the layout with registered defaults merged with `snapshot`.
    /// Ids missing from the snapshot keep their defaults; unknown ids are ignored.
    pub fn load_snapshot(&mut self, snapshot: &LayoutSnapshot, viewport: &Viewport) {
        self.reset_records();

        for (id, stored) in &snapshot.windows {
            match self.windows.get_mut(id) {
                Some(win) => stored.apply_to(win),
                None => debug!(window = %id, "ignoring stored window for unregistered app"),
            }
        }
        if let Some(installed) = &snapshot.installed_apps {
            self.registry.set_installed(installed);
        }

        let mut stack: StackingOrder = snapshot.stack.iter().map(String::as_str).collect();
        let windows = &self.windows;
        stack.retain_unique(|id| windows.get(id).map_or(false, WindowRecord::is_visible));
        self.stack = stack;

        self.settle(viewport);
        info!(windows = snapshot.windows.len(), "layout loaded");
        self.events.emit(WindowEvent::Reset);
    }

    /// Back to registered defaults (factory reset)
    pub fn reset(&mut self, viewport: &Viewport) {
        self.reset_records();
        self.registry.reset_installed();
        self.settle(viewport);
        info!("layout reset to defaults");
        self.events.emit(WindowEvent::Reset);
    }

    // ===== Internals =====

    fn record(&self, id: &str) -> Result<&WindowRecord, WindowError> {
        self.windows
            .get(id)
            .ok_or_else(|| WindowError::UnknownApp(id.to_string()))
    }

    fn record_mut(&mut self, id: &str) -> Result<&mut WindowRecord, WindowError> {
        self.windows
            .get_mut(id)
            .ok_or_else(|| WindowError::UnknownApp(id.to_string()))
    }

    fn reset_records(&mut self) {
        self.windows.clear();
        self.stack.clear();
        for app in self.registry.apps() {
            let mut record = WindowRecord::closed(&app.id, &app.title, &app.icon);
            if app.starts_open {
                record.is_open = true;
                self.stack.focus(&app.id);
            }
            self.windows.insert(app.id.clone(), record);
        }
    }

    /// Restore invariants after a bulk change: visible windows missing from the
    /// stack go on top in registration order, open windows get geometry, and
    /// content handles are re-requested.
    fn settle(&mut self, viewport: &Viewport) {
        let missing: Vec<String> = self
            .windows()
            .filter(|w| w.is_visible() && !self.stack.contains(&w.id))
            .map(|w| w.id.clone())
            .collect();
        for id in missing {
            self.stack.focus(&id);
        }

        let needs_geometry: Vec<String> = self
            .windows()
            .filter(|w| w.is_open && w.geometry.is_none())
            .map(|w| w.id.clone())
            .collect();
        for id in needs_geometry {
            let jitter = self.sample_jitter();
            let config = &self.config;
            let geometry = default_geometry(
                viewport,
                config.default_size_ratio,
                (config.max_default_width, config.max_default_height),
                jitter,
            );
            if let Some(win) = self.windows.get_mut(&id) {
                win.geometry = Some(geometry);
            }
        }

        self.refresh_all_content();
    }

    fn refresh_all_content(&mut self) {
        for app in self.registry.apps() {
            if let Some(win) = self.windows.get_mut(&app.id) {
                win.content = if win.is_open {
                    self.provider.provide(app, win.context.as_ref())
                } else {
                    None
                };
            }
        }
    }

    fn sample_jitter(&mut self) -> (f64, f64) {
        let spread = self.config.open_jitter;
        if !(spread > 0.0) {
            return (0.0, 0.0);
        }
        (
            self.rng.gen_range(-spread..=spread),
            self.rng.gen_range(-spread..=spread),
        )
    }
}

impl Default for WindowStore {
    fn default() -> Self {
        Self::new(AppRegistry::with_defaults(), DesktopConfig::default())
    }
}
