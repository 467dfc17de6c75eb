// Desktop session: the single owned state object for one running desktop.
// Everything that mutates windows goes through here so the host only has to
// hold one handle (behind a Mutex in the Tauri app).

use crate::config::DesktopConfig;
use crate::error::WindowError;
use crate::input_handler::{
    GestureController, Point, PointerButton, PointerOutcome, PressTarget, Viewport,
};
use crate::shell::{Scene, Shell, ShellAction, ShellOutcome};
use crate::state::persistence::{LayoutFile, LayoutSnapshot};
use crate::state::registry::AppRegistry;
use crate::state::WindowStore;
use tracing::{info, warn};
use uuid::Uuid;

pub struct DesktopSession {
    session_id: Uuid,
    store: WindowStore,
    gestures: GestureController,
    shell: Shell,
    viewport: Viewport,
}

impl DesktopSession {
    /// Start a session from a stored layout, or registered defaults when there is none
    pub fn init(config: DesktopConfig, stored: Option<&LayoutSnapshot>, viewport: Viewport) -> Self {
        let store = WindowStore::new(AppRegistry::with_defaults(), config);
        Self::with_store(store, stored, viewport)
    }

    /// Same as `init` with a caller-built store (custom registry, seed or provider)
    pub fn with_store(mut store: WindowStore, stored: Option<&LayoutSnapshot>, viewport: Viewport) -> Self {
        let session_id = Uuid::new_v4();
        match stored {
            Some(snapshot) => {
                info!(%session_id, previous = ?snapshot.session_id, "restoring stored layout");
                store.load_snapshot(snapshot, &viewport);
            }
            None => {
                info!(%session_id, "no stored layout, starting from defaults");
                store.reset(&viewport);
            }
        }
        Self {
            session_id,
            store,
            gestures: GestureController::new(),
            shell: Shell::new(),
            viewport,
        }
    }

    /// Load the layout file (falling back to defaults) and start a session
    pub async fn restore(layout: &LayoutFile, config: DesktopConfig, viewport: Viewport) -> Self {
        let stored = layout.load().await;
        Self::init(config, stored.as_ref(), viewport)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WindowStore {
        &mut self.store
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Host window resized. Malformed bounds are ignored.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if !viewport.is_well_formed() {
            warn!(?viewport, "ignoring malformed viewport");
            return false;
        }
        self.viewport = viewport;
        true
    }

    pub fn scene(&self) -> Scene {
        self.shell.compose(&self.store)
    }

    pub fn dispatch(&mut self, action: ShellAction) -> Result<ShellOutcome, WindowError> {
        self.shell.dispatch(&mut self.store, action, &self.viewport)
    }

    // ===== Pointer input =====

    pub fn pointer_down(
        &mut self,
        id: &str,
        target: PressTarget,
        button: PointerButton,
        pointer: Point,
    ) -> Result<PointerOutcome, WindowError> {
        self.gestures
            .pointer_down(&mut self.store, id, target, button, pointer)
    }

    pub fn pointer_move(&mut self, pointer: Point) -> Result<PointerOutcome, WindowError> {
        self.gestures
            .pointer_move(&mut self.store, pointer, &self.viewport)
    }

    pub fn pointer_up(&mut self) -> PointerOutcome {
        self.gestures.pointer_up()
    }

    pub fn double_click(&mut self, id: &str, target: PressTarget) -> Result<PointerOutcome, WindowError> {
        self.gestures
            .double_click(&mut self.store, id, target, &self.viewport)
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gestures.is_active()
    }

    // ===== App management =====

    pub fn install(&mut self, id: &str) -> Result<(), WindowError> {
        self.store.install(id)
    }

    pub fn remove_app(&mut self, id: &str) -> Result<(), WindowError> {
        if self.gestures.active_window() == Some(id) {
            self.gestures.cancel();
        }
        self.store.remove_app(id)
    }

    /// Factory reset: default windows, default installed set, no live gesture
    pub fn reset(&mut self) {
        self.gestures.cancel();
        self.store.reset(&self.viewport);
    }

    // ===== Persistence =====

    /// Current layout stamped with this session's id
    pub fn snapshot(&self) -> LayoutSnapshot {
        let mut snapshot = self.store.snapshot();
        snapshot.session_id = Some(self.session_id);
        snapshot
    }

    pub async fn flush(&self, layout: &LayoutFile) -> Result<(), WindowError> {
        layout.save(&self.snapshot()).await
    }

    /// End the session, dropping any live gesture, and hand back the final layout
    pub fn teardown(mut self) -> LayoutSnapshot {
        if self.gestures.cancel() {
            warn!(session_id = %self.session_id, "gesture still active at teardown");
        }
        info!(session_id = %self.session_id, "desktop session ended");
        self.snapshot()
    }
}
