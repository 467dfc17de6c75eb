// Shell composer: projects the store into a drawable scene and routes
// taskbar, app drawer and frame-control activations back into it

use crate::error::WindowError;
use crate::input_handler::{Rect, Viewport, WindowControl};
use crate::state::window::{ContentHandle, WindowContext};
use crate::state::WindowStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Top bar label when no window is visible
pub const IDLE_TITLE: &str = "Finder";

/// One visible window, ready to paint
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowFrame {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub rect: Rect,
    pub z_index: i32,
    pub is_maximized: bool,
    pub content: Option<ContentHandle>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockItem {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub is_running: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerEntry {
    pub id: String,
    pub title: String,
    pub icon: String,
}

/// Full desktop projection. `frames` is in paint order (bottom first).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub top_bar_title: String,
    pub frames: Vec<WindowFrame>,
    pub dock: Vec<DockItem>,
    /// Present only while the drawer is shown
    pub drawer: Option<Vec<DrawerEntry>>,
}

/// User activations on the shell chrome
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ShellAction {
    TaskbarClick { id: String },
    OpenApp {
        id: String,
        #[serde(default)]
        context: Option<WindowContext>,
    },
    ToggleAppDrawer,
    CloseAppDrawer,
    Control { id: String, control: WindowControl },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellOutcome {
    Updated,
    /// Rejected action, message to show in a notification
    Notify(String),
}

#[derive(Debug, Default)]
pub struct Shell {
    drawer_open: bool,
}

impl Shell {
    pub fn new() -> Self {
        Self { drawer_open: false }
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn compose(&self, store: &WindowStore) -> Scene {
        Scene {
            top_bar_title: Self::top_bar_title(store),
            frames: Self::frames(store),
            dock: Self::dock(store),
            drawer: self.drawer_open.then(|| Self::drawer(store)),
        }
    }

    /// Visible windows in stacking order with z-index `base + rank`
    pub fn frames(store: &WindowStore) -> Vec<WindowFrame> {
        let base = store.config().z_index_base;
        store
            .stack()
            .iter()
            .enumerate()
            .filter_map(|(rank, id)| {
                let win = store.get(id).filter(|w| w.is_visible())?;
                Some(WindowFrame {
                    id: win.id.clone(),
                    title: win.display_title(),
                    icon: win.icon.clone(),
                    rect: win.frame_rect(),
                    z_index: base + rank as i32,
                    is_maximized: win.is_maximized,
                    content: win.content.clone(),
                })
            })
            .collect()
    }

    /// Installed pinned apps first (pinned order), then every other open app
    pub fn dock(store: &WindowStore) -> Vec<DockItem> {
        let registry = store.registry();
        let pinned = &store.config().pinned_apps;

        let mut items: Vec<DockItem> = Vec::new();
        let push = |id: &str, items: &mut Vec<DockItem>| {
            if items.iter().any(|item| item.id == id) {
                return;
            }
            if let (Some(app), Some(win)) = (registry.get(id), store.get(id)) {
                items.push(DockItem {
                    id: app.id.clone(),
                    title: app.title.clone(),
                    icon: app.icon.clone(),
                    is_running: win.is_open,
                });
            }
        };

        for id in pinned.iter().filter(|id| registry.is_installed(id)) {
            push(id, &mut items);
        }
        for win in store.windows().filter(|w| w.is_open) {
            if !pinned.contains(&win.id) {
                push(&win.id, &mut items);
            }
        }
        items
    }

    /// Installed apps sorted by title
    pub fn drawer(store: &WindowStore) -> Vec<DrawerEntry> {
        let registry = store.registry();
        let mut entries: Vec<DrawerEntry> = registry
            .apps()
            .filter(|app| registry.is_installed(&app.id))
            .map(|app| DrawerEntry {
                id: app.id.clone(),
                title: app.title.clone(),
                icon: app.icon.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.title.cmp(&b.title));
        entries
    }

    pub fn top_bar_title(store: &WindowStore) -> String {
        store
            .top_id()
            .and_then(|id| store.get(id))
            .map(|win| win.title.clone())
            .unwrap_or_else(|| IDLE_TITLE.to_string())
    }

    /// Route an activation to the store. User-facing rejections come back as
    /// `Notify`; anything else is an error for the caller.
    pub fn dispatch(
        &mut self,
        store: &mut WindowStore,
        action: ShellAction,
        viewport: &Viewport,
    ) -> Result<ShellOutcome, WindowError> {
        debug!(?action, "shell action");
        let result = match action {
            ShellAction::TaskbarClick { id } => store.taskbar_click(&id, viewport).map(|_| ()),
            ShellAction::OpenApp { id, context } => {
                self.drawer_open = false;
                store.open(&id, context, viewport)
            }
            ShellAction::ToggleAppDrawer => {
                self.drawer_open = !self.drawer_open;
                Ok(())
            }
            ShellAction::CloseAppDrawer => {
                self.drawer_open = false;
                Ok(())
            }
            ShellAction::Control { id, control } => match control {
                WindowControl::Close => store.close(&id),
                WindowControl::Minimize => store.minimize(&id),
                WindowControl::Maximize => store.toggle_maximize(&id, viewport).map(|_| ()),
            },
        };

        match result {
            Ok(()) => Ok(ShellOutcome::Updated),
            Err(e) if e.is_user_facing() => {
                warn!(error = %e, "shell action rejected");
                Ok(ShellOutcome::Notify(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
