// Tauri command surface. Every mutating command emits "scene-changed" with the
// freshly composed scene; layout-affecting ones also flush to disk.

use crate::desktop::DesktopSession;
use crate::input_handler::{Point, PointerButton, PressTarget, WindowControl};
use crate::shell::{Scene, ShellAction, ShellOutcome};
use crate::state::persistence::LayoutFile;
use crate::state::window::WindowContext;
use serde::Serialize;
use std::sync::Mutex;
use tauri::{AppHandle, Emitter, Manager, State};
use tracing::warn;

/// Where the layout lives, managed next to the session
pub struct LayoutStore(pub LayoutFile);

#[derive(Clone, Serialize)]
struct NotificationPayload {
    message: String,
}

fn publish(app: &AppHandle, session: &DesktopSession) -> Result<Scene, String> {
    let scene = session.scene();
    app.emit("scene-changed", scene.clone())
        .map_err(|e| e.to_string())?;
    Ok(scene)
}

// Called with the session locked, so tickets follow mutation order
fn persist(app: &AppHandle, session: &DesktopSession) {
    let snapshot = session.snapshot();
    let layout = app.state::<LayoutStore>().0.clone();
    let ticket = layout.reserve();
    tauri::async_runtime::spawn(async move {
        if let Err(e) = layout.save_reserved(ticket, &snapshot).await {
            warn!(path = %layout.path().display(), error = %e, "failed to save layout");
        }
    });
}

fn run_action(
    action: ShellAction,
    app: &AppHandle,
    state: &State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    if let ShellOutcome::Notify(message) = session.dispatch(action).map_err(|e| e.to_string())? {
        app.emit("notification", NotificationPayload { message })
            .map_err(|e| e.to_string())?;
    }
    persist(app, &session);
    publish(app, &session)
}

// ===== Scene / shell commands =====

#[tauri::command]
pub fn get_scene(state: State<Mutex<DesktopSession>>) -> Result<Scene, String> {
    let session = state.lock().map_err(|e| e.to_string())?;
    Ok(session.scene())
}

#[tauri::command]
pub fn shell_action(
    action: ShellAction,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    run_action(action, &app, &state)
}

#[tauri::command]
pub fn open_app(
    id: String,
    context: Option<WindowContext>,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    run_action(ShellAction::OpenApp { id, context }, &app, &state)
}

#[tauri::command]
pub fn taskbar_click(
    id: String,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    run_action(ShellAction::TaskbarClick { id }, &app, &state)
}

#[tauri::command]
pub fn window_control(
    id: String,
    control: String,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    let control = WindowControl::from_str(&control)
        .ok_or_else(|| format!("Unknown window control: {}", control))?;
    run_action(ShellAction::Control { id, control }, &app, &state)
}

#[tauri::command]
pub fn toggle_app_drawer(
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    run_action(ShellAction::ToggleAppDrawer, &app, &state)
}

// ===== Pointer commands =====

#[tauri::command]
pub fn pointer_down(
    id: String,
    target: PressTarget,
    button: u8,
    x: f64,
    y: f64,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    session
        .pointer_down(&id, target, PointerButton::from_code(button), Point::new(x, y))
        .map_err(|e| e.to_string())?;
    publish(&app, &session)
}

#[tauri::command]
pub fn pointer_move(
    x: f64,
    y: f64,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Option<Scene>, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    let outcome = session
        .pointer_move(Point::new(x, y))
        .map_err(|e| e.to_string())?;
    if !outcome.needs_redraw() {
        return Ok(None);
    }
    publish(&app, &session).map(Some)
}

#[tauri::command]
pub fn pointer_up(app: AppHandle, state: State<Mutex<DesktopSession>>) -> Result<Scene, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    session.pointer_up();
    persist(&app, &session);
    publish(&app, &session)
}

#[tauri::command]
pub fn double_click(
    id: String,
    target: PressTarget,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    session
        .double_click(&id, target)
        .map_err(|e| e.to_string())?;
    persist(&app, &session);
    publish(&app, &session)
}

#[tauri::command]
pub fn set_viewport(
    width: f64,
    height: f64,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    let viewport = session.store().config().viewport(width, height);
    if !session.set_viewport(viewport) {
        return Err(format!("Invalid viewport {}x{}", width, height));
    }
    publish(&app, &session)
}

// ===== App management =====

#[tauri::command]
pub fn install_app(
    id: String,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    session.install(&id).map_err(|e| e.to_string())?;
    persist(&app, &session);
    publish(&app, &session)
}

#[tauri::command]
pub fn remove_app(
    id: String,
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    session.remove_app(&id).map_err(|e| e.to_string())?;
    persist(&app, &session);
    publish(&app, &session)
}

#[tauri::command]
pub fn reset_desktop(
    app: AppHandle,
    state: State<Mutex<DesktopSession>>,
) -> Result<Scene, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    session.reset();
    persist(&app, &session);
    publish(&app, &session)
}
