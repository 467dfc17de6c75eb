// Input handler module for pointer-driven window drag, resize and snapping
#[path = "inputHandler/mod.rs"]
pub mod input_handler;

// Window records, stacking order, app registry and layout persistence
pub mod state;

// Scene projection and taskbar / app drawer routing
pub mod shell;

// Owned per-session state object
pub mod desktop;

pub mod config;
pub mod error;

// Tauri command surface
#[cfg(feature = "desktop")]
mod commands;

pub use config::DesktopConfig;
pub use desktop::DesktopSession;
pub use error::WindowError;
pub use input_handler::{GestureController, PointerOutcome, Rect, Viewport};
pub use shell::{Scene, Shell, ShellAction, ShellOutcome};
pub use state::persistence::{LayoutFile, LayoutSnapshot};
pub use state::registry::{AppDescriptor, AppRegistry, ContentKind, ContentProvider};
pub use state::window::{ContentHandle, WindowContext, WindowRecord};
pub use state::{TaskbarOutcome, WindowStore};

/// Layout file name inside the app data dir
pub const LAYOUT_FILE: &str = "layout.json";
/// Optional tuning file next to the layout
pub const CONFIG_FILE: &str = "desktop.json";

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::LayoutStore;
    use std::sync::Mutex;
    use tauri::Manager;
    use tracing::info;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "hackdesk=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tauri::Builder::default()
        .setup(|app| {
            let data_dir = app.path().app_data_dir()?;
            let layout = LayoutFile::new(data_dir.join(LAYOUT_FILE));
            let config_path = data_dir.join(CONFIG_FILE);

            let session = tauri::async_runtime::block_on(async {
                let config = DesktopConfig::load(&config_path).await;
                // Placeholder bounds until the webview reports its real size
                let fallback = Viewport::default();
                let viewport = config.viewport(fallback.width, fallback.height);
                DesktopSession::restore(&layout, config, viewport).await
            });
            info!(
                session_id = %session.session_id(),
                layout = %layout.path().display(),
                "desktop session ready"
            );

            app.manage(Mutex::new(session));
            app.manage(LayoutStore(layout));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Scene / shell
            commands::get_scene,
            commands::shell_action,
            commands::open_app,
            commands::taskbar_click,
            commands::window_control,
            commands::toggle_app_drawer,
            // Pointer input
            commands::pointer_down,
            commands::pointer_move,
            commands::pointer_up,
            commands::double_click,
            commands::set_viewport,
            // App management
            commands::install_app,
            commands::remove_app,
            commands::reset_desktop,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
