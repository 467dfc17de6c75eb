// App catalogue, installation state and per-app content dispatch

use super::window::{ContentHandle, WindowContext};
use crate::error::WindowError;
use std::collections::HashSet;

/// What a window hosts, resolved once when the app is registered
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Terminal,
    FileExplorer,
    TextEditor,
    ThemeSettings,
    /// Self-contained simulated tool, rendered by key
    Tool(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppDescriptor {
    pub id: String,
    pub title: String,
    pub icon: String,
    /// System apps cannot be removed
    pub system: bool,
    pub starts_open: bool,
    pub content: ContentKind,
}

impl AppDescriptor {
    pub fn new(id: &str, title: &str, icon: &str, content: ContentKind) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
            system: false,
            starts_open: false,
            content,
        }
    }

    pub fn system(mut self) -> Self {
        self.system = true;
        self
    }

    pub fn starts_open(mut self) -> Self {
        self.starts_open = true;
        self
    }
}

/// Maps an app (and its open-time context) to a renderable handle.
/// Returning `None` opens the window with an empty content area.
pub trait ContentProvider: Send {
    fn provide(&self, app: &AppDescriptor, context: Option<&WindowContext>) -> Option<ContentHandle>;
}

/// Stock provider: one content key per kind, file-backed kinds carry the path
pub struct DefaultContentProvider;

impl ContentProvider for DefaultContentProvider {
    fn provide(&self, app: &AppDescriptor, context: Option<&WindowContext>) -> Option<ContentHandle> {
        let (key, resource) = match &app.content {
            ContentKind::Terminal => ("SYS_TERMINAL".to_string(), None),
            ContentKind::FileExplorer => ("SYS_FILES".to_string(), None),
            ContentKind::TextEditor => (
                "SYS_TEXT_EDITOR".to_string(),
                context.and_then(|c| c.resource_path()),
            ),
            ContentKind::ThemeSettings => ("SYS_THEME_SETTINGS".to_string(), None),
            ContentKind::Tool(key) => (key.clone(), None),
        };
        Some(ContentHandle { key, resource })
    }
}

pub struct AppRegistry {
    apps: Vec<AppDescriptor>, // Registration order
    installed: HashSet<String>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self {
            apps: Vec::new(),
            installed: HashSet::new(),
        }
    }

    /// The simulator's stock catalogue with its default installed set
    pub fn with_defaults() -> Self {
        let tool = |key: &str| ContentKind::Tool(key.to_string());
        let mut registry = Self::new();
        let apps = [
            AppDescriptor::new("terminal", "Terminal", "🖥️", ContentKind::Terminal)
                .system()
                .starts_open(),
            AppDescriptor::new("fileSystem", "File System", "📁", ContentKind::FileExplorer).system(),
            AppDescriptor::new("textEditor", "Text Editor", "📝", ContentKind::TextEditor),
            AppDescriptor::new("firefox", "Firefox", "🔥", tool("TOOL_FIREFOX")),
            AppDescriptor::new("brave", "Brave Browser", "🦁", tool("TOOL_BRAVE")),
            AppDescriptor::new("metasploit", "Metasploit", "Ⓜ️", tool("TOOL_METASPLOIT")),
            AppDescriptor::new("wireshark", "Wireshark", "🦈", tool("TOOL_WIRESHARK")),
            AppDescriptor::new("burpSuite", "Burp Suite", "🕷️", tool("TOOL_BURP_SUITE")),
            AppDescriptor::new("cherryTree", "CherryTree", "🍒", tool("TOOL_CHERRY_TREE")),
            AppDescriptor::new("socialToolkit", "Social Toolkit", "🕵️", tool("TOOL_SOCIAL_TOOLKIT")),
            AppDescriptor::new("bruteForce", "Brute Force", "🔐", tool("TOOL_BRUTE_FORCE")),
            AppDescriptor::new("systemMonitor", "System Monitor", "📈", tool("TOOL_SYSTEM_MONITOR")),
            AppDescriptor::new("themeSettings", "Theme Settings", "🎨", ContentKind::ThemeSettings),
            AppDescriptor::new("bitcoinMiner", "Bitcoin Miner", "💰", tool("TOOL_BITCOIN_MINER")),
            AppDescriptor::new("nmapScanner", "Nmap Scanner", "📡", tool("TOOL_NMAP")),
            AppDescriptor::new("htop", "Htop", "📊", tool("TOOL_HTOP")),
            AppDescriptor::new("cmatrix", "CMatrix", "🟩", tool("TOOL_CMATRIX")),
        ];
        for app in apps {
            registry.register(app);
        }
        for id in Self::default_installed() {
            registry.installed.insert(id.to_string());
        }
        registry
    }

    pub fn default_installed() -> &'static [&'static str] {
        &[
            "terminal",
            "fileSystem",
            "textEditor",
            "firefox",
            "brave",
            "metasploit",
            "wireshark",
            "burpSuite",
            "cherryTree",
            "socialToolkit",
            "bruteForce",
            "systemMonitor",
            "themeSettings",
            "bitcoinMiner",
            "nmapScanner",
        ]
    }

    /// Register an app; re-registering an id replaces its descriptor in place
    pub fn register(&mut self, app: AppDescriptor) {
        match self.apps.iter().position(|a| a.id == app.id) {
            Some(index) => self.apps[index] = app,
            None => self.apps.push(app),
        }
    }

    pub fn get(&self, id: &str) -> Option<&AppDescriptor> {
        self.apps.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_installed(&self, id: &str) -> bool {
        self.installed.contains(id)
    }

    /// Registered apps in registration order
    pub fn apps(&self) -> impl Iterator<Item = &AppDescriptor> {
        self.apps.iter()
    }

    /// Installed ids in registration order
    pub fn installed_ids(&self) -> Vec<String> {
        self.apps
            .iter()
            .filter(|a| self.installed.contains(&a.id))
            .map(|a| a.id.clone())
            .collect()
    }

    /// Check that `id` can be opened
    pub fn check_installed(&self, id: &str) -> Result<&AppDescriptor, WindowError> {
        let app = self
            .get(id)
            .ok_or_else(|| WindowError::UnknownApp(id.to_string()))?;
        if !self.installed.contains(id) {
            return Err(WindowError::NotInstalled(id.to_string()));
        }
        Ok(app)
    }

    /// Returns whether the installed set changed
    pub fn install(&mut self, id: &str) -> Result<bool, WindowError> {
        if !self.contains(id) {
            return Err(WindowError::UnknownApp(id.to_string()));
        }
        Ok(self.installed.insert(id.to_string()))
    }

    /// Returns whether the installed set changed
    pub fn uninstall(&mut self, id: &str) -> Result<bool, WindowError> {
        let app = self
            .get(id)
            .ok_or_else(|| WindowError::UnknownApp(id.to_string()))?;
        if app.system {
            return Err(WindowError::ProtectedApp(id.to_string()));
        }
        Ok(self.installed.remove(id))
    }

    /// Replace the installed set; unknown ids are dropped and system apps are always kept
    pub fn set_installed<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut installed: HashSet<String> = ids
            .into_iter()
            .filter(|id| self.contains(id.as_ref()))
            .map(|id| id.as_ref().to_string())
            .collect();
        for app in self.apps.iter().filter(|a| a.system) {
            installed.insert(app.id.clone());
        }
        self.installed = installed;
    }

    pub fn reset_installed(&mut self) {
        self.set_installed(Self::default_installed().iter().copied());
    }
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogue() {
        let registry = AppRegistry::with_defaults();
        assert_eq!(registry.apps().count(), 17);
        assert!(registry.is_installed("terminal"));
        assert!(!registry.is_installed("htop"));
        assert!(registry.get("terminal").unwrap().starts_open);
    }

    #[test]
    fn test_check_installed_rejections() {
        let registry = AppRegistry::with_defaults();
        assert!(matches!(
            registry.check_installed("cmatrix"),
            Err(WindowError::NotInstalled(_))
        ));
        assert!(matches!(
            registry.check_installed("notepad"),
            Err(WindowError::UnknownApp(_))
        ));
        assert!(registry.check_installed("wireshark").is_ok());
    }

    #[test]
    fn test_system_apps_cannot_be_removed() {
        let mut registry = AppRegistry::with_defaults();
        assert!(matches!(
            registry.uninstall("fileSystem"),
            Err(WindowError::ProtectedApp(_))
        ));
        assert_eq!(registry.uninstall("firefox").unwrap(), true);
        assert_eq!(registry.uninstall("firefox").unwrap(), false);
        assert_eq!(registry.install("firefox").unwrap(), true);
    }

    #[test]
    fn test_set_installed_keeps_system_apps() {
        let mut registry = AppRegistry::with_defaults();
        registry.set_installed(["htop", "bogus"]);
        assert_eq!(registry.installed_ids(), vec!["terminal", "fileSystem", "htop"]);
    }

    #[test]
    fn test_text_editor_content_carries_file() {
        let registry = AppRegistry::with_defaults();
        let editor = registry.get("textEditor").unwrap();
        let context = WindowContext::file(&["root", "notes.txt"]);
        let handle = DefaultContentProvider.provide(editor, Some(&context)).unwrap();
        assert_eq!(handle.key, "SYS_TEXT_EDITOR");
        assert_eq!(handle.resource.as_deref(), Some("root/notes.txt"));
    }
}
