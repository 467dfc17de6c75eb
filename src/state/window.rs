use crate::input_handler::Rect;
use serde::{Deserialize, Serialize};

/// Auxiliary payload attached when a window is opened (e.g. which file to load)
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WindowContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<Vec<String>>,
}

impl WindowContext {
    pub fn file<S: AsRef<str>>(path: &[S]) -> Self {
        Self {
            file_path: Some(path.iter().map(|p| p.as_ref().to_string()).collect()),
        }
    }

    /// Last path component, used to suffix the display title
    pub fn resource_name(&self) -> Option<&str> {
        self.file_path
            .as_ref()
            .and_then(|path| path.last())
            .map(String::as_str)
    }

    /// Slash-joined path, used as the content resource key
    pub fn resource_path(&self) -> Option<String> {
        self.file_path
            .as_ref()
            .filter(|path| !path.is_empty())
            .map(|path| path.join("/"))
    }
}

/// Opaque reference to what a window hosts; the frontend resolves `key`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentHandle {
    pub key: String,                  // What to render (e.g., "SYS_TERMINAL")
    pub resource: Option<String>,     // Resource the content should load
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    pub id: String,                           // App id, stable for the session
    pub title: String,                        // Canonical title
    pub icon: String,
    pub is_open: bool,
    pub is_minimized: bool,                   // Only meaningful while open
    pub geometry: Option<Rect>,               // Unset until first open
    pub is_maximized: bool,
    pub restore_geometry: Option<Rect>,       // Snapshot taken when maximizing
    pub context: Option<WindowContext>,
    #[serde(skip)]
    pub content: Option<ContentHandle>,       // Owned by the content provider
}

impl WindowRecord {
    pub fn closed(id: &str, title: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
            is_open: false,
            is_minimized: false,
            geometry: None,
            is_maximized: false,
            restore_geometry: None,
            context: None,
            content: None,
        }
    }

    /// Rendered and part of the stacking order
    pub fn is_visible(&self) -> bool {
        self.is_open && !self.is_minimized
    }

    /// Title shown in the frame; the canonical title is never mutated
    pub fn display_title(&self) -> String {
        match self.context.as_ref().and_then(|c| c.resource_name()) {
            Some(name) => format!("{} - {}", self.title, name),
            None => self.title.clone(),
        }
    }

    /// Geometry used for drawing, falling back to the stock frame size
    pub fn frame_rect(&self) -> Rect {
        self.geometry.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_suffix() {
        let mut record = WindowRecord::closed("textEditor", "Text Editor", "📝");
        assert_eq!(record.display_title(), "Text Editor");

        record.context = Some(WindowContext::file(&["root", "Documents", "notes.txt"]));
        assert_eq!(record.display_title(), "Text Editor - notes.txt");
        assert_eq!(record.title, "Text Editor");
    }

    #[test]
    fn test_resource_path() {
        let context = WindowContext::file(&["root", "notes.txt"]);
        assert_eq!(context.resource_path(), Some("root/notes.txt".to_string()));
        assert_eq!(WindowContext::file::<&str>(&[]).resource_path(), None);
        assert_eq!(WindowContext::default().resource_name(), None);
    }
}
