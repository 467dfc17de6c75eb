// Core geometry and pointer data structures for window interaction

use serde::{Deserialize, Serialize};

/// A window rectangle in desktop pixels (origin at the top-left of the desktop area)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when every component is finite and both dimensions are positive
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Shallow-merge a patch, keeping fields the patch leaves unset.
    pub fn merged(&self, patch: &GeometryPatch) -> Rect {
        Rect {
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            width: patch.width.unwrap_or(self.width),
            height: patch.height.unwrap_or(self.height),
        }
    }
}

impl Default for Rect {
    /// Frame used for an open window that has never been given geometry
    fn default() -> Self {
        Self::new(0.0, 0.0, 640.0, 480.0)
    }
}

/// Pointer position in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn delta_from(&self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Host screen size plus the chrome reserved above and below the desktop area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub reserved_top: f64,
    pub reserved_bottom: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, reserved_top: f64, reserved_bottom: f64) -> Self {
        Self {
            width,
            height,
            reserved_top,
            reserved_bottom,
        }
    }

    /// Height of the area windows live in (between top bar and dock)
    pub fn available_height(&self) -> f64 {
        (self.height - self.reserved_top - self.reserved_bottom).max(0.0)
    }

    pub fn is_well_formed(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.reserved_top.is_finite()
            && self.reserved_bottom.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0, 30.0, 100.0)
    }
}

/// Partial geometry update; unset fields are left untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl GeometryPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn full(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// Drop fields that would corrupt a layout: non-finite numbers anywhere,
    /// and non-positive sizes.
    pub fn sanitized(&self) -> GeometryPatch {
        let finite = |v: Option<f64>| v.filter(|n| n.is_finite());
        let positive = |v: Option<f64>| v.filter(|n| n.is_finite() && *n > 0.0);
        GeometryPatch {
            x: finite(self.x),
            y: finite(self.y),
            width: positive(self.width),
            height: positive(self.height),
        }
    }
}

/// Resize handle on a window frame: one edge or a corner of two adjacent edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeEdge {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    /// Parse the handle direction used by the frame markup ("t", "br", ...)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "t" | "top" => Some(ResizeEdge::Top),
            "b" | "bottom" => Some(ResizeEdge::Bottom),
            "l" | "left" => Some(ResizeEdge::Left),
            "r" | "right" => Some(ResizeEdge::Right),
            "tl" | "top-left" => Some(ResizeEdge::TopLeft),
            "tr" | "top-right" => Some(ResizeEdge::TopRight),
            "bl" | "bottom-left" => Some(ResizeEdge::BottomLeft),
            "br" | "bottom-right" => Some(ResizeEdge::BottomRight),
            _ => None,
        }
    }

    pub fn has_top(&self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    pub fn has_bottom(&self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }

    pub fn has_left(&self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    pub fn has_right(&self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }
}

/// Title bar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowControl {
    Minimize,
    Maximize,
    Close,
}

impl WindowControl {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "minimize" => Some(WindowControl::Minimize),
            "maximize" => Some(WindowControl::Maximize),
            "close" => Some(WindowControl::Close),
            _ => None,
        }
    }
}

/// Part of a window frame that received a pointer press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PressTarget {
    /// Drag handle (title bar)
    TitleBar,
    /// One of the eight resize handles
    Resize(ResizeEdge),
    /// A title bar button; never starts a gesture
    Control(WindowControl),
    /// Window body; click-to-front only
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` code
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => PointerButton::Primary,
            1 => PointerButton::Middle,
            _ => PointerButton::Secondary,
        }
    }
}
