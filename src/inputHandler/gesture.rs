// Pointer gesture handling: turns press/move/release sequences into live
// geometry writes through the window store

use super::spatial::{compute_drag, compute_resize};
use super::types::{GeometryPatch, Point, PointerButton, PressTarget, Rect, ResizeEdge, Viewport};
use crate::error::WindowError;
use crate::state::WindowStore;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureKind {
    /// Position is recomputed from the total travel on every move
    Drag { start_pointer: Point, start_geometry: Rect },
    /// Anchor advances on every move
    Resize { edge: ResizeEdge, anchor: Point },
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveGesture {
    window_id: String,
    kind: GestureKind,
}

/// Result of feeding one pointer event to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Nothing happened (no gesture, hidden window, bad input)
    Ignored,
    /// Window raised, no gesture started
    Focused,
    DragStarted,
    ResizeStarted(ResizeEdge),
    /// Geometry written for the active window
    Moved(Rect),
    MaximizeToggled(bool),
    Ended,
}

impl PointerOutcome {
    /// False when the event left the scene untouched
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, PointerOutcome::Ignored)
    }
}

/// Single-pointer gesture state machine. At most one gesture is live at a time.
#[derive(Debug, Default)]
pub struct GestureController {
    active: Option<ActiveGesture>,
}

impl GestureController {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn active_window(&self) -> Option<&str> {
        self.active.as_ref().map(|g| g.window_id.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Press on a window frame. Every press raises the window; primary presses
    /// on the title bar or a resize handle of a non-maximized window also start
    /// a gesture.
    pub fn pointer_down(
        &mut self,
        store: &mut WindowStore,
        id: &str,
        target: PressTarget,
        button: PointerButton,
        pointer: Point,
    ) -> Result<PointerOutcome, WindowError> {
        if let Some(active) = &self.active {
            warn!(window = %id, active = %active.window_id, "press ignored, gesture already active");
            return Err(WindowError::GestureActive(active.window_id.clone()));
        }

        let (visible, maximized, geometry) = match store.get(id) {
            Some(win) => (win.is_visible(), win.is_maximized, win.frame_rect()),
            None => return Err(WindowError::UnknownApp(id.to_string())),
        };
        if !visible {
            return Ok(PointerOutcome::Ignored);
        }
        if !pointer.is_finite() {
            warn!(window = %id, ?pointer, "press with non-finite pointer ignored");
            return Ok(PointerOutcome::Ignored);
        }

        store.focus(id);

        if button != PointerButton::Primary || maximized {
            return Ok(PointerOutcome::Focused);
        }

        let (kind, outcome) = match target {
            PressTarget::TitleBar => (
                GestureKind::Drag {
                    start_pointer: pointer,
                    start_geometry: geometry,
                },
                PointerOutcome::DragStarted,
            ),
            PressTarget::Resize(edge) => (
                GestureKind::Resize {
                    edge,
                    anchor: pointer,
                },
                PointerOutcome::ResizeStarted(edge),
            ),
            PressTarget::Control(_) | PressTarget::Body => return Ok(PointerOutcome::Focused),
        };

        debug!(window = %id, ?kind, "gesture started");
        self.active = Some(ActiveGesture {
            window_id: id.to_string(),
            kind,
        });
        Ok(outcome)
    }

    /// Pointer moved anywhere on the page
    pub fn pointer_move(
        &mut self,
        store: &mut WindowStore,
        pointer: Point,
        viewport: &Viewport,
    ) -> Result<PointerOutcome, WindowError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(PointerOutcome::Ignored);
        };
        if !pointer.is_finite() {
            warn!(window = %active.window_id, ?pointer, "move with non-finite pointer ignored");
            return Ok(PointerOutcome::Ignored);
        }

        let id = active.window_id.clone();
        let current = match store.get(&id) {
            Some(win) if win.is_visible() && !win.is_maximized => win.frame_rect(),
            _ => {
                // Window was closed, minimized or maximized underneath the gesture
                debug!(window = %id, "gesture dropped, window no longer draggable");
                self.active = None;
                return Ok(PointerOutcome::Ended);
            }
        };

        let patch = match &mut active.kind {
            GestureKind::Drag {
                start_pointer,
                start_geometry,
            } => {
                let delta = pointer.delta_from(*start_pointer);
                let siblings = store.sibling_geometries(&id);
                let position = compute_drag(
                    start_geometry,
                    delta,
                    &siblings,
                    viewport,
                    store.config().snap_threshold,
                );
                GeometryPatch::position(position.x, position.y)
            }
            GestureKind::Resize { edge, anchor } => {
                let delta = pointer.delta_from(*anchor);
                *anchor = pointer;
                let config = store.config();
                GeometryPatch::full(compute_resize(
                    &current,
                    delta,
                    *edge,
                    config.min_width,
                    config.min_height,
                ))
            }
        };

        let rect = store.update_geometry(&id, patch)?;
        Ok(PointerOutcome::Moved(rect))
    }

    /// Release ends the gesture; no further geometry is written
    pub fn pointer_up(&mut self) -> PointerOutcome {
        match self.active.take() {
            Some(gesture) => {
                debug!(window = %gesture.window_id, "gesture ended");
                PointerOutcome::Ended
            }
            None => PointerOutcome::Ignored,
        }
    }

    /// Double activation on the title bar toggles maximize instead of dragging
    pub fn double_click(
        &mut self,
        store: &mut WindowStore,
        id: &str,
        target: PressTarget,
        viewport: &Viewport,
    ) -> Result<PointerOutcome, WindowError> {
        if target != PressTarget::TitleBar {
            return Ok(PointerOutcome::Ignored);
        }
        if !store.get(id).map_or(false, |w| w.is_visible()) {
            return Ok(PointerOutcome::Ignored);
        }
        if self.active_window() == Some(id) {
            self.active = None;
        }
        let maximized = store.toggle_maximize(id, viewport)?;
        Ok(PointerOutcome::MaximizeToggled(maximized))
    }

    /// Abandon any live gesture (e.g. the host lost pointer capture)
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_handler::WindowControl;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 830.0, 30.0, 100.0)
    }

    fn store_with_terminal_at(rect: Rect) -> WindowStore {
        let mut store = WindowStore::default().with_seed(1);
        store.update_geometry("terminal", GeometryPatch::full(rect)).unwrap();
        store
    }

    #[test]
    fn test_drag_uses_total_delta() {
        let mut store = store_with_terminal_at(Rect::new(200.0, 200.0, 400.0, 300.0));
        let mut gestures = GestureController::new();

        let started = gestures
            .pointer_down(&mut store, "terminal", PressTarget::TitleBar, PointerButton::Primary, Point::new(250.0, 210.0))
            .unwrap();
        assert_eq!(started, PointerOutcome::DragStarted);

        gestures.pointer_move(&mut store, Point::new(300.0, 260.0), &viewport()).unwrap();
        let outcome = gestures.pointer_move(&mut store, Point::new(330.0, 250.0), &viewport()).unwrap();
        assert_eq!(outcome, PointerOutcome::Moved(Rect::new(280.0, 240.0, 400.0, 300.0)));

        assert_eq!(gestures.pointer_up(), PointerOutcome::Ended);
        let after = gestures.pointer_move(&mut store, Point::new(900.0, 900.0), &viewport()).unwrap();
        assert_eq!(after, PointerOutcome::Ignored);
        assert_eq!(
            store.get("terminal").unwrap().geometry,
            Some(Rect::new(280.0, 240.0, 400.0, 300.0))
        );
    }

    #[test]
    fn test_drag_snaps_to_left_edge() {
        let mut store = store_with_terminal_at(Rect::new(200.0, 200.0, 400.0, 300.0));
        let mut gestures = GestureController::new();
        gestures
            .pointer_down(&mut store, "terminal", PressTarget::TitleBar, PointerButton::Primary, Point::new(210.0, 205.0))
            .unwrap();

        let outcome = gestures.pointer_move(&mut store, Point::new(22.0, 305.0), &viewport()).unwrap();
        assert_eq!(outcome, PointerOutcome::Moved(Rect::new(0.0, 300.0, 400.0, 300.0)));
    }

    #[test]
    fn test_drag_snaps_against_sibling() {
        let mut store = store_with_terminal_at(Rect::new(50.0, 100.0, 300.0, 300.0));
        store.open("firefox", None, &viewport()).unwrap();
        store
            .update_geometry("firefox", GeometryPatch::full(Rect::new(500.0, 100.0, 300.0, 300.0)))
            .unwrap();

        let mut gestures = GestureController::new();
        gestures
            .pointer_down(&mut store, "terminal", PressTarget::TitleBar, PointerButton::Primary, Point::new(60.0, 110.0))
            .unwrap();
        // Right edge travels to 490, 10px short of firefox
        let outcome = gestures.pointer_move(&mut store, Point::new(200.0, 110.0), &viewport()).unwrap();
        assert_eq!(outcome, PointerOutcome::Moved(Rect::new(200.0, 100.0, 300.0, 300.0)));
    }

    #[test]
    fn test_resize_is_incremental() {
        let mut store = store_with_terminal_at(Rect::new(100.0, 100.0, 400.0, 300.0));
        let mut gestures = GestureController::new();
        gestures
            .pointer_down(
                &mut store,
                "terminal",
                PressTarget::Resize(ResizeEdge::TopLeft),
                PointerButton::Primary,
                Point::new(100.0, 100.0),
            )
            .unwrap();

        gestures.pointer_move(&mut store, Point::new(90.0, 80.0), &viewport()).unwrap();
        let outcome = gestures.pointer_move(&mut store, Point::new(80.0, 70.0), &viewport()).unwrap();
        assert_eq!(outcome, PointerOutcome::Moved(Rect::new(80.0, 70.0, 420.0, 330.0)));
    }

    #[test]
    fn test_second_press_rejected_while_active() {
        let mut store = store_with_terminal_at(Rect::new(100.0, 100.0, 400.0, 300.0));
        store.open("wireshark", None, &viewport()).unwrap();

        let mut gestures = GestureController::new();
        gestures
            .pointer_down(&mut store, "terminal", PressTarget::TitleBar, PointerButton::Primary, Point::new(120.0, 110.0))
            .unwrap();
        let second = gestures.pointer_down(
            &mut store,
            "wireshark",
            PressTarget::TitleBar,
            PointerButton::Primary,
            Point::new(400.0, 300.0),
        );
        assert!(matches!(second, Err(WindowError::GestureActive(_))));
        assert_eq!(gestures.active_window(), Some("terminal"));
        assert_eq!(store.top_id(), Some("terminal"));
    }

    #[test]
    fn test_press_focuses_without_gesture() {
        let mut store = store_with_terminal_at(Rect::new(100.0, 100.0, 400.0, 300.0));
        store.open("wireshark", None, &viewport()).unwrap();
        let mut gestures = GestureController::new();

        let outcome = gestures
            .pointer_down(
                &mut store,
                "terminal",
                PressTarget::Control(WindowControl::Close),
                PointerButton::Primary,
                Point::new(480.0, 110.0),
            )
            .unwrap();
        assert_eq!(outcome, PointerOutcome::Focused);
        assert_eq!(store.top_id(), Some("terminal"));
        assert!(!gestures.is_active());

        let outcome = gestures
            .pointer_down(&mut store, "wireshark", PressTarget::TitleBar, PointerButton::Secondary, Point::new(0.0, 0.0))
            .unwrap();
        assert_eq!(outcome, PointerOutcome::Focused);
        assert!(!gestures.is_active());
    }

    #[test]
    fn test_maximized_window_does_not_drag() {
        let mut store = store_with_terminal_at(Rect::new(100.0, 100.0, 400.0, 300.0));
        store.toggle_maximize("terminal", &viewport()).unwrap();
        let mut gestures = GestureController::new();

        let outcome = gestures
            .pointer_down(&mut store, "terminal", PressTarget::TitleBar, PointerButton::Primary, Point::new(10.0, 10.0))
            .unwrap();
        assert_eq!(outcome, PointerOutcome::Focused);
        assert!(!gestures.is_active());
    }

    #[test]
    fn test_double_click_toggles_maximize() {
        let original = Rect::new(100.0, 100.0, 400.0, 300.0);
        let mut store = store_with_terminal_at(original);
        let mut gestures = GestureController::new();

        gestures
            .pointer_down(&mut store, "terminal", PressTarget::TitleBar, PointerButton::Primary, Point::new(110.0, 110.0))
            .unwrap();
        let outcome = gestures
            .double_click(&mut store, "terminal", PressTarget::TitleBar, &viewport())
            .unwrap();
        assert_eq!(outcome, PointerOutcome::MaximizeToggled(true));
        assert!(!gestures.is_active());
        assert_eq!(
            store.get("terminal").unwrap().geometry,
            Some(Rect::new(0.0, 0.0, 1000.0, 700.0))
        );

        gestures
            .double_click(&mut store, "terminal", PressTarget::TitleBar, &viewport())
            .unwrap();
        assert_eq!(store.get("terminal").unwrap().geometry, Some(original));
    }

    #[test]
    fn test_non_finite_pointer_is_rejected() {
        let original = Rect::new(100.0, 100.0, 400.0, 300.0);
        let mut store = store_with_terminal_at(original);
        let mut gestures = GestureController::new();
        gestures
            .pointer_down(&mut store, "terminal", PressTarget::TitleBar, PointerButton::Primary, Point::new(110.0, 110.0))
            .unwrap();

        let outcome = gestures
            .pointer_move(&mut store, Point::new(f64::NAN, 200.0), &viewport())
            .unwrap();
        assert_eq!(outcome, PointerOutcome::Ignored);
        assert_eq!(store.get("terminal").unwrap().geometry, Some(original));
        assert!(gestures.is_active());
    }

    #[test]
    fn test_gesture_dropped_when_window_closes() {
        let mut store = store_with_terminal_at(Rect::new(100.0, 100.0, 400.0, 300.0));
        let mut gestures = GestureController::new();
        gestures
            .pointer_down(&mut store, "terminal", PressTarget::TitleBar, PointerButton::Primary, Point::new(110.0, 110.0))
            .unwrap();
        store.close("terminal").unwrap();

        let outcome = gestures.pointer_move(&mut store, Point::new(300.0, 300.0), &viewport()).unwrap();
        assert_eq!(outcome, PointerOutcome::Ended);
        assert!(!gestures.is_active());
    }

    #[test]
    fn test_idle_moves_do_not_redraw() {
        let mut store = store_with_terminal_at(Rect::new(100.0, 100.0, 400.0, 300.0));
        let mut gestures = GestureController::new();

        let idle = gestures.pointer_move(&mut store, Point::new(50.0, 50.0), &viewport()).unwrap();
        assert!(!idle.needs_redraw());

        gestures
            .pointer_down(&mut store, "terminal", PressTarget::TitleBar, PointerButton::Primary, Point::new(110.0, 110.0))
            .unwrap();
        let moved = gestures.pointer_move(&mut store, Point::new(140.0, 130.0), &viewport()).unwrap();
        assert!(moved.needs_redraw());
        assert!(gestures.pointer_up().needs_redraw());
        assert!(!gestures.pointer_up().needs_redraw());
    }
}
