// Geometry and snapping algorithms for window drag, resize and maximize

use super::types::{Point, Rect, ResizeEdge, Viewport};

pub const MIN_WIDTH: f64 = 300.0;
pub const MIN_HEIGHT: f64 = 200.0;
pub const SNAP_THRESHOLD: f64 = 15.0;

/// Clamp a window size to the fixed minimum
pub fn clamp_size(width: f64, height: f64) -> (f64, f64) {
    clamp_size_to(width, height, MIN_WIDTH, MIN_HEIGHT)
}

/// Clamp a window size to the given minimum. NaN collapses to the minimum.
pub fn clamp_size_to(width: f64, height: f64, min_width: f64, min_height: f64) -> (f64, f64) {
    (width.max(min_width), height.max(min_height))
}

/// Calculate the snapped top-left corner for a drag.
///
/// `origin` is the window geometry when the gesture started and `delta` the
/// total pointer travel since then. Viewport edges are applied first, then
/// siblings in slice order; a later qualifying candidate wins on its axis.
pub fn compute_drag(
    origin: &Rect,
    delta: (f64, f64),
    siblings: &[Rect],
    viewport: &Viewport,
    threshold: f64,
) -> Point {
    let mut x = origin.x + delta.0;
    let mut y = origin.y + delta.1;

    if !x.is_finite() || !y.is_finite() {
        return Point::new(origin.x, origin.y);
    }

    let width = origin.width;
    let height = origin.height;
    let screen_width = viewport.width;
    let screen_height = viewport.available_height();

    // Desktop edges
    if near(x, 0.0, threshold) {
        x = 0.0;
    }
    if near(y, 0.0, threshold) {
        y = 0.0;
    }
    if near(x + width, screen_width, threshold) {
        x = screen_width - width;
    }
    if near(y + height, screen_height, threshold) {
        y = screen_height - height;
    }

    // Flush contact with other windows
    for other in siblings.iter().filter(|r| r.is_well_formed()) {
        if near(x, other.right(), threshold) {
            x = other.right();
        }
        if near(x + width, other.x, threshold) {
            x = other.x - width;
        }
        if near(y, other.bottom(), threshold) {
            y = other.bottom();
        }
        if near(y + height, other.y, threshold) {
            y = other.y - height;
        }
    }

    Point::new(x, y)
}

/// Calculate new geometry for a resize gesture.
///
/// `delta` is the pointer travel since the previous move. Trailing edges
/// (right, bottom) only change the size; leading edges (left, top) also move
/// the origin so the opposite edge stays where it was.
pub fn compute_resize(
    origin: &Rect,
    delta: (f64, f64),
    edge: ResizeEdge,
    min_width: f64,
    min_height: f64,
) -> Rect {
    let (dx, dy) = delta;
    if !dx.is_finite() || !dy.is_finite() {
        return *origin;
    }

    let mut width = origin.width;
    let mut height = origin.height;
    if edge.has_right() {
        width += dx;
    }
    if edge.has_left() {
        width -= dx;
    }
    if edge.has_bottom() {
        height += dy;
    }
    if edge.has_top() {
        height -= dy;
    }
    let (width, height) = clamp_size_to(width, height, min_width, min_height);

    let x = if edge.has_left() {
        origin.right() - width
    } else {
        origin.x
    };
    let y = if edge.has_top() {
        origin.bottom() - height
    } else {
        origin.y
    };

    Rect::new(x, y, width, height)
}

/// Full desktop area between the top bar and the dock
pub fn compute_maximized_geometry(viewport: &Viewport) -> Rect {
    Rect::new(0.0, 0.0, viewport.width, viewport.available_height())
}

/// First-open geometry: `ratio` of the viewport capped at `max_size`,
/// centered in the desktop area and shifted by `jitter`.
pub fn default_geometry(
    viewport: &Viewport,
    ratio: f64,
    max_size: (f64, f64),
    jitter: (f64, f64),
) -> Rect {
    let width = (viewport.width * ratio).min(max_size.0);
    let height = (viewport.height * ratio).min(max_size.1);
    let center_x = viewport.width / 2.0 - width / 2.0;
    let center_y = viewport.available_height() / 2.0 - height / 2.0;
    Rect::new(center_x + jitter.0, center_y + jitter.1, width, height)
}

fn near(value: f64, target: f64, threshold: f64) -> bool {
    (value - target).abs() < threshold
}
