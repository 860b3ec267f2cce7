//! Magnet functions for aligning the pointer to existing nodes.
//!
//! All coordinates here are screen-space; the workspace projects node
//! positions through the camera before calling in, so the capture radius
//! feels the same at every zoom level.

use kurbo::Point;

/// Capture radius for the node magnets, in screen pixels.
pub const MAGNET_RADIUS: f64 = 20.0;

/// Result of a magnet pass.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    /// The adjusted point.
    pub point: Point,
    /// Whether the X coordinate was captured.
    pub snapped_x: bool,
    /// Whether the Y coordinate was captured.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no capture.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if either coordinate was captured.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Force the target onto the horizontal or vertical axis through the
/// anchor, whichever the pointer has strayed from less.
///
/// Unlike the node magnets this has no capture radius: one coordinate is
/// always replaced. A dead tie pins the X coordinate.
pub fn lock_to_axis(target: Point, anchor: Point) -> SnapResult {
    let dx = (target.x - anchor.x).abs();
    let dy = (target.y - anchor.y).abs();
    if dx > dy {
        SnapResult {
            point: Point::new(target.x, anchor.y),
            snapped_x: false,
            snapped_y: true,
        }
    } else {
        SnapResult {
            point: Point::new(anchor.x, target.y),
            snapped_x: true,
            snapped_y: false,
        }
    }
}

/// Pull the target onto the grid lines through the given nodes, one axis
/// at a time.
///
/// `x_anchor` is the node elected for horizontal proximity; the vertical
/// line through it can capture the target's X. `y_anchor` works the same
/// way for Y. The two axes are independent, so the pointer can land on
/// the crossing of two different nodes' lines.
pub fn snap_to_lines(
    target: Point,
    x_anchor: Option<Point>,
    y_anchor: Option<Point>,
    radius: f64,
) -> SnapResult {
    let mut result = SnapResult::none(target);
    if let Some(anchor) = x_anchor {
        if (target.x - anchor.x).abs() < radius {
            result.point.x = anchor.x;
            result.snapped_x = true;
        }
    }
    if let Some(anchor) = y_anchor {
        if (target.y - anchor.y).abs() < radius {
            result.point.y = anchor.y;
            result.snapped_y = true;
        }
    }
    result
}

/// Pull the target exactly onto a node when it is within the radius.
pub fn snap_to_node(target: Point, node: Point, radius: f64) -> SnapResult {
    if target.distance(node) < radius {
        SnapResult {
            point: node,
            snapped_x: true,
            snapped_y: true,
        }
    } else {
        SnapResult::none(target)
    }
}
