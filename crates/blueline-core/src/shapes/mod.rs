//! Shape model: the closed variant set, construction, and measurements.

pub mod geometry;

use std::fmt;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Camera;
pub use geometry::Geometry;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Screen-space distance within which a pointer counts as on a node.
///
/// Tight on purpose: re-selection is expected to happen with the pointer
/// parked exactly on a node by the point magnet.
pub const NODE_HIT_TOLERANCE: f64 = 0.01;

/// Stroke appearance carried by every shape; persisted, never computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    /// Stroke width in world units
    pub width: f64,
    /// Dash pattern entries, relative to the stroke width
    #[serde(default)]
    pub dash: Vec<f64>,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            width: 1.0,
            dash: Vec::new(),
        }
    }
}

/// The closed set of shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Box,
    Circle,
    Oval,
    Curve,
    Sector,
}

impl ShapeKind {
    /// Number of nodes the variant is constructed from.
    pub fn node_cap(self) -> usize {
        match self {
            ShapeKind::Line | ShapeKind::Box | ShapeKind::Circle | ShapeKind::Oval => 2,
            ShapeKind::Curve | ShapeKind::Sector => 3,
        }
    }

    /// Tag byte used in the document format.
    pub fn tag(self) -> u8 {
        match self {
            ShapeKind::Line => 0,
            ShapeKind::Box => 1,
            ShapeKind::Circle => 2,
            ShapeKind::Oval => 3,
            ShapeKind::Curve => 4,
            ShapeKind::Sector => 5,
        }
    }

    /// Reverse of [`ShapeKind::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ShapeKind::Line),
            1 => Some(ShapeKind::Box),
            2 => Some(ShapeKind::Circle),
            3 => Some(ShapeKind::Oval),
            4 => Some(ShapeKind::Curve),
            5 => Some(ShapeKind::Sector),
            _ => None,
        }
    }
}

/// Per-variant measurements in real units, ready for a status label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizeInfo {
    Length(f64),
    Extent { width: f64, height: f64 },
    Radius(f64),
    Radii { x: f64, y: f64 },
    Pie { radius: f64, angle: f64 },
}

impl fmt::Display for SizeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeInfo::Length(length) => write!(f, "Length: {length:.1}"),
            SizeInfo::Extent { width, height } => {
                write!(f, "Width: {width:.1}\tHeight: {height:.1}")
            }
            SizeInfo::Radius(radius) => write!(f, "Radius: {radius:.1}"),
            SizeInfo::Radii { x, y } => write!(f, "RadiusX: {x:.1}\tRadiusY: {y:.1}"),
            SizeInfo::Pie { radius, angle } => {
                write!(f, "Radius: {radius:.1}\tSector Angle: {angle:.1}")
            }
        }
    }
}

/// A blueprint shape: an ordered node sequence filled node by node during
/// construction, plus cached display geometry.
///
/// The node sequence length is fixed at the variant's cap from birth; the
/// construction cursor counts how many nodes have been supplied so far. A
/// finalized shape always has its cursor at the cap.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    nodes: Vec<Point>,
    cursor: usize,
    /// Stroke appearance, persisted with the shape
    pub pen: Pen,
    geometry: Geometry,
}

impl Shape {
    /// Create an empty shape with all node slots degenerate at the origin.
    pub fn new(kind: ShapeKind, pen: Pen) -> Self {
        let nodes = vec![Point::ZERO; kind.node_cap()];
        let geometry = Geometry::derive(kind, &nodes, 0);
        Self {
            id: Uuid::new_v4(),
            kind,
            nodes,
            cursor: 0,
            pen,
            geometry,
        }
    }

    /// Start a construction at the given world position.
    ///
    /// Fills node 0 and node 1 at the position, so every construction
    /// starts as a degenerate zero-length shape, and returns the shape
    /// together with the index of the node left under the pointer.
    pub fn begin_at(kind: ShapeKind, pen: Pen, world: Point) -> (Self, usize) {
        let mut shape = Self::new(kind, pen);
        let mut selected = 0;
        for _ in 0..2 {
            if let Some(index) = shape.next_node() {
                shape.set_node(index, world);
                selected = index;
            }
        }
        shape.update();
        (shape, selected)
    }

    /// Rebuild a shape from persisted data.
    ///
    /// Slots are pre-allocated at the variant's cap, the read positions are
    /// assigned in order, and the cursor lands on the supplied count, so the
    /// shape re-enters the same state an interactive construction leaves.
    pub fn reconstruct(kind: ShapeKind, pen: Pen, positions: &[Point]) -> Self {
        let mut nodes = vec![Point::ZERO; kind.node_cap()];
        for (slot, position) in nodes.iter_mut().zip(positions) {
            *slot = *position;
        }
        let cursor = positions.len().min(kind.node_cap());
        let geometry = Geometry::derive(kind, &nodes, cursor);
        Self {
            id: Uuid::new_v4(),
            kind,
            nodes,
            cursor,
            pen,
            geometry,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Node positions in placement order; slots past the cursor are still
    /// degenerate.
    pub fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    /// How many nodes have been supplied so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn node(&self, index: usize) -> Point {
        self.nodes[index]
    }

    pub fn set_node(&mut self, index: usize, position: Point) {
        self.nodes[index] = position;
    }

    /// Cached display geometry, valid as of the last [`Shape::update`].
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Advance construction: the next unfilled node index, or `None` once
    /// the variant's cap is reached.
    ///
    /// Circle and Sector run their one-time completion rule when full:
    /// the circle aligns its radius vector and the sector projects its
    /// tip onto the radius. Both refresh the cached geometry, so a
    /// committed shape always reflects the adjusted nodes.
    pub fn next_node(&mut self) -> Option<usize> {
        if self.cursor == self.nodes.len() {
            match self.kind {
                ShapeKind::Circle => {
                    self.nodes[1] = geometry::aligned_radius_tip(self.nodes[0], self.nodes[1]);
                    self.update();
                }
                ShapeKind::Sector => {
                    self.nodes[2] =
                        geometry::projected_tip(self.nodes[0], self.nodes[1], self.nodes[2]);
                    self.update();
                }
                _ => {}
            }
            return None;
        }

        let index = self.cursor;
        self.cursor += 1;
        Some(index)
    }

    /// The node placed two positions before the cursor, a construction
    /// anchor; `None` when fewer than two nodes are placed.
    pub fn previous_node(&self) -> Option<usize> {
        if self.cursor < 2 {
            return None;
        }
        Some(self.cursor - 2)
    }

    /// The anchor node the orthogonal lock aligns against, relative to the
    /// selected node. Variants without a meaningful anchor return `None`.
    pub fn orientation_node(&self, selected: usize) -> Option<usize> {
        match self.kind {
            ShapeKind::Line | ShapeKind::Circle => Some(if selected == 0 { 1 } else { 0 }),
            ShapeKind::Curve => {
                if self.cursor == 2 {
                    Some(if selected == 0 { 1 } else { 0 })
                } else if selected != 2 {
                    Some(2)
                } else {
                    None
                }
            }
            ShapeKind::Box | ShapeKind::Oval | ShapeKind::Sector => None,
        }
    }

    /// Index of the first node within [`NODE_HIT_TOLERANCE`] of the screen
    /// point, else `None`.
    pub fn node_at(&self, screen: Point, camera: &Camera) -> Option<usize> {
        self.nodes
            .iter()
            .position(|&node| camera.world_to_screen(node).distance(screen) < NODE_HIT_TOLERANCE)
    }

    /// Recompute the cached display geometry from the current nodes.
    pub fn update(&mut self) {
        self.geometry = Geometry::derive(self.kind, &self.nodes, self.cursor);
    }

    /// Variant-specific measurements scaled to real units, or `None` where
    /// the variant has nothing meaningful to report.
    pub fn size_info(&self, factor: f64) -> Option<SizeInfo> {
        match self.kind {
            ShapeKind::Line => {
                Some(SizeInfo::Length(self.nodes[0].distance(self.nodes[1]) * factor))
            }
            ShapeKind::Box => {
                let delta = self.nodes[1] - self.nodes[0];
                Some(SizeInfo::Extent {
                    width: delta.x.abs() * factor,
                    height: delta.y.abs() * factor,
                })
            }
            ShapeKind::Circle => {
                Some(SizeInfo::Radius(self.nodes[0].distance(self.nodes[1]) * factor))
            }
            ShapeKind::Oval => {
                let delta = self.nodes[1] - self.nodes[0];
                Some(SizeInfo::Radii {
                    x: delta.x.abs() / 2.0 * factor,
                    y: delta.y.abs() / 2.0 * factor,
                })
            }
            ShapeKind::Curve => None,
            ShapeKind::Sector => {
                if self.cursor < 2 {
                    return None;
                }
                let radius = self.nodes[0].distance(self.nodes[1]) * factor;
                let Geometry::Pie { sweep_angle, .. } = self.geometry else {
                    return Some(SizeInfo::Radius(radius));
                };
                Some(SizeInfo::Pie {
                    radius,
                    angle: f64::from(sweep_angle.abs()) / 16.0,
                })
            }
        }
    }
}
