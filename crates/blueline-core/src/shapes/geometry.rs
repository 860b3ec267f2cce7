//! Cached display geometry and the per-variant derivation rules.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use kurbo::{BezPath, Line, Point, Rect, Vec2};

use super::ShapeKind;
use crate::geom;

/// Slack when matching the rotated start edge against the placed tip while
/// resolving the sweep direction.
const SWEEP_MATCH_TOLERANCE: f64 = 0.01;

/// Pie angles are expressed in sixteenths of a degree.
const SIXTEENTHS_PER_RADIAN: f64 = 16.0 * (180.0 / PI);

/// Display geometry cached by a shape, a pure function of its node
/// positions. Hosts render these; the engine never draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Straight segment between two nodes.
    Segment(Line),
    /// Rectangle spanning two corner nodes.
    Frame(Rect),
    /// Circle about the first node, with the radius segment to the second.
    Disc { bounds: Rect, radius: Line },
    /// Ellipse spanning two corner nodes.
    Ellipse(Rect),
    /// Bezier path, plus the construction rails to the control node once it
    /// is placed.
    Path {
        path: BezPath,
        rails: Option<(Line, Line)>,
    },
    /// Circular sector about the first node. Angles are in 1/16-degree
    /// units: the start angle rounds to the nearest unit, the sweep
    /// truncates toward zero.
    Pie {
        bounds: Rect,
        start_angle: i32,
        sweep_angle: i32,
    },
}

impl Geometry {
    /// Recompute the display geometry for the given variant and nodes.
    pub(crate) fn derive(kind: ShapeKind, nodes: &[Point], cursor: usize) -> Geometry {
        match kind {
            ShapeKind::Line => Geometry::Segment(Line::new(nodes[0], nodes[1])),
            ShapeKind::Box => Geometry::Frame(Rect::from_points(nodes[0], nodes[1])),
            ShapeKind::Circle => disc(nodes[0], nodes[1]),
            ShapeKind::Oval => Geometry::Ellipse(Rect::from_points(nodes[0], nodes[1])),
            ShapeKind::Curve => curve(nodes, cursor),
            ShapeKind::Sector => {
                if cursor == 3 {
                    pie(nodes)
                } else {
                    Geometry::Segment(Line::new(nodes[0], nodes[1]))
                }
            }
        }
    }
}

fn disc(p1: Point, p2: Point) -> Geometry {
    let radius = p1.distance(p2);
    let bounds = Rect::new(p1.x - radius, p1.y - radius, p1.x + radius, p1.y + radius);
    Geometry::Disc {
        bounds,
        radius: Line::new(p1, p2),
    }
}

fn curve(nodes: &[Point], cursor: usize) -> Geometry {
    let p1 = nodes[0];
    let p2 = nodes[1];

    let mut path = BezPath::new();
    path.move_to(p1);

    if cursor == 3 {
        let p3 = nodes[2];
        path.curve_to(p1, p3, p2);
        Geometry::Path {
            path,
            rails: Some((Line::new(p1, p3), Line::new(p2, p3))),
        }
    } else {
        path.line_to(p2);
        Geometry::Path { path, rails: None }
    }
}

fn pie(nodes: &[Point]) -> Geometry {
    let p1 = nodes[0];
    let p2 = nodes[1];
    let p3 = nodes[2];

    let radius = p1.distance(p2);
    let bounds = Rect::new(p1.x - radius, p1.y - radius, p1.x + radius, p1.y + radius);

    let to_p2 = p2 - p1;
    let to_p3 = p3 - p1;

    let start = geom::angle_between(to_p2, Vec2::new(1.0, 0.0)) * SIXTEENTHS_PER_RADIAN;
    let mut start_angle = start.round() as i32;
    if p2.y > p1.y {
        start_angle = -start_angle;
    }

    let sweep = geom::angle_between(to_p3, to_p2);
    let mut sweep_angle = (sweep * SIXTEENTHS_PER_RADIAN) as i32;

    // The unsigned sweep runs toward positive Y exactly when rotating the
    // start edge by it lands on the placed tip; that direction is the
    // negative pie orientation.
    let rotated = geom::rotate(to_p2, sweep);
    let tip = to_p3 * (radius / to_p3.hypot());
    if (rotated - tip).hypot() < SWEEP_MATCH_TOLERANCE {
        sweep_angle = -sweep_angle;
    }

    Geometry::Pie {
        bounds,
        start_angle,
        sweep_angle,
    }
}

/// Circle completion rule: rotate the radius vector onto the nearest
/// alignment, so the two nodes end up exactly axis-aligned no matter how
/// the second was placed.
pub(crate) fn aligned_radius_tip(p1: Point, p2: Point) -> Point {
    let to_p2 = p2 - p1;
    if to_p2.hypot() == 0.0 {
        return p2;
    }

    let mut angle = geom::angle_between(to_p2, Vec2::new(1.0, 0.0));
    while angle - FRAC_PI_2 > 0.0 {
        angle -= FRAC_PI_2;
    }

    let mut correction = if angle < FRAC_PI_4 {
        angle
    } else {
        angle - FRAC_PI_2
    };
    if p2.y > p1.y {
        correction = -correction;
    }

    p1 + geom::rotate(to_p2, correction)
}

/// Sector completion rule: project the tip onto the circle through the
/// second node.
pub(crate) fn projected_tip(p1: Point, p2: Point, p3: Point) -> Point {
    let to_p3 = p3 - p1;
    if to_p3.hypot() == 0.0 {
        return p3;
    }

    let radius = p1.distance(p2);
    p1 + to_p3 * (radius / to_p3.hypot())
}
