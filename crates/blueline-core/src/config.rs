//! Sheet formats and workspace sizing configuration.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Paper format a document is laid out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SheetFormat {
    A3,
    A4,
}

impl SheetFormat {
    /// Sheet dimensions in millimetres.
    pub fn size_mm(self) -> Size {
        match self {
            SheetFormat::A3 => Size::new(420.0, 297.0),
            SheetFormat::A4 => Size::new(210.0, 297.0),
        }
    }

    /// Tag byte used in the document format.
    pub fn tag(self) -> u8 {
        match self {
            SheetFormat::A3 => 0,
            SheetFormat::A4 => 1,
        }
    }

    /// Reverse of [`SheetFormat::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(SheetFormat::A3),
            1 => Some(SheetFormat::A4),
            _ => None,
        }
    }
}

/// Blueprint axes addressable by the coordinate readout and locator.
///
/// A sheet shows three axes of the drawn part meeting at its centre, so a
/// 2D position is always read as one of the pairs X/Y, X/Z, or Y/Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Label prefix used by the readout formatting.
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Immutable sizing configuration injected into each workspace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// World-space extent a sheet maps onto; the blueprint origin sits at
    /// its centre.
    pub reference_size: Size,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            reference_size: Size::new(1920.0, 1080.0),
        }
    }
}

impl WorkspaceConfig {
    pub fn new(reference_size: Size) -> Self {
        Self { reference_size }
    }

    /// World-to-real-unit scale factor for the given sheet format.
    pub fn unit_factor(&self, format: SheetFormat) -> f64 {
        format.size_mm().width / self.reference_size.width
    }

    /// World-space centre of the reference canvas, where the axes meet.
    pub fn centre(&self) -> Point {
        Point::new(
            self.reference_size.width / 2.0,
            self.reference_size.height / 2.0,
        )
    }

    /// Map a user-entered coordinate pair in sheet units to a world
    /// position around the centre.
    ///
    /// Only the pairs X/Y, X/Z, and Y/Z address a quadrant; any other
    /// combination yields `None`.
    pub fn axis_location(
        &self,
        format: SheetFormat,
        first: (Axis, f64),
        second: (Axis, f64),
    ) -> Option<Point> {
        let factor = self.unit_factor(format);
        let centre = self.centre();
        let a = first.1 / factor;
        let b = second.1 / factor;

        match (first.0, second.0) {
            (Axis::X, Axis::Y) => Some(Point::new(centre.x - a, centre.y + b)),
            (Axis::X, Axis::Z) => Some(Point::new(centre.x - a, centre.y - b)),
            (Axis::Y, Axis::Z) => Some(Point::new(centre.x + a, centre.y - b)),
            _ => None,
        }
    }
}
