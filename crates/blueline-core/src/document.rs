//! Blueprint document: the sheet format and the stored shape list.

use kurbo::Point;

use crate::camera::Camera;
use crate::config::SheetFormat;
use crate::shapes::{Shape, ShapeId};

/// A blueprint document.
///
/// Shapes are kept in storage order, the order they were committed in.
/// Hit tests walk that order and persistence writes it out unchanged, so
/// a saved and reloaded document resolves lookups the same way.
#[derive(Debug, Clone)]
pub struct Document {
    format: SheetFormat,
    shapes: Vec<Shape>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document on the default sheet.
    pub fn new() -> Self {
        Self {
            format: SheetFormat::A3,
            shapes: Vec::new(),
        }
    }

    pub fn format(&self) -> SheetFormat {
        self.format
    }

    pub fn set_format(&mut self, format: SheetFormat) {
        self.format = format;
    }

    /// Append a shape at the end of the storage order.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Remove a shape, returning it for further editing.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|shape| shape.id() == id)?;
        Some(self.shapes.remove(index))
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id() == id)
    }

    /// All shapes in storage order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Replace the whole shape list, keeping the given order.
    pub fn set_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    /// Find the first node under the given screen point, walking shapes in
    /// storage order.
    pub fn find_node_at(&self, screen: Point, camera: &Camera) -> Option<(ShapeId, usize)> {
        self.shapes
            .iter()
            .find_map(|shape| shape.node_at(screen, camera).map(|node| (shape.id(), node)))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}
