//! Pointer-driven editing surface for one document.
//!
//! The workspace owns the camera and the construction state machine,
//! shares its document with the nearest-node worker, and runs the magnet
//! pipeline on every pointer move. Hosts feed it pointer and key events
//! and read back shapes, guides, and readouts to draw a frame.

use std::fmt;
use std::sync::Arc;

use kurbo::{Point, Size};
use parking_lot::Mutex;

use crate::camera::Camera;
use crate::config::{Axis, SheetFormat, WorkspaceConfig};
use crate::document::Document;
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::nearest::{NodeHit, ScanRequest, SearchHandle, SearchHits};
use crate::shapes::{Pen, Shape, ShapeKind, SizeInfo};
use crate::snap;

/// Construction state of the workspace.
///
/// A shape under edit lives here, outside the document, so scans and
/// persistence only ever see committed shapes.
#[derive(Debug, Clone, Default)]
pub enum EditState {
    /// No shape under edit.
    #[default]
    Idle,
    /// One shape is held out of the document with one node following
    /// the pointer.
    Editing { shape: Shape, selected: usize },
}

/// World positions of the nodes whose grid lines hold the pointer.
///
/// Populated only while the line magnet has a coordinate captured;
/// hosts draw a full-width or full-height guide through each anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GuideAnchors {
    /// Node whose vertical line captured the target's X.
    pub x: Option<Point>,
    /// Node whose horizontal line captured the target's Y.
    pub y: Option<Point>,
}

/// Pointer position resolved against the blueprint axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerReadout {
    pub first: (Axis, f64),
    pub second: (Axis, f64),
}

impl fmt::Display for PointerReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1}\t{}: {:.1}",
            self.first.0.label(),
            self.first.1,
            self.second.0.label(),
            self.second.1
        )
    }
}

/// Interactive editing surface over one shared document.
pub struct Workspace {
    document: Arc<Mutex<Document>>,
    camera: Camera,
    config: WorkspaceConfig,
    state: EditState,
    /// Last pointer position after magnet adjustment, in screen space.
    target: Point,
    pan_anchor: Point,
    panning: bool,
    modifiers: Modifiers,
    guides: GuideAnchors,
    search: Option<SearchHandle>,
    active_kind: ShapeKind,
    pen: Pen,
    viewport: Size,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create a workspace over a fresh empty document.
    pub fn new() -> Self {
        Self::with_document(Arc::new(Mutex::new(Document::new())))
    }

    /// Create a workspace over an existing shared document.
    pub fn with_document(document: Arc<Mutex<Document>>) -> Self {
        let config = WorkspaceConfig::default();
        Self {
            document,
            camera: Camera::new(),
            viewport: config.reference_size,
            config,
            state: EditState::Idle,
            target: Point::ZERO,
            pan_anchor: Point::ZERO,
            panning: false,
            modifiers: Modifiers::default(),
            guides: GuideAnchors::default(),
            search: None,
            active_kind: ShapeKind::Line,
            pen: Pen::default(),
        }
    }

    /// Connect the nearest-node worker used by the line and node magnets.
    pub fn attach_search(&mut self, search: SearchHandle) {
        self.search = Some(search);
    }

    /// Feed one pointer event through the state machine.
    ///
    /// Release actions run at the last moved-to target, after magnet
    /// adjustment, not at the position carried by the release event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => self.on_pointer_down(position, button),
            PointerEvent::Up { button, .. } => self.on_pointer_up(button),
            PointerEvent::Move { position } => self.on_pointer_move(position),
            PointerEvent::Scroll { position, delta } => {
                let zoom_in = delta.x > 0.0 || delta.y > 0.0;
                self.camera.zoom_at(position, zoom_in);
            }
        }
    }

    fn on_pointer_down(&mut self, position: Point, button: MouseButton) {
        self.pan_anchor = position;
        if button == MouseButton::Middle {
            self.panning = true;
        }
    }

    fn on_pointer_up(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left => self.on_left_release(),
            MouseButton::Right => self.on_right_release(),
            MouseButton::Middle => self.panning = false,
        }
    }

    fn on_pointer_move(&mut self, position: Point) {
        self.target = position;

        if self.panning {
            let delta = position - self.pan_anchor;
            self.camera.pan(delta);
            self.pan_anchor = position;
        }

        if self.modifiers.wants_candidates() {
            if let Some(search) = &self.search {
                search.request(ScanRequest {
                    target: position,
                    camera: self.camera.clone(),
                    document: Arc::clone(&self.document),
                });
            }
        }

        self.apply_magnets();

        if let EditState::Editing { shape, selected } = &mut self.state {
            shape.set_node(*selected, self.camera.screen_to_world(self.target));
            shape.update();
        }
    }

    /// Left release: start a construction, claim the next node, or commit.
    fn on_left_release(&mut self) {
        match std::mem::replace(&mut self.state, EditState::Idle) {
            EditState::Idle => {
                let world = self.camera.screen_to_world(self.target);
                let (shape, selected) = Shape::begin_at(self.active_kind, self.pen.clone(), world);
                self.state = EditState::Editing { shape, selected };
            }
            EditState::Editing { mut shape, .. } => match shape.next_node() {
                Some(selected) => self.state = EditState::Editing { shape, selected },
                None => {
                    log::debug!("committing {:?} {}", shape.kind(), shape.id());
                    self.document.lock().add_shape(shape);
                }
            },
        }
    }

    /// Right release: pull the shape under the pointer out of the
    /// document for editing, grabbing the node that was hit.
    fn on_right_release(&mut self) {
        if !matches!(self.state, EditState::Idle) {
            return;
        }

        let pulled = {
            let mut document = self.document.lock();
            let hit = document.find_node_at(self.target, &self.camera);
            hit.and_then(|(id, node)| document.remove_shape(id).map(|shape| (shape, node)))
        };

        if let Some((shape, selected)) = pulled {
            log::debug!("pulled {:?} {} for editing", shape.kind(), shape.id());
            self.state = EditState::Editing { shape, selected };
        }
    }

    /// Feed one keyboard event through the state machine.
    pub fn handle_key(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Pressed(Key::Delete) => self.discard_edit(),
            KeyEvent::Pressed(key) => self.modifiers.apply(key, true),
            KeyEvent::Released(key) => self.modifiers.apply(key, false),
        }
    }

    /// Drop the shape under edit without committing it.
    pub fn discard_edit(&mut self) {
        if let EditState::Editing { shape, .. } = std::mem::replace(&mut self.state, EditState::Idle)
        {
            log::debug!("discarded {:?} {}", shape.kind(), shape.id());
        }
    }

    /// Teleport the selected node to a world position and advance, as if
    /// the pointer had been released there.
    ///
    /// Backs the coordinate locator: the host resolves an entered axis
    /// pair through [`WorkspaceConfig::axis_location`] and passes the
    /// result here.
    pub fn place_selected_node(&mut self, world: Point) {
        if let EditState::Editing { shape, selected } = &mut self.state {
            shape.set_node(*selected, world);
            shape.update();
        } else {
            return;
        }
        self.on_left_release();
    }

    /// Run the magnet pipeline over the stored target.
    ///
    /// Scan results are drained on every move so the board never holds a
    /// stale election across a modifier change. Exactly one magnet runs:
    /// axis lock wins over the line magnet, which wins over the node
    /// magnet.
    fn apply_magnets(&mut self) {
        let hits = match &self.search {
            Some(search) => search.take_hits(),
            None => SearchHits::default(),
        };
        self.guides = GuideAnchors::default();

        if self.modifiers.alt {
            let Some(anchor) = self.orientation_anchor() else {
                return;
            };
            self.target = snap::lock_to_axis(self.target, anchor).point;
        } else if self.modifiers.shift {
            let x_anchor = self.resolve(hits.nearest_x);
            let y_anchor = self.resolve(hits.nearest_y);
            let result = snap::snap_to_lines(
                self.target,
                x_anchor.map(|node| self.camera.world_to_screen(node)),
                y_anchor.map(|node| self.camera.world_to_screen(node)),
                snap::MAGNET_RADIUS,
            );
            if result.snapped_x {
                self.guides.x = x_anchor;
            }
            if result.snapped_y {
                self.guides.y = y_anchor;
            }
            self.target = result.point;
        } else if self.modifiers.ctrl {
            if let Some(node) = self.resolve(hits.nearest) {
                self.target = snap::snap_to_node(
                    self.target,
                    self.camera.world_to_screen(node),
                    snap::MAGNET_RADIUS,
                )
                .point;
            }
        }
    }

    /// Look up a scan hit's current world position.
    ///
    /// The scan ran against a snapshot; a shape pulled out of the
    /// document since then drops its hits.
    fn resolve(&self, hit: Option<NodeHit>) -> Option<Point> {
        let hit = hit?;
        let document = self.document.lock();
        let shape = document.get_shape(hit.shape)?;
        Some(shape.node(hit.node))
    }

    /// Screen position of the editing shape's orientation node, the
    /// anchor the axis lock pivots around.
    fn orientation_anchor(&self) -> Option<Point> {
        let EditState::Editing { shape, selected } = &self.state else {
            return None;
        };
        let node = shape.orientation_node(*selected)?;
        Some(self.camera.world_to_screen(shape.node(node)))
    }

    /// Swap in freshly loaded content, dropping any edit in progress.
    ///
    /// The shared handle stays the same, so an attached search worker
    /// scans the new content from the next request on.
    pub fn replace_document(&mut self, loaded: Document) {
        self.state = EditState::Idle;
        *self.document.lock() = loaded;
    }

    /// Record the host widget size.
    ///
    /// The camera is left alone; [`Workspace::reset_view`] uses the
    /// recorded size to fit the reference width.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
    }

    /// Restore the untranslated view that fits the reference width in
    /// the viewport.
    pub fn reset_view(&mut self) {
        self.pan_anchor = Point::ZERO;
        self.camera
            .reset(self.viewport.width / self.config.reference_size.width);
    }

    /// Resolve the current target against the blueprint axes.
    ///
    /// The sheet centre splits the canvas into quadrants; three of them
    /// read as axis pairs, the fourth reads as nothing. Values are
    /// unsigned sheet units.
    pub fn pointer_readout(&self) -> Option<PointerReadout> {
        let format = self.document.lock().format();
        let factor = self.config.unit_factor(format);
        let centre = self.config.centre();
        let world = self.camera.screen_to_world(self.target);
        let dx = world.x - centre.x;
        let dy = world.y - centre.y;
        let first = dx.abs() * factor;
        let second = dy.abs() * factor;

        if dx <= 0.0 && dy >= 0.0 {
            Some(PointerReadout {
                first: (Axis::X, first),
                second: (Axis::Y, second),
            })
        } else if dx <= 0.0 && dy <= 0.0 {
            Some(PointerReadout {
                first: (Axis::X, first),
                second: (Axis::Z, second),
            })
        } else if dx >= 0.0 && dy <= 0.0 {
            Some(PointerReadout {
                first: (Axis::Y, first),
                second: (Axis::Z, second),
            })
        } else {
            None
        }
    }

    /// Measurements of the shape under edit in sheet units.
    pub fn size_readout(&self) -> Option<SizeInfo> {
        let EditState::Editing { shape, .. } = &self.state else {
            return None;
        };
        let format = self.document.lock().format();
        shape.size_info(self.config.unit_factor(format))
    }

    /// Current construction state.
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// The shape under edit, if any.
    pub fn editing_shape(&self) -> Option<&Shape> {
        match &self.state {
            EditState::Editing { shape, .. } => Some(shape),
            EditState::Idle => None,
        }
    }

    /// Index of the node following the pointer, if a shape is under edit.
    pub fn selected_node(&self) -> Option<usize> {
        match &self.state {
            EditState::Editing { selected, .. } => Some(*selected),
            EditState::Idle => None,
        }
    }

    /// Shared handle to the underlying document.
    pub fn document(&self) -> Arc<Mutex<Document>> {
        Arc::clone(&self.document)
    }

    /// Visit every committed shape in paint order, under the document
    /// lock. The shape under edit is not included; rendering reads it
    /// from [`Workspace::editing_shape`].
    pub fn for_each_shape(&self, mut visit: impl FnMut(&Shape)) {
        let document = self.document.lock();
        for shape in document.shapes() {
            visit(shape);
        }
    }

    pub fn sheet_format(&self) -> SheetFormat {
        self.document.lock().format()
    }

    pub fn set_sheet_format(&mut self, format: SheetFormat) {
        self.document.lock().set_format(format);
    }

    /// Variant the next construction will build.
    pub fn shape_kind(&self) -> ShapeKind {
        self.active_kind
    }

    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.active_kind = kind;
    }

    /// Pen applied to new constructions.
    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    /// Guide anchors of the line magnet, cleared on every move.
    pub fn guides(&self) -> GuideAnchors {
        self.guides
    }

    /// Current magnet-adjusted target in screen space.
    pub fn target(&self) -> Point {
        self.target
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }
}
