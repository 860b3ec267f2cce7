//! Blueline Core Library
//!
//! Platform-agnostic model and interaction engine for the Blueline
//! technical-blueprint editor.

pub mod camera;
pub mod config;
pub mod document;
pub mod geom;
pub mod input;
pub mod nearest;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod workspace;

pub use camera::Camera;
pub use config::{Axis, SheetFormat, WorkspaceConfig};
pub use document::Document;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use nearest::{NodeFinder, NodeHit, ScanRequest, SearchHandle, SearchHits};
pub use shapes::{Geometry, Pen, Shape, ShapeId, ShapeKind, SizeInfo, NODE_HIT_TOLERANCE};
pub use snap::{lock_to_axis, snap_to_lines, snap_to_node, SnapResult, MAGNET_RADIUS};
pub use storage::{decode_document, encode_document, load_document, save_document, DocumentError};
pub use workspace::{EditState, GuideAnchors, PointerReadout, Workspace};
