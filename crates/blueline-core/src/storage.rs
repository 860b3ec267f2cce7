//! Binary persistence for blueprint documents.
//!
//! The on-disk format is little-endian throughout:
//!
//! ```text
//! [Document]
//!   - Sheet format tag: u8
//!   - Shape count: u64
//!
//! [Shapes: shape count entries]
//!   For each shape:
//!     - Kind tag: u8
//!     - Node count: u64
//!     - Pen width: f64
//!     - Dash count: u64
//!     - Dash entries: dash_count * f64
//!     - Nodes: node_count * (f64 x, f64 y)
//! ```
//!
//! Shapes are written in storage order and read back in the same order.
//! The body layout does not depend on the kind tag, so an entry with an
//! unrecognized tag can still be read past and dropped; an unrecognized
//! sheet tag or a short read fails the whole load instead.

use std::fs;
use std::path::Path;

use kurbo::Point;
use thiserror::Error;

use crate::config::SheetFormat;
use crate::document::Document;
use crate::shapes::{Pen, Shape, ShapeKind};

/// Persistence errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Encode a document into the binary format.
pub fn encode_document(document: &Document) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.push(document.format().tag());
    buf.extend_from_slice(&(document.shapes().len() as u64).to_le_bytes());

    for shape in document.shapes() {
        buf.push(shape.kind().tag());
        buf.extend_from_slice(&(shape.nodes().len() as u64).to_le_bytes());

        buf.extend_from_slice(&shape.pen.width.to_le_bytes());
        buf.extend_from_slice(&(shape.pen.dash.len() as u64).to_le_bytes());
        for &entry in &shape.pen.dash {
            buf.extend_from_slice(&entry.to_le_bytes());
        }

        for node in shape.nodes() {
            buf.extend_from_slice(&node.x.to_le_bytes());
            buf.extend_from_slice(&node.y.to_le_bytes());
        }
    }

    buf
}

/// Decode a document from the binary format.
///
/// The document is rebuilt in full before being returned, so a decode
/// failure leaves the caller's state untouched.
pub fn decode_document(data: &[u8]) -> Result<Document, DocumentError> {
    let mut reader = Reader::new(data);

    let sheet_tag = reader.read_u8()?;
    let format = SheetFormat::from_tag(sheet_tag)
        .ok_or_else(|| DocumentError::Decode(format!("unknown sheet format tag {sheet_tag}")))?;

    let shape_count = reader.read_u64()?;
    let mut shapes = Vec::new();
    for _ in 0..shape_count {
        let kind_tag = reader.read_u8()?;
        let node_count = reader.read_u64()?;

        let width = reader.read_f64()?;
        let dash_count = reader.read_u64()?;
        let mut dash = Vec::new();
        for _ in 0..dash_count {
            dash.push(reader.read_f64()?);
        }

        let mut positions = Vec::new();
        for _ in 0..node_count {
            let x = reader.read_f64()?;
            let y = reader.read_f64()?;
            positions.push(Point::new(x, y));
        }

        // The body has been consumed either way; an entry with a tag this
        // build does not know is dropped rather than failing the file.
        match ShapeKind::from_tag(kind_tag) {
            Some(kind) => shapes.push(Shape::reconstruct(kind, Pen { width, dash }, &positions)),
            None => log::warn!("dropping shape with unknown kind tag {kind_tag}"),
        }
    }

    let mut document = Document::new();
    document.set_format(format);
    document.set_shapes(shapes);
    Ok(document)
}

/// Write a document to a file, encoding first so a failed encode never
/// leaves a partial file behind.
pub fn save_document(path: &Path, document: &Document) -> Result<(), DocumentError> {
    let bytes = encode_document(document);
    fs::write(path, bytes).map_err(|err| {
        log::error!("failed to save {}: {err}", path.display());
        err
    })?;
    log::info!("saved {} shapes to {}", document.len(), path.display());
    Ok(())
}

/// Read a document from a file.
pub fn load_document(path: &Path) -> Result<Document, DocumentError> {
    let bytes = fs::read(path).map_err(|err| {
        log::error!("failed to load {}: {err}", path.display());
        err
    })?;
    let document = decode_document(&bytes)?;
    log::info!("loaded {} shapes from {}", document.len(), path.display());
    Ok(document)
}

/// Bounds-checked little-endian reader over a byte slice.
struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DocumentError> {
        let end = self.position + N;
        let slice = self
            .data
            .get(self.position..end)
            .ok_or_else(|| DocumentError::Decode("unexpected end of data".to_string()))?;
        self.position = end;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(slice);
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8, DocumentError> {
        Ok(self.take::<1>()?[0])
    }

    fn read_u64(&mut self) -> Result<u64, DocumentError> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    fn read_f64(&mut self) -> Result<f64, DocumentError> {
        Ok(f64::from_le_bytes(self.take()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.set_format(SheetFormat::A4);
        doc.add_shape(Shape::reconstruct(
            ShapeKind::Line,
            Pen {
                width: 2.0,
                dash: vec![4.0, 2.0],
            },
            &[Point::new(0.0, 0.0), Point::new(10.0, 5.0)],
        ));
        doc.add_shape(Shape::reconstruct(
            ShapeKind::Sector,
            Pen::default(),
            &[Point::new(1.0, 1.0), Point::new(11.0, 1.0), Point::new(1.0, 11.0)],
        ));
        doc
    }

    #[test]
    fn test_roundtrip_preserves_document() {
        let original = sample_document();
        let decoded = decode_document(&encode_document(&original)).unwrap();

        assert_eq!(decoded.format(), original.format());
        assert_eq!(decoded.len(), original.len());
        for (restored, source) in decoded.shapes().iter().zip(original.shapes()) {
            assert_eq!(restored.kind(), source.kind());
            assert_eq!(restored.nodes(), source.nodes());
            assert_eq!(restored.pen, source.pen);
            assert_eq!(restored.cursor(), source.cursor());
        }
    }

    #[test]
    fn test_reencode_is_byte_identical() {
        let bytes = encode_document(&sample_document());
        let decoded = decode_document(&bytes).unwrap();
        assert_eq!(encode_document(&decoded), bytes);
    }

    #[test]
    fn test_empty_document_layout() {
        let bytes = encode_document(&Document::new());
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], SheetFormat::A3.tag());
        assert_eq!(u64::from_le_bytes(bytes[1..9].try_into().unwrap()), 0);
    }

    #[test]
    fn test_single_shape_layout() {
        let mut doc = Document::new();
        doc.set_format(SheetFormat::A4);
        doc.add_shape(Shape::reconstruct(
            ShapeKind::Line,
            Pen::default(),
            &[Point::new(0.0, 0.0), Point::new(1.0, 2.0)],
        ));

        let bytes = encode_document(&doc);
        // header 9, then tag 1 + count 8 + width 8 + dash count 8 + nodes 32
        assert_eq!(bytes.len(), 9 + 57);
        assert_eq!(bytes[0], 1);
        assert_eq!(u64::from_le_bytes(bytes[1..9].try_into().unwrap()), 1);
        assert_eq!(bytes[9], ShapeKind::Line.tag());
        assert_eq!(u64::from_le_bytes(bytes[10..18].try_into().unwrap()), 2);
        assert_eq!(
            f64::from_le_bytes(bytes[18..26].try_into().unwrap()),
            Pen::default().width
        );
    }

    #[test]
    fn test_unknown_kind_tag_drops_entry_only() {
        let mut bytes = encode_document(&sample_document());
        // First kind tag sits right after the document header.
        bytes[9] = 200;

        let decoded = decode_document(&bytes).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.shapes()[0].kind(), ShapeKind::Sector);
    }

    #[test]
    fn test_unknown_sheet_tag_fails() {
        let mut bytes = encode_document(&sample_document());
        bytes[0] = 9;
        assert!(matches!(
            decode_document(&bytes),
            Err(DocumentError::Decode(_))
        ));
    }

    #[test]
    fn test_truncated_input_fails() {
        let bytes = encode_document(&sample_document());
        let short = &bytes[..bytes.len() - 5];
        assert!(matches!(
            decode_document(short),
            Err(DocumentError::Decode(_))
        ));
    }

    #[test]
    fn test_shape_count_beyond_data_fails() {
        let mut bytes = encode_document(&Document::new());
        bytes[1..9].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            decode_document(&bytes),
            Err(DocumentError::Decode(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drawing.blp");
        let original = sample_document();

        save_document(&path, &original).unwrap();
        let loaded = load_document(&path).unwrap();

        assert_eq!(loaded.format(), original.format());
        assert_eq!(loaded.len(), original.len());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_document(&dir.path().join("missing.blp"));
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
