//! Background nearest-node search.
//!
//! Scanning every node on every pointer move would stall the event thread
//! on large documents, so the search runs on a dedicated worker. The event
//! thread drops a [`ScanRequest`] into a single-slot mailbox and moves on;
//! the worker wakes, scans, and publishes the winners onto a shared board.
//! Both sides overwrite: an unserviced request is replaced by a newer one,
//! and unread results are replaced by fresher ones, so the board never
//! holds anything older than the last completed scan.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use kurbo::Point;
use parking_lot::{Condvar, Mutex};

use crate::camera::Camera;
use crate::document::Document;
use crate::shapes::ShapeId;

/// A node elected by a scan, identified by shape and slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHit {
    pub shape: ShapeId,
    pub node: usize,
}

/// The three winners of one scan.
///
/// All three are measured in screen space against the requested target:
/// straight-line distance, horizontal offset, and vertical offset. Ties go
/// to the node encountered first in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHits {
    /// Smallest straight-line distance.
    pub nearest: Option<NodeHit>,
    /// Smallest horizontal offset.
    pub nearest_x: Option<NodeHit>,
    /// Smallest vertical offset.
    pub nearest_y: Option<NodeHit>,
}

/// One unit of work for the search worker.
#[derive(Clone)]
pub struct ScanRequest {
    /// Pointer position in screen coordinates.
    pub target: Point,
    /// Camera at the time of the request; node positions are projected
    /// through it before measuring.
    pub camera: Camera,
    /// Document to scan.
    pub document: Arc<Mutex<Document>>,
}

struct FinderShared {
    request: Mutex<Option<ScanRequest>>,
    request_ready: Condvar,
    hits: Mutex<SearchHits>,
    stop: AtomicBool,
}

/// Cloneable endpoint for talking to the search worker.
#[derive(Clone)]
pub struct SearchHandle(Arc<FinderShared>);

impl SearchHandle {
    /// Hand a request to the worker, replacing any request it has not
    /// picked up yet.
    pub fn request(&self, request: ScanRequest) {
        *self.0.request.lock() = Some(request);
        self.0.request_ready.notify_one();
    }

    /// Take the latest published winners, leaving the board empty.
    ///
    /// Consuming the read keeps a stale scan from being applied twice
    /// while the worker is busy with the next one.
    pub fn take_hits(&self) -> SearchHits {
        std::mem::take(&mut *self.0.hits.lock())
    }
}

/// Owner of the search worker thread.
///
/// Dropping the finder stops the worker and joins it; pending requests
/// are discarded on shutdown.
pub struct NodeFinder {
    shared: Arc<FinderShared>,
    worker: Option<JoinHandle<()>>,
}

impl NodeFinder {
    /// Start the worker thread.
    pub fn spawn() -> Self {
        let shared = Arc::new(FinderShared {
            request: Mutex::new(None),
            request_ready: Condvar::new(),
            hits: Mutex::new(SearchHits::default()),
            stop: AtomicBool::new(false),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || {
            log::debug!("node search worker started");
            run(&worker_shared);
            log::debug!("node search worker exiting");
        });

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Get a handle for submitting requests and reading results.
    pub fn handle(&self) -> SearchHandle {
        SearchHandle(Arc::clone(&self.shared))
    }
}

impl Drop for NodeFinder {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        self.shared.request_ready.notify_one();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run(shared: &FinderShared) {
    loop {
        let request = {
            let mut slot = shared.request.lock();
            loop {
                if shared.stop.load(Ordering::SeqCst) {
                    return;
                }
                if let Some(request) = slot.take() {
                    break request;
                }
                shared.request_ready.wait(&mut slot);
            }
        };

        let hits = scan(&request);
        *shared.hits.lock() = hits;
    }
}

/// Walk every node of every shape and elect the three winners.
fn scan(request: &ScanRequest) -> SearchHits {
    let document = request.document.lock();
    let target = request.target;

    let mut hits = SearchHits::default();
    let mut best_distance = f64::INFINITY;
    let mut best_dx = f64::INFINITY;
    let mut best_dy = f64::INFINITY;

    for shape in document.shapes() {
        for (index, &node) in shape.nodes().iter().enumerate() {
            let screen = request.camera.world_to_screen(node);
            let hit = NodeHit {
                shape: shape.id(),
                node: index,
            };

            let distance = screen.distance(target);
            if distance < best_distance {
                best_distance = distance;
                hits.nearest = Some(hit);
            }

            let dx = (screen.x - target.x).abs();
            if dx < best_dx {
                best_dx = dx;
                hits.nearest_x = Some(hit);
            }

            let dy = (screen.y - target.y).abs();
            if dy < best_dy {
                best_dy = dy;
                hits.nearest_y = Some(hit);
            }
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Pen, Shape, ShapeKind};
    use std::time::{Duration, Instant};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn line(from: Point, to: Point) -> Shape {
        Shape::reconstruct(ShapeKind::Line, Pen::default(), &[from, to])
    }

    fn shared_document(shapes: Vec<Shape>) -> Arc<Mutex<Document>> {
        let mut doc = Document::new();
        for shape in shapes {
            doc.add_shape(shape);
        }
        Arc::new(Mutex::new(doc))
    }

    /// Poll the board until the predicate accepts a result.
    fn wait_for_hits(
        handle: &SearchHandle,
        accept: impl Fn(&SearchHits) -> bool,
    ) -> SearchHits {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let hits = handle.take_hits();
            if accept(&hits) {
                return hits;
            }
            assert!(Instant::now() < deadline, "no matching hits before deadline");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_scan_elects_three_winners() {
        let first = line(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let second = line(Point::new(30.0, 40.0), Point::new(200.0, 5.0));
        let second_id = second.id();
        let document = shared_document(vec![first, second]);

        let hits = scan(&ScanRequest {
            target: Point::new(60.0, 10.0),
            camera: Camera::new(),
            document,
        });

        let radial = NodeHit { shape: second_id, node: 0 };
        let vertical = NodeHit { shape: second_id, node: 1 };
        assert_eq!(hits.nearest, Some(radial));
        assert_eq!(hits.nearest_x, Some(radial));
        assert_eq!(hits.nearest_y, Some(vertical));
    }

    #[test]
    fn test_scan_tie_prefers_storage_order() {
        let first = line(Point::new(0.0, 0.0), Point::new(0.0, 100.0));
        let second = line(Point::new(10.0, 0.0), Point::new(10.0, 100.0));
        let first_id = first.id();
        let document = shared_document(vec![first, second]);

        // Dead centre between the two left and right columns.
        let hits = scan(&ScanRequest {
            target: Point::new(5.0, 0.0),
            camera: Camera::new(),
            document,
        });

        let expected = NodeHit { shape: first_id, node: 0 };
        assert_eq!(hits.nearest, Some(expected));
        assert_eq!(hits.nearest_x, Some(expected));
    }

    #[test]
    fn test_scan_empty_document() {
        let hits = scan(&ScanRequest {
            target: Point::ZERO,
            camera: Camera::new(),
            document: shared_document(Vec::new()),
        });
        assert_eq!(hits, SearchHits::default());
    }

    #[test]
    fn test_scan_measures_in_screen_space() {
        let shape = line(Point::new(0.0, 0.0), Point::new(50.0, 0.0));
        let id = shape.id();
        let document = shared_document(vec![shape]);

        let mut camera = Camera::new();
        camera.offset = kurbo::Vec2::new(100.0, 0.0);

        // Screen (100, 0) is world (0, 0); against raw world coordinates
        // the second node would win instead.
        let hits = scan(&ScanRequest {
            target: Point::new(100.0, 0.0),
            camera,
            document,
        });
        assert_eq!(hits.nearest, Some(NodeHit { shape: id, node: 0 }));
    }

    #[test]
    fn test_worker_round_trip() {
        init_logging();

        let shape = line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let id = shape.id();
        let document = shared_document(vec![shape]);

        let finder = NodeFinder::spawn();
        let handle = finder.handle();
        handle.request(ScanRequest {
            target: Point::new(90.0, 5.0),
            camera: Camera::new(),
            document,
        });

        let hits = wait_for_hits(&handle, |hits| hits.nearest.is_some());
        assert_eq!(hits.nearest, Some(NodeHit { shape: id, node: 1 }));
    }

    #[test]
    fn test_take_hits_consumes_the_board() {
        init_logging();

        let document = shared_document(vec![line(Point::ZERO, Point::new(10.0, 0.0))]);
        let finder = NodeFinder::spawn();
        let handle = finder.handle();
        handle.request(ScanRequest {
            target: Point::ZERO,
            camera: Camera::new(),
            document,
        });

        wait_for_hits(&handle, |hits| hits.nearest.is_some());
        assert_eq!(handle.take_hits(), SearchHits::default());
    }

    #[test]
    fn test_newer_request_wins() {
        init_logging();

        let shape = line(Point::new(0.0, 0.0), Point::new(1000.0, 0.0));
        let id = shape.id();
        let document = shared_document(vec![shape]);

        let finder = NodeFinder::spawn();
        let handle = finder.handle();
        handle.request(ScanRequest {
            target: Point::new(1.0, 0.0),
            camera: Camera::new(),
            document: Arc::clone(&document),
        });
        handle.request(ScanRequest {
            target: Point::new(999.0, 0.0),
            camera: Camera::new(),
            document,
        });

        // The first scan may or may not run, but the second always does.
        let expected = NodeHit { shape: id, node: 1 };
        let hits = wait_for_hits(&handle, |hits| hits.nearest == Some(expected));
        assert_eq!(hits.nearest, Some(expected));
    }

    #[test]
    fn test_shutdown_with_pending_request() {
        init_logging();

        let document = shared_document(vec![line(Point::ZERO, Point::new(10.0, 0.0))]);
        let finder = NodeFinder::spawn();
        finder.handle().request(ScanRequest {
            target: Point::ZERO,
            camera: Camera::new(),
            document,
        });
        drop(finder);
    }

    #[test]
    fn test_handles_survive_the_finder() {
        init_logging();

        let finder = NodeFinder::spawn();
        let handle = finder.handle();
        drop(finder);

        // The worker is gone; the board just stays empty.
        handle.request(ScanRequest {
            target: Point::ZERO,
            camera: Camera::new(),
            document: shared_document(Vec::new()),
        });
        assert_eq!(handle.take_hits(), SearchHits::default());
    }
}
