use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use geo::LineString;
use geojson::FeatureCollection;
use log::debug;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::feature::builder::route_collection;
use crate::route::Route;

/// Output of one background feature build: collections and registry lines
/// indexed by route slot, stamped with the generation the build was
/// spawned under.
pub(crate) struct BuiltRouteSet {
    pub generation: u64,
    pub collections: Vec<FeatureCollection>,
    pub lines: Vec<LineString<f64>>,
}

/// A feature build in flight. Geometry decoding and congestion
/// segmentation run on the rayon pool; the result is published over a
/// channel drained by whichever thread owns the map. At most one build is
/// live per overlay: spawning a replacement bumps the shared generation,
/// which the worker re-checks so a superseded build abandons its work
/// instead of publishing.
pub(crate) struct FeatureJob {
    rx: Receiver<BuiltRouteSet>,
}

impl FeatureJob {
    pub fn spawn(routes: Vec<Route>, generation: u64, live: Arc<AtomicU64>) -> Self {
        let (tx, rx) = mpsc::channel();

        rayon::spawn(move || {
            let built: Vec<_> = routes
                .par_iter()
                .enumerate()
                .map(|(index, route)| {
                    if live.load(Ordering::Acquire) != generation {
                        // Superseded mid-build; emit placeholders cheaply.
                        return (
                            FeatureCollection {
                                bbox: None,
                                features: Vec::new(),
                                foreign_members: None,
                            },
                            LineString::new(Vec::new()),
                        );
                    }
                    route_collection(route, index)
                })
                .collect();

            if live.load(Ordering::Acquire) != generation {
                debug!("Discarding cancelled feature build (generation {generation})");
                return;
            }

            let (collections, lines): (Vec<_>, Vec<_>) = built.into_iter().unzip();
            let _ = tx.send(BuiltRouteSet {
                generation,
                collections,
                lines,
            });
        });

        FeatureJob { rx }
    }

    /// Non-blocking completion check. `Disconnected` means the build was
    /// cancelled and will never publish.
    pub fn try_complete(&self) -> Result<BuiltRouteSet, TryRecvError> {
        self.rx.try_recv()
    }

    /// Blocks until the build publishes, or returns `None` if it was
    /// cancelled.
    pub fn complete(self) -> Option<BuiltRouteSet> {
        self.rx.recv().ok()
    }
}
