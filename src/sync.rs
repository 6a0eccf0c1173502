//! Thread-safe index handle for hosts that rebuild off the UI thread.
//!
//! The engine itself is single-owner. When a host fetches and rebuilds on a
//! worker while views keep drawing, `SharedIndex` lets readers grab the
//! current snapshot and lets the builder swap a finished index in as one
//! pointer store. Readers never see a half-built index.
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! obsgrid = { version = "0.1", features = ["sync"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use obsgrid::config::Config;
//! use obsgrid::SharedIndex;
//! use obsgrid_types::point::{ObservationPoint, SourceDetails};
//! use std::thread;
//!
//! let shared = SharedIndex::default();
//! let writer = shared.clone();
//!
//! let handle = thread::spawn(move || {
//!     let points = vec![ObservationPoint::new("1", 0.5, 0.5, SourceDetails::primary("Larus argentatus", None))];
//!     writer.rebuild(points, &Config::default()).unwrap();
//! });
//! handle.join().unwrap();
//!
//! assert_eq!(shared.snapshot().point_count(), 1);
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::index::MultiResolutionIndex;
use obsgrid_types::point::ObservationPoint;
use parking_lot::RwLock;
use std::sync::Arc;

/// A swappable `Arc<MultiResolutionIndex>` shared between threads.
#[derive(Clone, Debug)]
pub struct SharedIndex {
    inner: Arc<RwLock<Arc<MultiResolutionIndex>>>,
}

impl SharedIndex {
    pub fn new(index: MultiResolutionIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    /// The index as of now. Later swaps do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<MultiResolutionIndex> {
        let guard = self.inner.read();
        Arc::clone(&*guard)
    }

    /// Swap in `index`, returning the one it replaced.
    pub fn replace(&self, index: MultiResolutionIndex) -> Arc<MultiResolutionIndex> {
        let index = Arc::new(index);
        std::mem::replace(&mut *self.inner.write(), index)
    }

    /// Build an index from `points` outside the lock, then swap it in.
    pub fn rebuild(
        &self,
        points: Vec<ObservationPoint>,
        config: &Config,
    ) -> Result<Arc<MultiResolutionIndex>> {
        let index = MultiResolutionIndex::build_with_sizes(points, &config.cell_sizes)?;
        self.replace(index);
        Ok(self.snapshot())
    }
}

impl Default for SharedIndex {
    fn default() -> Self {
        Self::new(MultiResolutionIndex::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LodEngine;
    use obsgrid_types::point::SourceDetails;
    use std::thread;

    fn points(n: usize) -> Vec<ObservationPoint> {
        (0..n)
            .map(|i| {
                ObservationPoint::new(
                    i.to_string(),
                    i as f64 * 0.1,
                    i as f64 * 0.1,
                    SourceDetails::primary("Sturnus vulgaris", None),
                )
            })
            .collect()
    }

    #[test]
    fn test_snapshot_survives_swap() {
        let shared = SharedIndex::new(MultiResolutionIndex::build(points(3)));
        let before = shared.snapshot();
        let old = shared.replace(MultiResolutionIndex::build(points(7)));

        assert_eq!(before.point_count(), 3);
        assert_eq!(old.generation(), before.generation());
        assert_eq!(shared.snapshot().point_count(), 7);
    }

    #[test]
    fn test_concurrent_readers_see_whole_indexes() {
        let shared = SharedIndex::default();
        let writer = shared.clone();

        let handle = thread::spawn(move || {
            for n in 1..=20 {
                writer.rebuild(points(n * 10), &Config::default()).unwrap();
            }
        });

        for _ in 0..200 {
            let snapshot = shared.snapshot();
            let binned: usize = snapshot
                .cells(crate::index::Resolution::Large)
                .iter()
                .map(|c| c.count())
                .sum();
            assert_eq!(binned, snapshot.point_count());
        }
        handle.join().unwrap();
        assert_eq!(shared.snapshot().point_count(), 200);
    }

    #[test]
    fn test_engine_picks_up_shared_snapshot() {
        let shared = SharedIndex::default();
        shared.rebuild(points(4), &Config::default()).unwrap();

        let mut engine = LodEngine::new();
        engine.replace_index(shared.snapshot());
        assert_eq!(engine.index().point_count(), 4);
    }
}
