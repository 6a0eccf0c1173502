//! The four-resolution observation index.
//!
//! One sanitized point set is binned at four fixed cell sizes. The result is
//! an immutable value: changing the input means building a new index and
//! swapping it in whole. There is no insert or remove. Points off the globe
//! are left out.
//!
//! Cell sizes are plain degrees, so cells shrink east-west towards the poles.
//! The defaults are roughly 2, 5, 20 and 50 km at the equator.

use crate::error::{EngineError, Result};
use crate::grid::{CellKey, GridCell, bin_cells, validate_cell_size};
use geo::{BoundingRect, MultiPoint};
use obsgrid_types::bounds::CellBounds;
use obsgrid_types::point::{ObservationPoint, PointKey};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// One of the four fixed grid resolutions, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl Resolution {
    pub const ALL: [Resolution; 4] = [
        Resolution::Small,
        Resolution::Medium,
        Resolution::Large,
        Resolution::ExtraLarge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Small => "small",
            Resolution::Medium => "medium",
            Resolution::Large => "large",
            Resolution::ExtraLarge => "extraLarge",
        }
    }

    fn slot(&self) -> usize {
        match self {
            Resolution::Small => 0,
            Resolution::Medium => 1,
            Resolution::Large => 2,
            Resolution::ExtraLarge => 3,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell side length in degrees for each resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSizes {
    #[serde(default = "CellSizes::default_small")]
    pub small: f64,
    #[serde(default = "CellSizes::default_medium")]
    pub medium: f64,
    #[serde(default = "CellSizes::default_large")]
    pub large: f64,
    #[serde(default = "CellSizes::default_extra_large")]
    pub extra_large: f64,
}

impl CellSizes {
    const fn default_small() -> f64 {
        0.02
    }

    const fn default_medium() -> f64 {
        0.05
    }

    const fn default_large() -> f64 {
        0.2
    }

    const fn default_extra_large() -> f64 {
        0.5
    }

    pub fn get(&self, resolution: Resolution) -> f64 {
        match resolution {
            Resolution::Small => self.small,
            Resolution::Medium => self.medium,
            Resolution::Large => self.large,
            Resolution::ExtraLarge => self.extra_large,
        }
    }

    /// Every size must be positive, and sizes must grow from small to extra large.
    pub fn validate(&self) -> Result<()> {
        for resolution in Resolution::ALL {
            validate_cell_size(self.get(resolution))?;
        }
        let ordered = Resolution::ALL
            .windows(2)
            .all(|pair| self.get(pair[0]) < self.get(pair[1]));
        if !ordered {
            return Err(EngineError::InvalidConfig(
                "Cell sizes must strictly increase from small to extraLarge".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CellSizes {
    fn default() -> Self {
        Self {
            small: Self::default_small(),
            medium: Self::default_medium(),
            large: Self::default_large(),
            extra_large: Self::default_extra_large(),
        }
    }
}

/// Occupancy figures for one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub resolution: Resolution,
    pub cell_size: f64,
    pub cell_count: usize,
    pub max_count: usize,
    pub avg_count: f64,
}

/// Overall statistics for an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub point_count: usize,
    pub levels: Vec<LevelStats>,
}

/// Observation cells at all four resolutions, built from one point set.
///
/// # Examples
///
/// ```rust
/// use obsgrid::index::{MultiResolutionIndex, Resolution};
/// use obsgrid_types::point::{ObservationPoint, SourceDetails};
///
/// let points = vec![
///     ObservationPoint::new("1", 52.010, 4.350, SourceDetails::primary("Ardea cinerea", None)),
///     ObservationPoint::new("2", 52.011, 4.351, SourceDetails::primary("Ardea alba", None)),
///     ObservationPoint::new("3", 52.400, 4.900, SourceDetails::primary("Anas platyrhynchos", None)),
/// ];
///
/// let index = MultiResolutionIndex::build(points);
/// assert_eq!(index.point_count(), 3);
/// assert_eq!(index.cells(Resolution::Small).len(), 2);
/// assert_eq!(index.cells(Resolution::ExtraLarge).len(), 2);
/// ```
#[derive(Debug)]
pub struct MultiResolutionIndex {
    points: Vec<Arc<ObservationPoint>>,
    by_key: FxHashMap<PointKey, usize>,
    levels: [Vec<Arc<GridCell>>; 4],
    cell_sizes: CellSizes,
    generation: u64,
}

impl MultiResolutionIndex {
    /// Build with the product cell sizes.
    pub fn build(points: Vec<ObservationPoint>) -> Self {
        Self::build_unchecked(points, CellSizes::default())
    }

    /// Build with configured cell sizes.
    pub fn build_with_sizes(points: Vec<ObservationPoint>, cell_sizes: &CellSizes) -> Result<Self> {
        cell_sizes.validate()?;
        Ok(Self::build_unchecked(points, *cell_sizes))
    }

    /// An index over no points.
    pub fn empty() -> Self {
        Self::build(Vec::new())
    }

    fn build_unchecked(points: Vec<ObservationPoint>, cell_sizes: CellSizes) -> Self {
        let total = points.len();
        let points: Vec<Arc<ObservationPoint>> = points
            .into_iter()
            .filter(ObservationPoint::is_on_globe)
            .map(Arc::new)
            .collect();
        if points.len() < total {
            log::debug!("Skipped {} points off the globe", total - points.len());
        }

        let mut by_key = FxHashMap::default();
        for (idx, point) in points.iter().enumerate() {
            by_key.entry(point.key()).or_insert(idx);
        }

        let levels = Resolution::ALL.map(|resolution| {
            bin_cells(&points, cell_sizes.get(resolution))
                .into_iter()
                .map(Arc::new)
                .collect::<Vec<_>>()
        });
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);

        log::debug!(
            "Built index generation {} over {} points: {} / {} / {} / {} cells",
            generation,
            points.len(),
            levels[0].len(),
            levels[1].len(),
            levels[2].len(),
            levels[3].len()
        );

        Self {
            points,
            by_key,
            levels,
            cell_sizes,
            generation,
        }
    }

    /// Cells at one resolution, sorted by key.
    pub fn cells(&self, resolution: Resolution) -> &[Arc<GridCell>] {
        &self.levels[resolution.slot()]
    }

    /// The cell covering `(lat, lon)` at a resolution, if it has any points.
    pub fn cell_at(&self, resolution: Resolution, lat: f64, lon: f64) -> Option<&Arc<GridCell>> {
        let key = CellKey::containing(lat, lon, self.cell_size(resolution));
        self.cell(resolution, key)
    }

    pub fn cell(&self, resolution: Resolution, key: CellKey) -> Option<&Arc<GridCell>> {
        let cells = self.cells(resolution);
        cells
            .binary_search_by_key(&key, |cell| cell.key)
            .ok()
            .map(|idx| &cells[idx])
    }

    /// Every sanitized point, in input order.
    pub fn points(&self) -> &[Arc<ObservationPoint>] {
        &self.points
    }

    /// The point with identity `key`. With repeated keys the first wins.
    pub fn point(&self, key: &PointKey) -> Option<&Arc<ObservationPoint>> {
        self.by_key.get(key).map(|&idx| &self.points[idx])
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest rectangle holding every point, for fitting the viewport.
    pub fn extent(&self) -> Option<CellBounds> {
        let points: MultiPoint<f64> = self.points.iter().map(|p| p.position()).collect();
        points.bounding_rect().map(|rect| CellBounds { rect })
    }

    pub fn cell_size(&self, resolution: Resolution) -> f64 {
        self.cell_sizes.get(resolution)
    }

    pub fn cell_sizes(&self) -> &CellSizes {
        &self.cell_sizes
    }

    /// Identifier unique to this build. A rebuilt index always has a new one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> IndexStats {
        let levels = Resolution::ALL
            .iter()
            .map(|&resolution| {
                let cells = self.cells(resolution);
                let max_count = cells.iter().map(|c| c.count()).max().unwrap_or(0);
                let avg_count = if cells.is_empty() {
                    0.0
                } else {
                    self.points.len() as f64 / cells.len() as f64
                };
                LevelStats {
                    resolution,
                    cell_size: self.cell_size(resolution),
                    cell_count: cells.len(),
                    max_count,
                    avg_count,
                }
            })
            .collect();

        IndexStats {
            point_count: self.points.len(),
            levels,
        }
    }
}

impl Default for MultiResolutionIndex {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obsgrid_types::point::{Provenance, SourceDetails};
    use std::collections::HashSet;

    fn scattered(n: usize) -> Vec<ObservationPoint> {
        (0..n)
            .map(|i| {
                let lat = 45.0 + (i as f64 * 0.0137) % 3.0;
                let lon = 7.0 + (i as f64 * 0.0291) % 4.0;
                ObservationPoint::new(
                    i.to_string(),
                    lat,
                    lon,
                    SourceDetails::primary("Rupicapra rupicapra", None),
                )
            })
            .collect()
    }

    #[test]
    fn test_every_resolution_partitions_all_points() {
        let index = MultiResolutionIndex::build(scattered(1_000));
        for resolution in Resolution::ALL {
            let mut ids = HashSet::new();
            for cell in index.cells(resolution) {
                assert_eq!(cell.count(), cell.members().len());
                for member in cell.members() {
                    assert!(ids.insert(member.id.clone()), "duplicate at {}", resolution);
                }
            }
            assert_eq!(ids.len(), 1_000, "lost points at {}", resolution);
        }
    }

    #[test]
    fn test_coarser_levels_have_fewer_cells() {
        let index = MultiResolutionIndex::build(scattered(2_000));
        let counts: Vec<usize> = Resolution::ALL
            .iter()
            .map(|r| index.cells(*r).len())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{:?}", counts);
    }

    #[test]
    fn test_empty_index() {
        let index = MultiResolutionIndex::empty();
        assert!(index.is_empty());
        for resolution in Resolution::ALL {
            assert!(index.cells(resolution).is_empty());
        }
        assert_eq!(index.stats().levels[0].max_count, 0);
    }

    #[test]
    fn test_rebuild_gets_new_generation() {
        let a = MultiResolutionIndex::build(scattered(3));
        let b = MultiResolutionIndex::build(scattered(3));
        assert_ne!(a.generation(), b.generation());
    }

    #[test]
    fn test_cell_lookup() {
        let index = MultiResolutionIndex::build(scattered(100));
        let p = &index.points()[10];
        let cell = index
            .cell_at(Resolution::Medium, p.latitude, p.longitude)
            .unwrap();
        assert!(cell.members().iter().any(|m| m.id == p.id));
        assert!(index.cell_at(Resolution::Medium, -80.0, 100.0).is_none());
    }

    #[test]
    fn test_point_lookup_uses_source() {
        let index = MultiResolutionIndex::build(scattered(5));
        assert!(index.point(&PointKey::new("3", Provenance::Primary)).is_some());
        assert!(
            index
                .point(&PointKey::new("3", Provenance::BirdChecklist))
                .is_none()
        );
    }

    #[test]
    fn test_point_lookup_over_many_points() {
        let index = MultiResolutionIndex::build(scattered(50_000));
        for id in ["0", "24999", "49999"] {
            let found = index.point(&PointKey::new(id, Provenance::Primary)).unwrap();
            assert_eq!(found.id, id);
        }
        assert!(index.point(&PointKey::new("50000", Provenance::Primary)).is_none());
    }

    #[test]
    fn test_point_lookup_with_repeated_key_returns_first() {
        let details = || SourceDetails::primary("Sus scrofa", None);
        let index = MultiResolutionIndex::build(vec![
            ObservationPoint::new("dup", 1.0, 1.0, details()),
            ObservationPoint::new("dup", 2.0, 2.0, details()),
        ]);
        let found = index.point(&PointKey::new("dup", Provenance::Primary)).unwrap();
        assert_eq!(found.latitude, 1.0);
    }

    #[test]
    fn test_off_globe_points_are_left_out() {
        let details = || SourceDetails::primary("Physeter macrocephalus", None);
        let index = MultiResolutionIndex::build(vec![
            ObservationPoint::new("a", 1e20, 0.0, details()),
            ObservationPoint::new("b", 3e20, 0.0, details()),
            ObservationPoint::new("c", 10.0, 10.0, details()),
        ]);
        assert_eq!(index.point_count(), 1);
        assert!(index.point(&PointKey::new("a", Provenance::Primary)).is_none());
        for resolution in Resolution::ALL {
            let binned: usize = index.cells(resolution).iter().map(|c| c.count()).sum();
            assert_eq!(binned, index.point_count());
        }
    }

    #[test]
    fn test_custom_sizes_are_validated() {
        let bad = CellSizes {
            small: 0.5,
            ..CellSizes::default()
        };
        assert!(MultiResolutionIndex::build_with_sizes(scattered(1), &bad).is_err());

        let zero = CellSizes {
            small: 0.0,
            ..CellSizes::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(EngineError::InvalidCellSize(_))
        ));

        let coarse = CellSizes {
            small: 1.0,
            medium: 2.0,
            large: 5.0,
            extra_large: 10.0,
        };
        let index = MultiResolutionIndex::build_with_sizes(scattered(10), &coarse).unwrap();
        assert_eq!(index.cell_size(Resolution::Large), 5.0);
    }

    #[test]
    fn test_extent() {
        assert!(MultiResolutionIndex::empty().extent().is_none());

        let index = MultiResolutionIndex::build(vec![
            ObservationPoint::new("a", -2.0, 10.0, SourceDetails::primary("Panthera leo", None)),
            ObservationPoint::new("b", 3.0, -4.0, SourceDetails::primary("Loxodonta africana", None)),
        ]);
        let extent = index.extent().unwrap();
        assert_eq!(extent.southwest(), (-2.0, -4.0));
        assert_eq!(extent.northeast(), (3.0, 10.0));
    }

    #[test]
    fn test_stats() {
        let index = MultiResolutionIndex::build(scattered(200));
        let stats = index.stats();
        assert_eq!(stats.point_count, 200);
        assert_eq!(stats.levels.len(), 4);
        for level in &stats.levels {
            assert_eq!(level.cell_count, index.cells(level.resolution).len());
            assert!(level.max_count as f64 >= level.avg_count);
        }
    }

    #[test]
    fn test_index_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MultiResolutionIndex>();
    }
}
