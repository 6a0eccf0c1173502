//! Fixed-size rectangular binning of observation points.
//!
//! Space is cut into squares of `cell_size` degrees anchored at (0, 0). A point
//! lands in the cell whose southwest corner is
//! `(floor(lat / size) * size, floor(lon / size) * size)`, so every point on
//! the globe belongs to exactly one cell and points sitting on a shared edge go
//! to the cell that `floor` picks, with no special casing. Points off the globe
//! are never binned, which keeps every key well inside the `i64` range.
//!
//! ```text
//!   lat
//!    ^   +-------+-------+
//!    |   | (1,0) | (1,1) |      key = (row, col)
//!    |   +-------+-------+      row = floor(lat / size)
//!    |   | (0,0) | (0,1) |      col = floor(lon / size)
//!    |   +-------+-------+
//!    +------------------------> lon
//! ```

use crate::error::{EngineError, Result};
use obsgrid_types::bounds::CellBounds;
use obsgrid_types::point::{ObservationPoint, coordinates_on_globe};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Smallest accepted cell side, in degrees (about 0.1 mm).
pub const MIN_CELL_SIZE: f64 = 1e-9;

/// Integer coordinates of a cell on the grid for one cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub row: i64,
    pub col: i64,
}

impl CellKey {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Key of the cell containing `(lat, lon)` for the given cell size.
    ///
    /// Exact for coordinates on the globe and cell sizes of at least
    /// [`MIN_CELL_SIZE`]; beyond that the row and column saturate.
    pub fn containing(lat: f64, lon: f64, cell_size: f64) -> Self {
        Self {
            row: (lat / cell_size).floor() as i64,
            col: (lon / cell_size).floor() as i64,
        }
    }

    /// Bounds of this cell for the given cell size.
    pub fn bounds(&self, cell_size: f64) -> CellBounds {
        CellBounds::from_southwest(
            self.row as f64 * cell_size,
            self.col as f64 * cell_size,
            cell_size,
        )
    }
}

/// A bucket of observation points sharing one grid square.
///
/// Members are shared with the index's point list and with the other
/// resolutions, so a cell is cheap to clone and hand to selection state.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub key: CellKey,
    pub cell_size: f64,
    pub bounds: CellBounds,
    members: Vec<Arc<ObservationPoint>>,
}

impl GridCell {
    fn new(key: CellKey, cell_size: f64) -> Self {
        Self {
            key,
            cell_size,
            bounds: key.bounds(cell_size),
            members: Vec::new(),
        }
    }

    /// Number of member points. Always `members().len()`.
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[Arc<ObservationPoint>] {
        &self.members
    }

    /// Whether `(lat, lon)` bins into this cell.
    ///
    /// Uses the key rather than the corner coordinates, since `key * size`
    /// and `floor(lat / size)` can round differently near an edge.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        coordinates_on_globe(lat, lon) && CellKey::containing(lat, lon, self.cell_size) == self.key
    }

    /// Whether `other` is the same grid square, regardless of membership.
    pub fn same_cell(&self, other: &GridCell) -> bool {
        self.key == other.key && self.cell_size.to_bits() == other.cell_size.to_bits()
    }
}

/// Check that a cell size is usable for binning: finite and at least
/// [`MIN_CELL_SIZE`].
pub fn validate_cell_size(cell_size: f64) -> Result<()> {
    if cell_size.is_finite() && cell_size >= MIN_CELL_SIZE {
        Ok(())
    } else {
        Err(EngineError::InvalidCellSize(cell_size))
    }
}

/// Bucket `points` into cells of `cell_size` degrees.
///
/// Only cells with at least one member are returned. Points off the globe are
/// skipped. Callers must not rely on ordering; in practice cells come back
/// sorted by key.
///
/// # Examples
///
/// ```
/// use obsgrid::grid::bin;
/// use obsgrid_types::point::{ObservationPoint, SourceDetails};
/// use std::sync::Arc;
///
/// let points: Vec<_> = [(1.01, 1.01), (1.02, 1.02), (2.5, 2.5)]
///     .iter()
///     .enumerate()
///     .map(|(i, (lat, lon))| {
///         Arc::new(ObservationPoint::new(i.to_string(), *lat, *lon, SourceDetails::primary("Bufo bufo", None)))
///     })
///     .collect();
///
/// let cells = bin(&points, 0.5)?;
/// assert_eq!(cells.len(), 2);
/// assert_eq!(cells[0].bounds.to_lat_lon_pairs(), [[1.0, 1.0], [1.5, 1.5]]);
/// assert_eq!(cells[0].count(), 2);
/// # Ok::<(), obsgrid::EngineError>(())
/// ```
pub fn bin(points: &[Arc<ObservationPoint>], cell_size: f64) -> Result<Vec<GridCell>> {
    validate_cell_size(cell_size)?;
    Ok(bin_cells(points, cell_size))
}

/// Binning for a cell size the caller has already validated.
pub(crate) fn bin_cells(points: &[Arc<ObservationPoint>], cell_size: f64) -> Vec<GridCell> {
    let mut cells: FxHashMap<CellKey, GridCell> = FxHashMap::default();
    for point in points.iter().filter(|p| p.is_on_globe()) {
        let key = CellKey::containing(point.latitude, point.longitude, cell_size);
        cells
            .entry(key)
            .or_insert_with(|| GridCell::new(key, cell_size))
            .members
            .push(Arc::clone(point));
    }

    let mut cells: Vec<GridCell> = cells.into_values().collect();
    cells.sort_unstable_by_key(|cell| cell.key);
    cells
}
