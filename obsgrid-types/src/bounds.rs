use geo::{Polygon, Rect};
use serde::{Deserialize, Serialize};

/// The rectangle covered by one grid cell, in degree space.
///
/// This is a wrapper around `geo::Rect` (x = longitude, y = latitude) that
/// speaks in southwest/northeast corners, the way map hosts describe cell
/// rectangles. It is a square in degrees, not on the ground.
///
/// Corners are display geometry. Whether a point belongs to a cell is decided
/// by its cell key, not by comparing against these edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellBounds {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl CellBounds {
    /// Create bounds from the southwest corner and a side length in degrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use obsgrid_types::bounds::CellBounds;
    ///
    /// let bounds = CellBounds::from_southwest(1.0, 1.0, 0.5);
    /// assert_eq!(bounds.to_lat_lon_pairs(), [[1.0, 1.0], [1.5, 1.5]]);
    /// ```
    pub fn from_southwest(south: f64, west: f64, size: f64) -> Self {
        Self::new(south, west, south + size, west + size)
    }

    /// Create bounds from explicit corners.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: west, y: south },
                geo::coord! { x: east, y: north },
            ),
        }
    }

    pub fn south(&self) -> f64 {
        self.rect.min().y
    }

    pub fn west(&self) -> f64 {
        self.rect.min().x
    }

    pub fn north(&self) -> f64 {
        self.rect.max().y
    }

    pub fn east(&self) -> f64 {
        self.rect.max().x
    }

    /// `(lat, lon)` of the southwest corner.
    pub fn southwest(&self) -> (f64, f64) {
        (self.south(), self.west())
    }

    /// `(lat, lon)` of the northeast corner.
    pub fn northeast(&self) -> (f64, f64) {
        (self.north(), self.east())
    }

    /// `[[south, west], [north, east]]`, the corner-pair form map widgets accept.
    pub fn to_lat_lon_pairs(&self) -> [[f64; 2]; 2] {
        [[self.south(), self.west()], [self.north(), self.east()]]
    }

    /// `(lat, lon)` of the center.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south() + self.north()) / 2.0,
            (self.west() + self.east()) / 2.0,
        )
    }

    /// Closed rectangle as a polygon, for hosts that want ring geometry.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.rect.to_polygon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners() {
        let b = CellBounds::from_southwest(2.5, -1.0, 0.5);
        assert_eq!(b.southwest(), (2.5, -1.0));
        assert_eq!(b.northeast(), (3.0, -0.5));
        assert_eq!(b.center(), (2.75, -0.75));
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let b = CellBounds::from_southwest(0.0, 0.0, 1.0);
        let poly = b.to_polygon();
        let ring: Vec<_> = poly.exterior().coords().collect();
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), 5);
    }
}
