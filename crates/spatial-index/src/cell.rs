//! R-tree entry for one grid cell.

use rstar::{PointDistance, RTreeObject, AABB};
use wind_common::CellIndex;

/// One indexed cell center. Ghost copies of seam columns share the
/// `cell` index of the real column they mirror, shifted in longitude
/// by +-360 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub lat: f64,
    pub lon: f64,
    pub cell: CellIndex,
}

impl GridCell {
    pub fn new(lat: f64, lon: f64, cell: CellIndex) -> Self {
        Self { lat, lon, cell }
    }
}

impl RTreeObject for GridCell {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lon])
    }
}

impl PointDistance for GridCell {
    /// Squared planar distance in degrees. Adequate for resolving the
    /// nearest cell of a regular grid; not a geodesic distance.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.lat - point[0];
        let dlon = self.lon - point[1];
        dlat * dlat + dlon * dlon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_squared() {
        let cell = GridCell::new(1.0, 2.0, CellIndex::new(0, 0));
        assert_eq!(cell.distance_2(&[4.0, 6.0]), 25.0);
        assert_eq!(cell.distance_2(&[1.0, 2.0]), 0.0);
    }
}
