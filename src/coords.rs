use geo::point;
use serde::Deserialize;

use crate::Coordinate;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maps simulator planar positions to latitude/longitude in degrees.
pub trait CoordConverter {
    fn latitude(&self, x: f64, y: f64) -> f64;
    fn longitude(&self, x: f64, y: f64) -> f64;

    fn coordinate(&self, x: f64, y: f64) -> Coordinate {
        point! { x: self.longitude(x, y), y: self.latitude(x, y) }
    }
}

/// For positions that already are longitude (`x`) and latitude (`y`).
#[derive(Clone, Copy, Debug, Default)]
pub struct DegreesConverter;

impl CoordConverter for DegreesConverter {
    fn latitude(&self, _x: f64, y: f64) -> f64 {
        y
    }

    fn longitude(&self, x: f64, _y: f64) -> f64 {
        x
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct LandscapeOrigin {
    pub lat: f64,
    pub lon: f64,
}

/// Equirectangular projection around the landscape origin, `x` metres east
/// and `y` metres north. Good enough for landscapes a few hundred km wide.
#[derive(Clone, Copy, Debug)]
pub struct LocalConverter {
    origin: LandscapeOrigin,
}

impl LocalConverter {
    pub fn new(origin: LandscapeOrigin) -> Self {
        Self { origin }
    }
}

impl CoordConverter for LocalConverter {
    fn latitude(&self, _x: f64, y: f64) -> f64 {
        self.origin.lat + (y / EARTH_RADIUS_M).to_degrees()
    }

    fn longitude(&self, x: f64, _y: f64) -> f64 {
        let scale = EARTH_RADIUS_M * self.origin.lat.to_radians().cos();
        self.origin.lon + (x / scale).to_degrees()
    }
}

#[cfg(test)]
mod test {
    use super::{CoordConverter, LandscapeOrigin, LocalConverter};

    #[test]
    fn test_origin_maps_to_itself() {
        let conv = LocalConverter::new(LandscapeOrigin {
            lat: 46.5,
            lon: 9.8,
        });
        let coord = conv.coordinate(0.0, 0.0);
        assert!((coord.y() - 46.5).abs() < f64::EPSILON);
        assert!((coord.x() - 9.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_one_degree_north() {
        let conv = LocalConverter::new(LandscapeOrigin::default());
        let metres_per_degree = 6_371_000.0_f64.to_radians();
        assert!((conv.latitude(0.0, metres_per_degree) - 1.0).abs() < 1e-9);
        assert!((conv.longitude(metres_per_degree, 0.0) - 1.0).abs() < 1e-9);
    }
}
