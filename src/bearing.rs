use crate::Coordinate;

/// Initial great-circle bearing from `from` to `to`, rounded to whole degrees
/// in `[0, 360)`. Coincident points yield 0.
#[allow(clippy::float_cmp)]
pub fn waypoint_bearing(from: Coordinate, to: Coordinate) -> u32 {
    let lat1 = from.y().to_radians();
    let lat2 = to.y().to_radians();
    let delta_lon = (to.x() - from.x()).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    if x == 0.0 && y == 0.0 {
        return 0;
    }

    (360.0 + y.atan2(x).to_degrees() + 0.5) as u32 % 360
}
