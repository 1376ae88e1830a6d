use std::io;

use geo::Point;
use tracing::warn;

pub mod airspace;
pub mod bearing;
pub mod config;
pub mod coords;
pub mod diagnostics;
pub mod ini;
pub mod task;
pub mod translator;
pub mod waypoints;

/// Latitude/longitude in signed degrees, `x` is longitude and `y` latitude.
pub type Coordinate = Point;

/// Device files are consumed by Windows-family navigation software.
pub(crate) const LINE_ENDING: &str = "\r\n";

fn read_to_string(contents: &[u8]) -> Result<String, io::Error> {
    String::from_utf8(contents.to_vec()).or_else(|_| {
        let (string, _, errors) = encoding_rs::WINDOWS_1252.decode(contents);
        if errors {
            warn!("errors while decoding win-1252");
        }
        Ok(string.to_string())
    })
}

fn hemisphere(decimal: f64, is_latitude: bool) -> char {
    match (is_latitude, decimal < 0.0) {
        (true, false) => 'N',
        (true, true) => 'S',
        (false, false) => 'E',
        (false, true) => 'W',
    }
}

// (degrees, thousandths of a minute) so that rounding carries into the degrees
fn decimal_to_deg_min(decimal: f64) -> (u64, u64) {
    let thousandths = (decimal.abs() * 60_000.0).round() as u64;
    (thousandths / 60_000, thousandths % 60_000)
}

fn decimal_to_deg_min_sec(decimal: f64) -> (u64, u64, u64) {
    let seconds = (decimal.abs() * 3600.0).round() as u64;
    (seconds / 3600, seconds % 3600 / 60, seconds % 60)
}

/// Textual coordinate formats used by the generated device files.
pub trait CoordinateFmtExt {
    /// `DD:MM.mmmN`, used by waypoint files
    fn lat_deg_min_fmt(&self) -> String;
    /// `DDD:MM.mmmE`, used by waypoint files
    fn lng_deg_min_fmt(&self) -> String;
    /// `DD:MM:SS N`, used by airspace files
    fn lat_deg_min_sec_fmt(&self) -> String;
    /// `DDD:MM:SS E`, used by airspace files
    fn lng_deg_min_sec_fmt(&self) -> String;
    fn deg_min_sec_fmt(&self) -> String {
        format!(
            "{} {}",
            self.lat_deg_min_sec_fmt(),
            self.lng_deg_min_sec_fmt()
        )
    }
}

impl CoordinateFmtExt for Point {
    fn lat_deg_min_fmt(&self) -> String {
        let (deg, min) = decimal_to_deg_min(self.y());
        format!(
            "{deg:02}:{:02}.{:03}{}",
            min / 1000,
            min % 1000,
            hemisphere(self.y(), true)
        )
    }

    fn lng_deg_min_fmt(&self) -> String {
        let (deg, min) = decimal_to_deg_min(self.x());
        format!(
            "{deg:03}:{:02}.{:03}{}",
            min / 1000,
            min % 1000,
            hemisphere(self.x(), false)
        )
    }

    fn lat_deg_min_sec_fmt(&self) -> String {
        let (deg, min, sec) = decimal_to_deg_min_sec(self.y());
        format!("{deg:02}:{min:02}:{sec:02} {}", hemisphere(self.y(), true))
    }

    fn lng_deg_min_sec_fmt(&self) -> String {
        let (deg, min, sec) = decimal_to_deg_min_sec(self.x());
        format!("{deg:03}:{min:02}:{sec:02} {}", hemisphere(self.x(), false))
    }
}
