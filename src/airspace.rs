//! Condor penalty zones as an OpenAir airspace file.

use std::fmt::{self, Display};

use bevy_derive::{Deref, DerefMut};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::TranslatorConfig;
use crate::coords::CoordConverter;
use crate::ini::{Ini, IniError};
use crate::task::settings::PROFILE_SECTION;
use crate::task::TASK_SECTION;
use crate::{Coordinate, CoordinateFmtExt as _, LINE_ENDING};

pub const AIRSPACES_FILE_NAME: &str = "Condor.txt";

const BANNER: [&str; 3] = [
    "**********************************************************",
    "* Condor Task Penalty Zones generated with condor-xcsoar *",
    "**********************************************************",
];

#[derive(Error, Debug)]
pub enum AirspaceError {
    #[error("penalty zones: {0}")]
    Ini(#[from] IniError),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PenaltyZone {
    /// metres AMSL, as declared
    pub top: String,
    /// metres AMSL, 0 is ground
    pub base: u32,
    /// in declaration order, neither winding nor convexity is checked
    pub corners: [Coordinate; 4],
}

impl PenaltyZone {
    fn parse(task: &Ini, conv: &impl CoordConverter, idx: usize) -> Result<Self, IniError> {
        let corner = |corner: usize| -> Result<Coordinate, IniError> {
            let x = task.parse_value(TASK_SECTION, &format!("PZPos{corner}X{idx}"))?;
            let y = task.parse_value(TASK_SECTION, &format!("PZPos{corner}Y{idx}"))?;
            Ok(conv.coordinate(x, y))
        };
        let [c0, c1, c2, c3] = [0, 1, 2, 3].map(corner);

        Ok(Self {
            top: task.value(TASK_SECTION, &format!("PZTop{idx}"))?.to_string(),
            base: task.parse_value(TASK_SECTION, &format!("PZBase{idx}"))?,
            corners: [c0?, c1?, c2?, c3?],
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deref, DerefMut)]
pub struct PenaltyZones(pub Vec<PenaltyZone>);

impl PenaltyZones {
    pub fn parse(task: &Ini, conv: &impl CoordConverter) -> Result<Self, AirspaceError> {
        let count: usize = task.parse_value(TASK_SECTION, "PZCount")?;
        Ok(Self(
            (0..count)
                .map(|idx| PenaltyZone::parse(task, conv, idx))
                .collect::<Result<_, _>>()?,
        ))
    }
}

impl Display for PenaltyZones {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in BANNER {
            write!(f, "{line}{LINE_ENDING}")?;
        }

        for (idx, zone) in self.iter().enumerate() {
            write!(f, "{LINE_ENDING}")?;
            write!(f, "AC P{LINE_ENDING}")?;
            write!(f, "AN Penalty Zone {}{LINE_ENDING}", idx + 1)?;
            write!(f, "AH {}m AMSL{LINE_ENDING}", zone.top)?;
            if zone.base == 0 {
                write!(f, "AL 0{LINE_ENDING}")?;
            } else {
                write!(f, "AL {}m AMSL{LINE_ENDING}", zone.base)?;
            }
            for corner in &zone.corners {
                write!(f, "DP {}{LINE_ENDING}", corner.deg_min_sec_fmt())?;
            }
        }

        Ok(())
    }
}

/// Points the profile at the airspace file, `None` when the task has no
/// penalty zones and no file should be written.
pub fn process_penalty_zones(
    profile: &mut Ini,
    task: &Ini,
    conv: &impl CoordConverter,
    config: &TranslatorConfig,
) -> Result<Option<PenaltyZones>, AirspaceError> {
    let zones = PenaltyZones::parse(task, conv)?;
    debug!("{} penalty zones", zones.len());

    if zones.is_empty() {
        profile.set(PROFILE_SECTION, "AirspaceFile", "\"\"");
        return Ok(None);
    }

    profile.set(
        PROFILE_SECTION,
        "AirspaceFile",
        format!("\"{}\"", config.device_path(AIRSPACES_FILE_NAME)),
    );
    Ok(Some(zones))
}

#[cfg(test)]
mod test {
    use geo::point;
    use pretty_assertions_sorted::assert_eq_sorted;

    use crate::config::TranslatorConfig;
    use crate::coords::DegreesConverter;
    use crate::ini::Ini;

    use super::{process_penalty_zones, AirspaceError, PenaltyZone, PenaltyZones};

    const TASK: &str = "[Task]
Count=0
PZCount=2
PZTop0=1500
PZBase0=0
PZPos0X0=14.0
PZPos0Y0=46.0
PZPos1X0=14.5
PZPos1Y0=46.0
PZPos2X0=14.5
PZPos2Y0=46.5
PZPos3X0=14.0
PZPos3Y0=46.5
PZTop1=3000
PZBase1=500
PZPos0X1=-1.25
PZPos0Y1=-10.0
PZPos1X1=-1.0
PZPos1Y1=-10.0
PZPos2X1=-1.0
PZPos2Y1=-10.5
PZPos3X1=-1.25
PZPos3Y1=-10.5
";

    #[test]
    fn test_parse_zones() {
        let task = Ini::parse(TASK.as_bytes()).unwrap();
        let zones = PenaltyZones::parse(&task, &DegreesConverter).unwrap();

        assert_eq!(zones.len(), 2);
        assert_eq!(
            zones[0],
            PenaltyZone {
                top: "1500".to_string(),
                base: 0,
                corners: [
                    point! { x: 14.0, y: 46.0 },
                    point! { x: 14.5, y: 46.0 },
                    point! { x: 14.5, y: 46.5 },
                    point! { x: 14.0, y: 46.5 },
                ],
            }
        );
        assert_eq!(zones[1].base, 500);
    }

    #[test]
    fn test_openair_output() {
        let task = Ini::parse(TASK.as_bytes()).unwrap();
        let mut profile = Ini::default();
        let zones = process_penalty_zones(
            &mut profile,
            &task,
            &DegreesConverter,
            &TranslatorConfig::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            profile.get("", "AirspaceFile"),
            Some("\"XCSoarData\\Condor.txt\"")
        );
        assert_eq_sorted!(
            zones.to_string(),
            "**********************************************************\r
* Condor Task Penalty Zones generated with condor-xcsoar *\r
**********************************************************\r
\r
AC P\r
AN Penalty Zone 1\r
AH 1500m AMSL\r
AL 0\r
DP 46:00:00 N 014:00:00 E\r
DP 46:00:00 N 014:30:00 E\r
DP 46:30:00 N 014:30:00 E\r
DP 46:30:00 N 014:00:00 E\r
\r
AC P\r
AN Penalty Zone 2\r
AH 3000m AMSL\r
AL 500m AMSL\r
DP 10:00:00 S 001:15:00 W\r
DP 10:00:00 S 001:00:00 W\r
DP 10:30:00 S 001:00:00 W\r
DP 10:30:00 S 001:15:00 W\r
"
        );
    }

    #[test]
    fn test_top_kept_as_declared() {
        let task = Ini::parse(TASK.replace("PZTop0=1500", "PZTop0=1500.0").as_bytes()).unwrap();
        let zones = PenaltyZones::parse(&task, &DegreesConverter).unwrap();

        assert!(zones.to_string().contains("AH 1500.0m AMSL\r\n"));
    }

    #[test]
    fn test_no_zones() {
        let task = Ini::parse(b"[Task]\r\nPZCount=0\r\n").unwrap();
        let mut profile = Ini::default();
        let zones = process_penalty_zones(
            &mut profile,
            &task,
            &DegreesConverter,
            &TranslatorConfig::default(),
        )
        .unwrap();

        assert!(zones.is_none());
        assert_eq!(profile.get("", "AirspaceFile"), Some("\"\""));
    }

    #[test]
    fn test_missing_corner() {
        let task = Ini::parse(b"[Task]\r\nPZCount=1\r\nPZTop0=1000\r\nPZBase0=0\r\n").unwrap();

        assert!(matches!(
            PenaltyZones::parse(&task, &DegreesConverter),
            Err(AirspaceError::Ini(_))
        ));
    }
}
