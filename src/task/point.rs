use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::Serialize;
use tracing::debug;

use crate::bearing::waypoint_bearing;
use crate::coords::CoordConverter;
use crate::ini::{Ini, IniResult};
use crate::Coordinate;

use super::sector::aat_radials;
use super::TASK_SECTION;

/// Keeps task waypoint numbers clear of the pilot's own waypoint files.
pub const WAYPOINT_INDEX_OFFSET: u32 = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WaypointFlags(u16);

impl WaypointFlags {
    pub const TURNPOINT: Self = Self(0x02);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Waypoint {
    pub number: u32,
    pub coordinate: Coordinate,
    /// metres AMSL
    pub altitude: f64,
    pub flags: WaypointFlags,
    pub name: String,
    pub comment: String,
    pub in_task: bool,
}

impl Waypoint {
    pub fn turnpoint(
        number: u32,
        coordinate: Coordinate,
        altitude: f64,
        name: &str,
        comment: &str,
    ) -> Self {
        Self {
            number,
            coordinate,
            altitude,
            flags: WaypointFlags::TURNPOINT,
            name: name.to_string(),
            comment: comment.to_string(),
            in_task: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Leg {
    Start,
    Turn,
    Finish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AatZone {
    Circle {
        radius: u32,
    },
    Sector {
        radius: u32,
        start_radial: u32,
        finish_radial: u32,
    },
}

/// One entry of the device task table, which has a fixed capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TaskSlot {
    #[default]
    Unused,
    Turn {
        index: u32,
    },
    Aat {
        index: u32,
        zone: AatZone,
    },
}

impl TaskSlot {
    pub fn index(&self) -> Option<u32> {
        match self {
            TaskSlot::Unused => None,
            TaskSlot::Turn { index } | TaskSlot::Aat { index, .. } => Some(*index),
        }
    }

    /// Start and finish radial, a full circle unless this is an AAT sector.
    pub fn radials(&self) -> (u32, u32) {
        match self {
            TaskSlot::Aat {
                zone:
                    AatZone::Sector {
                        start_radial,
                        finish_radial,
                        ..
                    },
                ..
            } => (*start_radial, *finish_radial),
            _ => (0, 360),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
enum CondorSectorType {
    Classic = 0,
    Window = 1,
}

/// Observation zone as Condor declares it for a single point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SectorDeclaration {
    Classic { radius: u32, angle: u32 },
    Window,
    Unsupported(String),
}

impl SectorDeclaration {
    fn parse(task: &Ini, idx: usize) -> IniResult<Self> {
        let code = task.value(TASK_SECTION, &format!("TPSectorType{idx}"))?;
        Ok(
            match code.parse::<u8>().ok().and_then(CondorSectorType::from_u8) {
                Some(CondorSectorType::Classic) => SectorDeclaration::Classic {
                    radius: task.parse_value(TASK_SECTION, &format!("TPRadius{idx}"))?,
                    angle: task.parse_value(TASK_SECTION, &format!("TPAngle{idx}"))?,
                },
                Some(CondorSectorType::Window) => SectorDeclaration::Window,
                None => SectorDeclaration::Unsupported(code.to_string()),
            },
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskPoint {
    pub leg: Leg,
    pub waypoint: Waypoint,
    pub slot: TaskSlot,
    pub sector: SectorDeclaration,
    /// start height limit, 0 for every other point
    pub max_height: u32,
}

impl TaskPoint {
    pub fn is_aat(&self) -> bool {
        matches!(self.slot, TaskSlot::Aat { .. })
    }
}

fn read_coordinate(task: &Ini, conv: &impl CoordConverter, idx: usize) -> IniResult<Coordinate> {
    let x = task.parse_value(TASK_SECTION, &format!("TPPosX{idx}"))?;
    let y = task.parse_value(TASK_SECTION, &format!("TPPosY{idx}"))?;
    Ok(conv.coordinate(x, y))
}

fn display_name(idx: usize, count: usize, name: &str) -> String {
    if idx == 1 {
        format!("S:{name}")
    } else if idx == count - 1 {
        format!("F:{name}")
    } else {
        format!("{}:{name}", idx - 1)
    }
}

/// Builds every point after the takeoff (point 0) of a task with `count` points.
pub fn build_points(
    task: &Ini,
    count: usize,
    conv: &impl CoordConverter,
    aat_enabled: bool,
) -> IniResult<Vec<TaskPoint>> {
    let coordinates = (1..count)
        .map(|idx| read_coordinate(task, conv, idx))
        .collect::<IniResult<Vec<_>>>()?;

    let mut points = Vec::with_capacity(coordinates.len());
    for (idx, &coordinate) in (1..count).zip(&coordinates) {
        let leg = if idx == 1 {
            Leg::Start
        } else if idx == count - 1 {
            Leg::Finish
        } else {
            Leg::Turn
        };

        let tp_name = task.value(TASK_SECTION, &format!("TPName{idx}"))?;
        let name = display_name(idx, count, tp_name);

        let min_altitude: u32 = task.parse_value(TASK_SECTION, &format!("TPWidth{idx}"))?;
        let altitude = if min_altitude == 0 {
            task.parse_value(TASK_SECTION, &format!("TPPosZ{idx}"))?
        } else {
            f64::from(min_altitude)
        };

        let number = WAYPOINT_INDEX_OFFSET + idx as u32;
        let sector = SectorDeclaration::parse(task, idx)?;

        let slot = match sector {
            SectorDeclaration::Classic { radius, angle } if aat_enabled && leg == Leg::Turn => {
                let zone = if angle == 360 {
                    AatZone::Circle { radius }
                } else {
                    // coordinates[idx - 1] is this point
                    let from_previous = waypoint_bearing(coordinates[idx - 2], coordinate);
                    let from_next = waypoint_bearing(coordinates[idx], coordinate);
                    let (start_radial, finish_radial) =
                        aat_radials(from_previous, from_next, angle);
                    AatZone::Sector {
                        radius,
                        start_radial,
                        finish_radial,
                    }
                };
                TaskSlot::Aat {
                    index: number,
                    zone,
                }
            }
            _ => TaskSlot::Turn { index: number },
        };

        let max_height = match (leg, &sector) {
            (Leg::Start, SectorDeclaration::Classic { .. }) => {
                task.parse_value(TASK_SECTION, &format!("TPHeight{idx}"))?
            }
            _ => 0,
        };

        debug!("{name}: {sector:?} -> {slot:?}");
        points.push(TaskPoint {
            leg,
            waypoint: Waypoint::turnpoint(number, coordinate, altitude, &name, tp_name),
            slot,
            sector,
            max_height,
        });
    }

    Ok(points)
}
