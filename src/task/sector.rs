//! Reconciles Condor's per-point sectors with XCSoar's task model.
//!
//! Condor lets every turnpoint pick its own angle and radius. XCSoar has a
//! single sector type and radius for all turnpoints, plus separately typed
//! start and finish. The resolver folds the points in task order and keeps
//! the most faithful approximation, reporting every loss of fidelity.

use serde::Serialize;

use crate::diagnostics::Diagnostics;

use super::point::{Leg, SectorDeclaration, TaskPoint};
use super::settings::{FinishType, SectorType, StartType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaskSector {
    pub kind: SectorType,
    pub radius: u32,
}

/// Accumulated task-wide geometry, threaded through the points in order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedSectors {
    pub start_type: StartType,
    pub start_radius: u32,
    pub start_max_height: u32,
    /// `None` until the first turnpoint declares a usable sector
    pub sector: Option<TaskSector>,
    pub finish_type: FinishType,
    pub finish_radius: u32,
    /// Condor heights are AGL only, XCSoar wants AMSL
    pub finish_min_height: u32,
    pub conflict: bool,
}

impl ResolvedSectors {
    fn apply(
        mut self,
        point: &TaskPoint,
        target: &str,
        sink: &mut impl Diagnostics,
    ) -> Self {
        let name = &point.waypoint.name;
        match &point.sector {
            // AAT areas are carried by the task point slot
            SectorDeclaration::Classic { .. } if point.is_aat() => {}
            SectorDeclaration::Classic { radius, angle } => {
                self = self.apply_classic(name, point.leg, *radius, *angle, target, sink);
                match point.leg {
                    Leg::Start => {
                        self.start_radius = *radius;
                        self.start_max_height = point.max_height;
                    }
                    Leg::Finish => {
                        self.finish_radius = *radius;
                        self.finish_min_height = 0;
                    }
                    Leg::Turn => {}
                }
            }
            SectorDeclaration::Window => sink.warn(format!(
                "{name}: {target} does not support window TP type. Circle TP will be used and \
                 you are responsible for reaching it at the correct height and heading."
            )),
            SectorDeclaration::Unsupported(code) => sink.error(format!(
                "Unsupported sector type '{code}' specified for TP '{name}'"
            )),
        }
        self
    }

    fn apply_classic(
        mut self,
        name: &str,
        leg: Leg,
        radius: u32,
        angle: u32,
        target: &str,
        sink: &mut impl Diagnostics,
    ) -> Self {
        match (angle, leg) {
            (90, Leg::Start) => self.start_type = StartType::Sector,
            (90, Leg::Finish) => self.finish_type = FinishType::Sector,
            (90, Leg::Turn) => self.merge(name, SectorType::Fai, radius, target, sink),
            (180, Leg::Start) => self.start_type = StartType::Line,
            (180, Leg::Finish) => self.finish_type = FinishType::Line,
            (180, Leg::Turn) => match self.sector {
                Some(TaskSector {
                    kind: SectorType::Fai,
                    ..
                }) => self.conflict = true,
                _ => {
                    sink.warn(format!(
                        "{name}: {target} does not support line TP type. FAI sector will be \
                         used instead. You may need to manually advance a waypoint after \
                         reaching it in Condor."
                    ));
                    self.sector = Some(TaskSector {
                        kind: SectorType::Fai,
                        radius,
                    });
                }
            },
            (270 | 360, leg) => {
                if angle == 270 {
                    sink.warn(format!(
                        "{name}: {target} does not support TP with angle '270'. Circle sector \
                         will be used instead. Be careful to advance a waypoint in Condor after \
                         it has been advanced by {target}."
                    ));
                }
                match leg {
                    Leg::Start => self.start_type = StartType::Circle,
                    Leg::Finish => self.finish_type = FinishType::Circle,
                    Leg::Turn => match self.sector {
                        Some(TaskSector {
                            kind: SectorType::Fai,
                            ..
                        }) => self.conflict = true,
                        _ => self.merge(name, SectorType::Circle, radius, target, sink),
                    },
                }
            }
            // TODO: other angles are dropped without a warning, decide whether
            // they should approximate to the nearest supported sector
            _ => {}
        }
        self
    }

    /// Smaller radius wins when two turnpoints of the same kind disagree.
    fn merge(
        &mut self,
        name: &str,
        kind: SectorType,
        radius: u32,
        target: &str,
        sink: &mut impl Diagnostics,
    ) {
        self.sector = Some(match self.sector {
            Some(previous) if previous.kind != kind => {
                self.conflict = true;
                TaskSector { kind, radius }
            }
            Some(previous) if previous.radius != radius => {
                sink.warn(format!(
                    "{name}: {target} does not support different TP types. The smallest radius \
                     will be used for all {kind} sectors. If you advance a sector in {target} \
                     you will advance it in Condor."
                ));
                TaskSector {
                    kind,
                    radius: previous.radius.min(radius),
                }
            }
            _ => TaskSector { kind, radius },
        });
    }
}

pub fn resolve_sectors(
    points: &[TaskPoint],
    target: &str,
    sink: &mut impl Diagnostics,
) -> ResolvedSectors {
    let resolved = points
        .iter()
        .fold(ResolvedSectors::default(), |acc, point| {
            acc.apply(point, target, &mut *sink)
        });

    if resolved.conflict {
        sink.warn(format!(
            "{target} does not support different TP types. FAI sector will be used for all \
             sectors. You may need to manually advance a waypoint after reaching it in Condor."
        ));
    }

    resolved
}

/// Radial halving the angle between the bearings towards a point from its
/// two neighbours. Bearings more than 180° apart take the reflex bisector.
pub fn bisector(bearing1: u32, bearing2: u32) -> u32 {
    if bearing1 == bearing2 {
        return bearing1;
    }
    let half_angle = (bearing1 + bearing2) / 2;
    if bearing1.abs_diff(bearing2) > 180 {
        (half_angle + 180) % 360
    } else {
        half_angle
    }
}

/// Start and finish radials of an AAT sector opening `angle` degrees around the bisector.
pub fn aat_radials(bearing1: u32, bearing2: u32, angle: u32) -> (u32, u32) {
    let half_angle = f64::from(bisector(bearing1, bearing2));
    let half_width = f64::from(angle) / 2.0;
    (
        (half_angle - half_width).rem_euclid(360.0) as u32,
        (half_angle + half_width).rem_euclid(360.0) as u32,
    )
}
