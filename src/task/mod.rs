pub mod point;
pub mod sector;
pub mod settings;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::TranslatorConfig;
use crate::coords::CoordConverter;
use crate::diagnostics::Diagnostics;
use crate::ini::{Ini, IniError};
use crate::waypoints::WaypointList;

use self::point::{build_points, TaskSlot};
use self::sector::resolve_sectors;
use self::settings::{AutoAdvance, SettingsTask};

pub(crate) const TASK_SECTION: &str = "Task";

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("too many waypoints ({count}) in a task file (only {max} supported)")]
    TooManyTaskPoints { count: usize, max: usize },
    #[error("task file: {0}")]
    Ini(#[from] IniError),
}

/// Everything the device needs to fly the task.
#[derive(Clone, Debug, Serialize)]
pub struct TaskDefinition {
    pub settings: SettingsTask,
    pub task_points: Vec<TaskSlot>,
    /// Multiple start points are never used, every slot stays unused
    pub start_points: Vec<TaskSlot>,
    pub waypoints: WaypointList,
}

pub type TaskResult = Result<TaskDefinition, TaskError>;

/// Translates the `[Task]` section and writes the task settings into `profile`.
pub fn process_task(
    profile: &mut Ini,
    task: &Ini,
    conv: &impl CoordConverter,
    config: &TranslatorConfig,
    sink: &mut impl Diagnostics,
) -> TaskResult {
    let count: usize = task.parse_value(TASK_SECTION, "Count")?;

    // the takeoff point is not part of the device task
    let task_points_num = count.saturating_sub(1);
    if task_points_num > config.max_task_points {
        return Err(TaskError::TooManyTaskPoints {
            count: task_points_num,
            max: config.max_task_points,
        });
    }

    let points = build_points(task, count, conv, config.aat_time > 0)?;
    let resolved = resolve_sectors(&points, &config.target_name, sink);
    debug!("resolved sectors: {resolved:?}");

    let settings = SettingsTask::new(
        &resolved,
        config.aat_time,
        AutoAdvance::from_profile(profile),
    );
    settings.write_profile(profile);

    let mut task_points = vec![TaskSlot::Unused; config.max_task_points];
    for (slot, point) in task_points.iter_mut().zip(&points) {
        *slot = point.slot;
    }

    Ok(TaskDefinition {
        settings,
        task_points,
        start_points: vec![TaskSlot::Unused; config.max_start_points],
        waypoints: WaypointList(points.into_iter().map(|point| point.waypoint).collect()),
    })
}

#[cfg(test)]
mod test {
    use crate::config::TranslatorConfig;
    use crate::coords::DegreesConverter;
    use crate::diagnostics::Report;
    use crate::ini::Ini;

    use super::point::{AatZone, TaskSlot, WAYPOINT_INDEX_OFFSET};
    use super::settings::{AutoAdvance, FinishType, SectorType, StartType};
    use super::{process_task, TaskError};

    const TASK: &str = "[Task]
Landscape=Slovenia3
Count=4
TPName0=Lesce
TPPosX0=100000
TPPosY0=45000
TPPosZ0=500
TPRadius0=0
TPAngle0=360
TPSectorType0=0
TPWidth0=0
TPHeight0=0
TPName1=Bled
TPPosX1=14.1
TPPosY1=46.35
TPPosZ1=475
TPRadius1=500
TPAngle1=90
TPSectorType1=0
TPWidth1=0
TPHeight1=1500
TPName2=Kranj
TPPosX2=14.35
TPPosY2=46.24
TPPosZ2=386
TPRadius2=1000
TPAngle2=360
TPSectorType2=0
TPWidth2=0
TPHeight2=0
TPName3=Lesce
TPPosX3=14.18
TPPosY3=46.36
TPPosZ3=502
TPRadius3=400
TPAngle3=180
TPSectorType3=0
TPWidth3=0
TPHeight3=0
";

    #[test]
    fn test_three_point_task() {
        let task = Ini::parse(TASK.as_bytes()).unwrap();
        let mut profile = Ini::parse(b"AutoAdvance=2\r\n").unwrap();
        let mut report = Report::default();

        let definition = process_task(
            &mut profile,
            &task,
            &DegreesConverter,
            &TranslatorConfig::default(),
            &mut report,
        )
        .unwrap();

        assert!(report.is_clean());
        let settings = definition.settings;
        assert_eq!(settings.start_type, StartType::Sector);
        assert_eq!(settings.start_radius, 500);
        assert_eq!(settings.start_max_height, 1500);
        assert_eq!(settings.sector_type, SectorType::Circle);
        assert_eq!(settings.sector_radius, 1000);
        assert_eq!(settings.finish_type, FinishType::Line);
        assert_eq!(settings.finish_radius, 400);
        assert_eq!(settings.auto_advance, AutoAdvance::Arm);
        assert!(!settings.aat_enabled);

        assert_eq!(definition.task_points.len(), 10);
        assert_eq!(
            definition
                .task_points
                .iter()
                .filter_map(TaskSlot::index)
                .collect::<Vec<_>>(),
            vec![
                WAYPOINT_INDEX_OFFSET + 1,
                WAYPOINT_INDEX_OFFSET + 2,
                WAYPOINT_INDEX_OFFSET + 3
            ]
        );
        assert!(definition.task_points[3..]
            .iter()
            .all(|slot| *slot == TaskSlot::Unused));
        assert!(definition
            .start_points
            .iter()
            .all(|slot| *slot == TaskSlot::Unused));
        assert_eq!(definition.waypoints.len(), 3);

        assert_eq!(profile.get("", "StartLine"), Some("2"));
        assert_eq!(profile.get("", "FAISector"), Some("0"));
        assert_eq!(profile.get("", "Radius"), Some("1000"));
        assert_eq!(profile.get("", "FinishLine"), Some("1"));
        assert_eq!(profile.get("", "FinishRadius"), Some("400"));
        assert_eq!(profile.get("", "AutoAdvance"), Some("2"));
    }

    #[test]
    fn test_aat_task() {
        let task = Ini::parse(TASK.as_bytes()).unwrap();
        let mut profile = Ini::default();
        let mut report = Report::default();
        let config = TranslatorConfig {
            aat_time: 120,
            ..TranslatorConfig::default()
        };

        let definition =
            process_task(&mut profile, &task, &DegreesConverter, &config, &mut report).unwrap();

        assert!(report.is_clean());
        assert!(definition.settings.aat_enabled);
        assert_eq!(definition.settings.aat_min_time, 120);
        assert_eq!(definition.settings.auto_advance, AutoAdvance::ArmStart);
        assert_eq!(
            definition.task_points[1],
            TaskSlot::Aat {
                index: WAYPOINT_INDEX_OFFSET + 2,
                zone: AatZone::Circle { radius: 1000 }
            }
        );
        // the area does not contribute to the turnpoint sector
        assert_eq!(definition.settings.sector_type, SectorType::Circle);
        assert_eq!(definition.settings.sector_radius, 0);
    }

    #[test]
    fn test_too_many_task_points() {
        let task = Ini::parse(TASK.as_bytes()).unwrap();
        let config = TranslatorConfig {
            max_task_points: 2,
            ..TranslatorConfig::default()
        };

        let result = process_task(
            &mut Ini::default(),
            &task,
            &DegreesConverter,
            &config,
            &mut Report::default(),
        );

        assert!(matches!(
            result,
            Err(TaskError::TooManyTaskPoints { count: 3, max: 2 })
        ));
    }

    #[test]
    fn test_empty_task() {
        let task = Ini::parse(b"[Task]\r\nCount=0\r\n").unwrap();
        let mut profile = Ini::default();

        let definition = process_task(
            &mut profile,
            &task,
            &DegreesConverter,
            &TranslatorConfig::default(),
            &mut Report::default(),
        )
        .unwrap();

        assert!(definition.waypoints.is_empty());
        assert_eq!(profile.get("", "StartLine"), Some("0"));
    }
}
