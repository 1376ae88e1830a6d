//! One translation run: a Condor task plus the pilot's XCSoar profile in,
//! the device file set out.

use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::airspace::{process_penalty_zones, AirspaceError, PenaltyZones, AIRSPACES_FILE_NAME};
use crate::config::{ConfigError, TranslatorConfig};
use crate::coords::CoordConverter;
use crate::diagnostics::Diagnostics;
use crate::ini::{Ini, IniError};
use crate::task::settings::PROFILE_SECTION;
use crate::task::{process_task, TaskDefinition, TaskError};
use crate::waypoints::{WaypointList, WP_FILE_NAME};

pub const PROFILE_FILE_NAME: &str = "Condor.prf";

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("INI: {0}")]
    Ini(#[from] IniError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("task: {0}")]
    Task(#[from] TaskError),
    #[error("airspace: {0}")]
    Airspace(#[from] AirspaceError),
    #[error("failed to read file: {0}")]
    FileRead(#[from] io::Error),
    #[error("failed to write file: {0}")]
    FileWrite(io::Error),
}

pub type TranslateResult<T> = Result<T, TranslateError>;

/// Condor runs on simulator time, so the device must not shift it.
pub fn process_scenery_time(profile: &mut Ini) {
    profile.set(PROFILE_SECTION, "UTCOffset", "0");
}

#[derive(Clone, Debug, Serialize)]
pub struct Translation {
    pub profile: Ini,
    pub task: TaskDefinition,
    pub penalty_zones: Option<PenaltyZones>,
    generate_wp_file: bool,
}

impl Translation {
    pub fn waypoints(&self) -> Option<&WaypointList> {
        self.generate_wp_file.then_some(&self.task.waypoints)
    }

    /// File names and contents of everything the device needs.
    pub fn files(&self) -> Vec<(&'static str, String)> {
        let mut files = vec![(PROFILE_FILE_NAME, self.profile.to_string())];
        if let Some(waypoints) = self.waypoints() {
            files.push((WP_FILE_NAME, waypoints.to_string()));
        }
        if let Some(zones) = &self.penalty_zones {
            files.push((AIRSPACES_FILE_NAME, zones.to_string()));
        }
        files
    }

    pub fn write(&self, output_dir: &Path) -> TranslateResult<()> {
        fs_err::create_dir_all(output_dir).map_err(TranslateError::FileWrite)?;
        for (name, contents) in self.files() {
            let path = output_dir.join(name);
            fs_err::write(&path, contents).map_err(TranslateError::FileWrite)?;
            info!("written {}", path.display());
        }

        Ok(())
    }
}

/// Translates an already parsed task, updating a copy of `profile`.
///
/// Fidelity losses are reported to `sink`. Only malformed input and a task
/// that does not fit the device task table fail the whole run.
pub fn translate(
    config: &TranslatorConfig,
    task: &Ini,
    mut profile: Ini,
    conv: &impl CoordConverter,
    sink: &mut impl Diagnostics,
) -> TranslateResult<Translation> {
    process_scenery_time(&mut profile);
    let definition = process_task(&mut profile, task, conv, config, sink)?;
    let penalty_zones = process_penalty_zones(&mut profile, task, conv, config)?;
    debug!(
        "{} waypoints, {} penalty zones",
        definition.waypoints.len(),
        penalty_zones.as_ref().map_or(0, |zones| zones.len())
    );

    Ok(Translation {
        profile,
        task: definition,
        penalty_zones,
        generate_wp_file: config.generate_wp_file,
    })
}

/// Like [`translate`], reading the Condor `.fpl` task and optionally an
/// existing XCSoar profile to start from.
pub fn translate_files(
    config: &TranslatorConfig,
    task_path: &Path,
    profile_path: Option<&Path>,
    conv: &impl CoordConverter,
    sink: &mut impl Diagnostics,
) -> TranslateResult<Translation> {
    let task = Ini::parse(&fs_err::read(task_path)?)?;
    let profile = match profile_path {
        Some(path) => Ini::parse(&fs_err::read(path)?)?,
        None => Ini::default(),
    };
    translate(config, &task, profile, conv, sink)
}
