use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::coords::LandscapeOrigin;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] io::Error),
    #[error("failed to deserialize config file: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Navigation software named in warnings
    pub target_name: String,
    /// Task points the device task table can hold
    pub max_task_points: usize,
    pub max_start_points: usize,
    /// Minimum AAT time in minutes, 0 flies the task as a racing task
    pub aat_time: u32,
    pub generate_wp_file: bool,
    /// Directory of the generated files as seen by the device
    pub data_path_prefix: String,
    pub landscape_origin: LandscapeOrigin,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            target_name: "XCSoar".to_string(),
            max_task_points: 10,
            max_start_points: 10,
            aat_time: 0,
            generate_wp_file: true,
            data_path_prefix: "XCSoarData".to_string(),
            landscape_origin: LandscapeOrigin::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn from_json(content: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&fs_err::read(path)?)
    }

    /// Device side path of a generated file.
    pub fn device_path(&self, file_name: &str) -> String {
        if self.data_path_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!(
                "{}\\{file_name}",
                self.data_path_prefix.trim_end_matches('\\')
            )
        }
    }
}
