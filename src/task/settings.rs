use std::fmt::{self, Display};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::Serialize;

use crate::ini::Ini;

use super::sector::{ResolvedSectors, TaskSector};

/// Profile keys live in the unnamed section of the XCSoar profile.
pub(crate) const PROFILE_SECTION: &str = "";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum StartType {
    #[default]
    Circle = 0,
    Line = 1,
    Sector = 2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum FinishType {
    #[default]
    Circle = 0,
    Line = 1,
    Sector = 2,
}

/// Shape shared by every turnpoint between start and finish.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SectorType {
    #[default]
    Circle = 0,
    Fai = 1,
}

impl Display for SectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorType::Circle => write!(f, "circle"),
            SectorType::Fai => write!(f, "FAI"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromPrimitive, Serialize)]
pub enum AutoAdvance {
    Manual = 0,
    Auto = 1,
    Arm = 2,
    #[default]
    ArmStart = 3,
}

impl AutoAdvance {
    /// Keeps whatever the pilot configured, arm start if nothing usable is set.
    pub fn from_profile(profile: &Ini) -> Self {
        profile
            .get(PROFILE_SECTION, "AutoAdvance")
            .and_then(|value| value.parse::<u8>().ok())
            .and_then(Self::from_u8)
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SettingsTask {
    pub aat_enabled: bool,
    /// minutes
    pub aat_min_time: u32,
    pub auto_advance: AutoAdvance,
    pub enable_multiple_start_points: bool,
    pub start_type: StartType,
    pub start_radius: u32,
    pub start_max_height: u32,
    pub sector_type: SectorType,
    pub sector_radius: u32,
    pub finish_type: FinishType,
    pub finish_radius: u32,
    pub finish_min_height: u32,
}

impl SettingsTask {
    pub fn new(resolved: &ResolvedSectors, aat_time: u32, auto_advance: AutoAdvance) -> Self {
        let TaskSector { kind, radius } = resolved.sector.unwrap_or_default();
        Self {
            aat_enabled: aat_time > 0,
            aat_min_time: aat_time,
            auto_advance,
            enable_multiple_start_points: false,
            start_type: resolved.start_type,
            start_radius: resolved.start_radius,
            start_max_height: resolved.start_max_height,
            sector_type: kind,
            sector_radius: radius,
            finish_type: resolved.finish_type,
            finish_radius: resolved.finish_radius,
            finish_min_height: resolved.finish_min_height,
        }
    }

    pub fn write_profile(&self, profile: &mut Ini) {
        let mut set = |key: &str, value: String| profile.set(PROFILE_SECTION, key, value);

        set("StartLine", (self.start_type as u8).to_string());
        set("StartMaxHeight", self.start_max_height.to_string());
        // XCSoar margins have no Condor counterpart
        set("StartMaxHeightMargin", "0".to_string());
        // 1 = AMSL
        set("StartHeightRef", "1".to_string());
        set("StartRadius", self.start_radius.to_string());
        set("StartMaxSpeed", "0".to_string());
        set("StartMaxSpeedMargin", "0".to_string());

        set("FAISector", (self.sector_type as u8).to_string());
        set("Radius", self.sector_radius.to_string());

        set("FinishLine", (self.finish_type as u8).to_string());
        set("FinishMinHeight", self.finish_min_height.to_string());
        set("FinishRadius", self.finish_radius.to_string());
        set("FAIFinishHeight", self.finish_min_height.to_string());
    }
}
