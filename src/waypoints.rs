use std::fmt::{self, Display};

use bevy_derive::{Deref, DerefMut};
use serde::Serialize;

use crate::task::point::Waypoint;
use crate::{CoordinateFmtExt as _, LINE_ENDING};

pub const WP_FILE_NAME: &str = "Condor.dat";

/// Task waypoints in task order, written as a WinPilot `.dat` file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deref, DerefMut)]
pub struct WaypointList(pub Vec<Waypoint>);

impl Display for WaypointList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, waypoint) in self.iter().enumerate() {
            write!(
                f,
                "{},{},{},{}M,T,{},{}{LINE_ENDING}",
                idx + 1,
                waypoint.coordinate.lat_deg_min_fmt(),
                waypoint.coordinate.lng_deg_min_fmt(),
                waypoint.altitude,
                waypoint.name,
                waypoint.comment,
            )?;
        }

        Ok(())
    }
}
