use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::position::Position;

/// Latitude/longitude rectangle the robot has to stay inside.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub max_lat: f64,
    pub min_lat: f64,
    pub max_long: f64,
    pub min_long: f64,
}

impl fmt::Display for Geofence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat {:.6}..{:.6}, long {:.6}..{:.6}",
            self.min_lat, self.max_lat, self.min_long, self.max_long
        )
    }
}

impl Geofence {
    /// Bounding box of the surveyed corner fixes.
    ///
    /// Returns `None` when there are no fixes or the box fails [`Geofence::validate`].
    pub fn from_fixes(fixes: &[Position]) -> Option<Geofence> {
        let first = fixes.first()?;

        let fence = fixes.iter().skip(1).fold(
            Geofence {
                max_lat: first.latitude,
                min_lat: first.latitude,
                max_long: first.longitude,
                min_long: first.longitude,
            },
            |fence, p| Geofence {
                max_lat: fence.max_lat.max(p.latitude),
                min_lat: fence.min_lat.min(p.latitude),
                max_long: fence.max_long.max(p.longitude),
                min_long: fence.min_long.min(p.longitude),
            },
        );

        fence.validate().ok().map(|_| fence)
    }

    /// A zero extreme is what an unset coordinate looks like. Each range must
    /// also be non-empty, or `contains` would be false everywhere.
    pub fn validate(&self) -> Result<()> {
        let extremes = [self.max_lat, self.min_lat, self.max_long, self.min_long];
        if extremes.iter().any(|v| *v == 0.0 || !v.is_finite()) {
            return Err(Error::InvalidGeofence(format!(
                "unset or non-finite extreme in {}",
                self
            )));
        }
        if self.min_lat >= self.max_lat {
            return Err(Error::InvalidGeofence(format!(
                "min_lat {} is not below max_lat {}",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_long >= self.max_long {
            return Err(Error::InvalidGeofence(format!(
                "min_long {} is not below max_long {}",
                self.min_long, self.max_long
            )));
        }
        Ok(())
    }

    /// True only strictly inside the fence; the boundary counts as outside.
    pub fn contains(&self, position: &Position) -> bool {
        position.latitude > self.min_lat
            && position.latitude < self.max_lat
            && position.longitude > self.min_long
            && position.longitude < self.max_long
    }

    /// North-south extent in meters.
    pub fn height_m(&self) -> f64 {
        Position::new(self.min_lat, self.min_long)
            .distance_to(&Position::new(self.max_lat, self.min_long))
    }

    /// East-west extent in meters, measured along the southern edge.
    pub fn width_m(&self) -> f64 {
        Position::new(self.min_lat, self.min_long)
            .distance_to(&Position::new(self.min_lat, self.max_long))
    }
}
