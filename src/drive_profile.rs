use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::Error;

/// Drive gains for one kind of terrain.
///
/// Fields are private: a profile never changes after construction. To retune,
/// build a new profile and replace the named one in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriveProfile {
    forward_kp: f64,
    forward_ki: f64,
    rot_kp: f64,
    #[serde(serialize_with = "serialize_short_f32")]
    forward_threshold: f32,
    #[serde(serialize_with = "serialize_short_f32")]
    rot_threshold: f32,
}

/// Write an `f32` as the f64 nearest its shortest decimal form, so 0.2 is
/// written as `0.2` rather than `0.20000000298023224`.
fn serialize_short_f32<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    let short = value.to_string().parse().unwrap_or(f64::from(*value));
    serializer.serialize_f64(short)
}

impl fmt::Display for DriveProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.forward_kp, self.forward_ki, self.rot_kp, self.forward_threshold, self.rot_threshold
        )
    }
}

impl DriveProfile {
    /// Arguments are taken in the fixed order
    /// (forward kp, forward ki, rotation kp, forward threshold, rotation threshold).
    pub const fn new(
        forward_kp: f64,
        forward_ki: f64,
        rot_kp: f64,
        forward_threshold: f32,
        rot_threshold: f32,
    ) -> Self {
        Self {
            forward_kp,
            forward_ki,
            rot_kp,
            forward_threshold,
            rot_threshold,
        }
    }

    /// Proportional gain of the distance (forward) loop.
    pub fn forward_kp(&self) -> f64 {
        self.forward_kp
    }

    /// Integral gain of the distance (forward) loop.
    pub fn forward_ki(&self) -> f64 {
        self.forward_ki
    }

    /// Proportional gain of the centering (rotation) loop.
    pub fn rot_kp(&self) -> f64 {
        self.rot_kp
    }

    /// Forward outputs at or below this are treated as zero.
    pub fn forward_threshold(&self) -> f32 {
        self.forward_threshold
    }

    /// Rotation outputs within +/- this are treated as zero.
    pub fn rot_threshold(&self) -> f32 {
        self.rot_threshold
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f32, f32) {
        (
            self.forward_kp,
            self.forward_ki,
            self.rot_kp,
            self.forward_threshold,
            self.rot_threshold,
        )
    }
}

/// Parses the five comma-separated coefficients written by `Display`.
impl FromStr for DriveProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidValue {
            name: "DriveProfile".to_string(),
            raw: s.to_string(),
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 5 {
            return Err(invalid());
        }

        let gain = |i: usize| parts[i].parse::<f64>().map_err(|_| invalid());
        let scale = |i: usize| parts[i].parse::<f32>().map_err(|_| invalid());

        Ok(Self::new(gain(0)?, gain(1)?, gain(2)?, scale(3)?, scale(4)?))
    }
}

/// Terrains with a named profile in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terrain {
    Grass,
    Carpet,
}

impl Terrain {
    /// Registry name of this terrain's profile.
    pub fn param_name(&self) -> &'static str {
        match self {
            Terrain::Grass => "grassProfile",
            Terrain::Carpet => "carpetProfile",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terrain::Grass => write!(f, "grass"),
            Terrain::Carpet => write!(f, "carpet"),
        }
    }
}

impl FromStr for Terrain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grass" | "grassprofile" => Ok(Terrain::Grass),
            "carpet" | "carpetprofile" => Ok(Terrain::Carpet),
            _ => Err(Error::UnknownTerrain(s.to_string())),
        }
    }
}
