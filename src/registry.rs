//! The tuning registry: every named parameter the control and vision code reads.
//!
//! A [`Registry`] is an ordinary value. Build one at startup (from a
//! [`Deployment`] snapshot or a config file), then hand out `&Registry` or
//! `Arc<Registry>` to readers. Changing a value needs `&mut Registry`, so
//! runtime writers have to go through whatever lock the owner wraps it in.

use std::fmt;
use std::str::FromStr;

use crate::defaults::{self, Snapshot};
use crate::drive_profile::{DriveProfile, Terrain};
use crate::error::{Error, Result};
use crate::param::{ParamKind, ParamValue};

/// Registered names, in the order they are listed and written.
const PARAMS: [(&str, ParamKind); 15] = [
    ("FAST_UPDATE_INTERVAL", ParamKind::Long),
    ("PERMISSION_LOCATION", ParamKind::Int),
    ("GOOSE_LEN_INCHES", ParamKind::Int),
    ("SMALL_BOX_THRESHOLD", ParamKind::Int),
    ("SIZE_SETPOINT", ParamKind::Float),
    ("CENTER_SETPOINT", ParamKind::Float),
    ("CENTER_IN_PIXELS", ParamKind::Float),
    ("grassProfile", ParamKind::Profile),
    ("carpetProfile", ParamKind::Profile),
    ("ROT_THRESHOLD", ParamKind::Long),
    ("IDLE_THRESHOLD", ParamKind::Int),
    ("MAX_BUFFER_FRAMES", ParamKind::Int),
    ("TAG", ParamKind::Text),
    ("IMAGE_HEIGHT", ParamKind::Int),
    ("IMAGE_WIDTH", ParamKind::Int),
];

/// Named snapshot a registry is initialized from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Deployment {
    #[default]
    Default,
    FieldTuned,
}

impl Deployment {
    pub fn snapshot(&self) -> &'static Snapshot {
        match self {
            Deployment::Default => &defaults::DEFAULT,
            Deployment::FieldTuned => &defaults::FIELD_TUNED,
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deployment::Default => write!(f, "default"),
            Deployment::FieldTuned => write!(f, "field-tuned"),
        }
    }
}

impl FromStr for Deployment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "default" => Ok(Deployment::Default),
            "field-tuned" | "field" => Ok(Deployment::FieldTuned),
            _ => Err(Error::UnknownDeployment(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Registry {
    deployment: Deployment,
    fast_update_interval: i64,
    permission_location: i32,
    goose_len_inches: i32,
    small_box_threshold: i32,
    size_setpoint: f64,
    center_setpoint: f64,
    center_in_pixels: f32,
    grass_profile: DriveProfile,
    carpet_profile: DriveProfile,
    rot_threshold: i64,
    idle_threshold: i32,
    max_buffer_frames: i32,
    tag: String,
    image_height: i32,
    image_width: i32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::for_deployment(Deployment::Default)
    }

    pub fn for_deployment(deployment: Deployment) -> Self {
        let s = deployment.snapshot();
        Self {
            deployment,
            fast_update_interval: s.fast_update_interval,
            permission_location: s.permission_location,
            goose_len_inches: s.goose_len_inches,
            small_box_threshold: s.small_box_threshold,
            size_setpoint: s.size_setpoint,
            center_setpoint: s.center_setpoint,
            center_in_pixels: s.center_in_pixels,
            grass_profile: s.grass_profile,
            carpet_profile: s.carpet_profile,
            rot_threshold: s.rot_threshold,
            idle_threshold: s.idle_threshold,
            max_buffer_frames: s.max_buffer_frames,
            tag: s.tag.to_string(),
            image_height: s.image_height,
            image_width: s.image_width,
        }
    }

    /// Snapshot this registry was built from.
    pub fn deployment(&self) -> Deployment {
        self.deployment
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        PARAMS.iter().map(|(name, _)| *name)
    }

    pub fn kind_of(name: &str) -> Result<ParamKind> {
        PARAMS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }

    /// Current value of `name`.
    pub fn get(&self, name: &str) -> Result<ParamValue> {
        let value = match name {
            "FAST_UPDATE_INTERVAL" => ParamValue::Long(self.fast_update_interval),
            "PERMISSION_LOCATION" => ParamValue::Int(self.permission_location),
            "GOOSE_LEN_INCHES" => ParamValue::Int(self.goose_len_inches),
            "SMALL_BOX_THRESHOLD" => ParamValue::Int(self.small_box_threshold),
            "SIZE_SETPOINT" => ParamValue::Float(self.size_setpoint),
            "CENTER_SETPOINT" => ParamValue::Float(self.center_setpoint),
            "CENTER_IN_PIXELS" => ParamValue::Float(self.center_in_pixels.into()),
            "grassProfile" => ParamValue::Profile(self.grass_profile),
            "carpetProfile" => ParamValue::Profile(self.carpet_profile),
            "ROT_THRESHOLD" => ParamValue::Long(self.rot_threshold),
            "IDLE_THRESHOLD" => ParamValue::Int(self.idle_threshold),
            "MAX_BUFFER_FRAMES" => ParamValue::Int(self.max_buffer_frames),
            "TAG" => ParamValue::Text(self.tag.clone()),
            "IMAGE_HEIGHT" => ParamValue::Int(self.image_height),
            "IMAGE_WIDTH" => ParamValue::Int(self.image_width),
            _ => return Err(Error::UnknownParameter(name.to_string())),
        };
        Ok(value)
    }

    /// Overwrite `name`, returning the previous value.
    ///
    /// The value must match the parameter's kind (after widening, see
    /// [`ParamValue::coerce`]); on error nothing changes.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<ParamValue> {
        let kind = Self::kind_of(name)?;
        let value = value.into().coerce(name, kind)?;
        let previous = self.get(name)?;

        match (name, value) {
            ("FAST_UPDATE_INTERVAL", ParamValue::Long(v)) => self.fast_update_interval = v,
            ("PERMISSION_LOCATION", ParamValue::Int(v)) => self.permission_location = v,
            ("GOOSE_LEN_INCHES", ParamValue::Int(v)) => self.goose_len_inches = v,
            ("SMALL_BOX_THRESHOLD", ParamValue::Int(v)) => self.small_box_threshold = v,
            ("SIZE_SETPOINT", ParamValue::Float(v)) => self.size_setpoint = v,
            ("CENTER_SETPOINT", ParamValue::Float(v)) => self.center_setpoint = v,
            ("CENTER_IN_PIXELS", ParamValue::Float(v)) => self.center_in_pixels = v as f32,
            ("grassProfile", ParamValue::Profile(p)) => self.grass_profile = p,
            ("carpetProfile", ParamValue::Profile(p)) => self.carpet_profile = p,
            ("ROT_THRESHOLD", ParamValue::Long(v)) => self.rot_threshold = v,
            ("IDLE_THRESHOLD", ParamValue::Int(v)) => self.idle_threshold = v,
            ("MAX_BUFFER_FRAMES", ParamValue::Int(v)) => self.max_buffer_frames = v,
            ("TAG", ParamValue::Text(v)) => self.tag = v,
            ("IMAGE_HEIGHT", ParamValue::Int(v)) => self.image_height = v,
            ("IMAGE_WIDTH", ParamValue::Int(v)) => self.image_width = v,
            (_, other) => {
                // coerce() already produced `kind`, so only a table/match drift lands here.
                return Err(Error::TypeMismatch {
                    name: name.to_string(),
                    expected: kind,
                    found: other.kind(),
                });
            }
        }

        log::debug!("{}: {} -> {}", name, previous, self.get(name)?);
        Ok(previous)
    }

    /// All parameters with their current values, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        Self::names().filter_map(move |name| self.get(name).ok().map(|v| (name, v)))
    }

    /// Parameters whose value differs from this registry's deployment snapshot.
    pub fn changed(&self) -> Vec<(&'static str, ParamValue)> {
        let baseline = Self::for_deployment(self.deployment);
        self.iter()
            .filter(|(name, value)| baseline.get(name).ok().as_ref() != Some(value))
            .collect()
    }

    pub fn drive_profile(&self, terrain: Terrain) -> DriveProfile {
        match terrain {
            Terrain::Grass => self.grass_profile,
            Terrain::Carpet => self.carpet_profile,
        }
    }

    /// Seconds between location fixes.
    pub fn fast_update_interval(&self) -> i64 {
        self.fast_update_interval
    }

    pub fn permission_location(&self) -> i32 {
        self.permission_location
    }

    pub fn goose_len_inches(&self) -> i32 {
        self.goose_len_inches
    }

    /// Minimum bounding-box area worth investigating.
    pub fn small_box_threshold(&self) -> i32 {
        self.small_box_threshold
    }

    pub fn size_setpoint(&self) -> f64 {
        self.size_setpoint
    }

    pub fn center_setpoint(&self) -> f64 {
        self.center_setpoint
    }

    pub fn center_in_pixels(&self) -> f32 {
        self.center_in_pixels
    }

    /// Nanoseconds.
    pub fn rot_threshold(&self) -> i64 {
        self.rot_threshold
    }

    pub fn idle_threshold(&self) -> i32 {
        self.idle_threshold
    }

    pub fn max_buffer_frames(&self) -> i32 {
        self.max_buffer_frames
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn image_height(&self) -> i32 {
        self.image_height
    }

    pub fn image_width(&self) -> i32 {
        self.image_width
    }
}
