use std::fmt;

use crate::drive_profile::DriveProfile;
use crate::error::{Error, Result};

/// Semantic type of a registered parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Long,
    Float,
    Text,
    Profile,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Int => "int",
            ParamKind::Long => "long",
            ParamKind::Float => "float",
            ParamKind::Text => "string",
            ParamKind::Profile => "profile",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Int(i32),
    Long(i64),
    Float(f64),
    Text(String),
    Profile(DriveProfile),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Long(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{:?}", v),
            ParamValue::Text(v) => write!(f, "{:?}", v),
            ParamValue::Profile(p) => write!(f, "({})", p),
        }
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Long(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<DriveProfile> for ParamValue {
    fn from(v: DriveProfile) -> Self {
        ParamValue::Profile(v)
    }
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Long(_) => ParamKind::Long,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Text(_) => ParamKind::Text,
            ParamValue::Profile(_) => ParamKind::Profile,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ParamValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_profile(&self) -> Option<DriveProfile> {
        match self {
            ParamValue::Profile(p) => Some(*p),
            _ => None,
        }
    }

    /// Coerce `self` into `expected`, for parameter `name`.
    ///
    /// Only widening is allowed: int -> long, int/long -> float, and long -> int
    /// when the value fits. Anything else is a type mismatch.
    pub fn coerce(self, name: &str, expected: ParamKind) -> Result<ParamValue> {
        let found = self.kind();
        match (self, expected) {
            (v, k) if v.kind() == k => Ok(v),
            (ParamValue::Int(v), ParamKind::Long) => Ok(ParamValue::Long(v.into())),
            (ParamValue::Int(v), ParamKind::Float) => Ok(ParamValue::Float(v.into())),
            (ParamValue::Long(v), ParamKind::Float) => Ok(ParamValue::Float(v as f64)),
            (ParamValue::Long(v), ParamKind::Int) => {
                i32::try_from(v)
                    .map(ParamValue::Int)
                    .map_err(|_| Error::OutOfRange {
                        name: name.to_string(),
                        value: v,
                    })
            }
            _ => Err(Error::TypeMismatch {
                name: name.to_string(),
                expected,
                found,
            }),
        }
    }

    /// Parse command-line text as a value of `kind`.
    ///
    /// Profiles are five comma-separated numbers; text is taken verbatim.
    pub fn parse_as(name: &str, kind: ParamKind, raw: &str) -> Result<ParamValue> {
        let invalid = || Error::InvalidValue {
            name: name.to_string(),
            raw: raw.to_string(),
        };
        let trimmed = raw.trim();

        match kind {
            ParamKind::Int => {
                let v: i64 = trimmed.parse().map_err(|_| invalid())?;
                ParamValue::Long(v).coerce(name, ParamKind::Int)
            }
            ParamKind::Long => trimmed.parse().map(ParamValue::Long).map_err(|_| invalid()),
            ParamKind::Float => match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(ParamValue::Float(v)),
                _ => Err(invalid()),
            },
            ParamKind::Text => Ok(ParamValue::Text(raw.to_string())),
            ParamKind::Profile => trimmed
                .trim_start_matches('(')
                .trim_end_matches(')')
                .parse()
                .map(ParamValue::Profile)
                .map_err(|_| invalid()),
        }
    }

    /// Convert a TOML override into a value of `kind`.
    pub fn from_toml(name: &str, kind: ParamKind, value: toml::Value) -> Result<ParamValue> {
        let candidate = match value {
            toml::Value::Integer(v) => ParamValue::Long(v),
            // TOML has `nan` and `inf`; neither survives a save and reload.
            toml::Value::Float(v) if !v.is_finite() => {
                return Err(Error::InvalidValue {
                    name: name.to_string(),
                    raw: v.to_string(),
                });
            }
            toml::Value::Float(v) => ParamValue::Float(v),
            toml::Value::String(v) => ParamValue::Text(v),
            other => {
                let profile: DriveProfile = other.try_into().map_err(|_| Error::InvalidValue {
                    name: name.to_string(),
                    raw: "non-scalar TOML value".to_string(),
                })?;
                ParamValue::Profile(profile)
            }
        };
        candidate.coerce(name, kind)
    }

    /// Inverse of [`ParamValue::from_toml`].
    pub fn to_toml(&self) -> Result<toml::Value> {
        Ok(match self {
            ParamValue::Int(v) => toml::Value::Integer((*v).into()),
            ParamValue::Long(v) => toml::Value::Integer(*v),
            ParamValue::Float(v) => toml::Value::Float(*v),
            ParamValue::Text(v) => toml::Value::String(v.clone()),
            ParamValue::Profile(p) => toml::Value::try_from(p)?,
        })
    }
}
