//! Error types for the tuning registry.

use crate::param::ParamKind;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Name is not registered.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Type mismatch for {name}: expected {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ParamKind,
        found: ParamKind,
    },

    /// Integer does not fit the parameter's storage.
    #[error("Value {value} out of range for {name}")]
    OutOfRange { name: String, value: i64 },

    /// Text could not be parsed as the parameter's kind.
    #[error("Invalid value for {name}: {raw:?}")]
    InvalidValue { name: String, raw: String },

    #[error("Unknown deployment: {0} (expected \"default\" or \"field-tuned\")")]
    UnknownDeployment(String),

    #[error("Unknown terrain: {0} (expected \"grass\" or \"carpet\")")]
    UnknownTerrain(String),

    /// Fence has a zero extreme or an empty/inverted range.
    #[error("Invalid geofence: {0}")]
    InvalidGeofence(String),

    /// Survey produced no usable fence corners.
    #[error("Survey did not yield a usable geofence")]
    EmptySurvey,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
