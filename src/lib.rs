pub mod config;
pub mod defaults;
pub mod drive_profile;
pub mod error;
pub mod fetch;
pub mod geofence;
pub mod param;
pub mod position;
pub mod registry;

// Re-export commonly used types
pub use drive_profile::{DriveProfile, Terrain};
pub use error::{Error, Result};
pub use geofence::Geofence;
pub use param::{ParamKind, ParamValue};
pub use position::Position;
pub use registry::{Deployment, Registry};
