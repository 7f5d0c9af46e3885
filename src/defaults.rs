use crate::drive_profile::DriveProfile;

/// Values every deployment starts from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub fast_update_interval: i64,
    pub permission_location: i32,
    pub goose_len_inches: i32,
    pub small_box_threshold: i32,
    pub size_setpoint: f64,
    pub center_setpoint: f64,
    pub center_in_pixels: f32,
    pub grass_profile: DriveProfile,
    pub carpet_profile: DriveProfile,
    pub rot_threshold: i64,
    pub idle_threshold: i32,
    pub max_buffer_frames: i32,
    pub tag: &'static str,
    pub image_height: i32,
    pub image_width: i32,
}

// ** GPS CONFIGURATION ** //

/// Seconds between location fixes.
const FAST_UPDATE_INTERVAL: i64 = 5;
/// Host permission request code for location access.
const PERMISSION_LOCATION: i32 = 99;

// ** PID CONFIGURATION ** //
// Very dependent on the environment.

/// Reference length of the chased object, used to convert pixels to inches.
const GOOSE_LEN_INCHES: i32 = 27;
/// Was 60000.0; raised for chasing.
const SIZE_SETPOINT: f64 = 100000.0;
const CENTER_SETPOINT: f64 = 0.0;
const CENTER_IN_PIXELS: f32 = 340.0;

const CARPET_PROFILE: DriveProfile = DriveProfile::new(0.0001, 0.000000001, 0.0075, 0.2, 0.1);

// ** ROTATION CONFIGURATION ** //

/// Nanoseconds.
const ROT_THRESHOLD: i64 = 1_000_000_000;

// ** INTERPOLATION CONFIGURATION ** //
const MAX_BUFFER_FRAMES: i32 = 7;

// ** DEBUG CONFIGURATION ** //
const TAG: &str = "MLKit-ODT";

// ** IMAGE CONFIGURATION ** //
// As reported by the bitmap. IMAGE_HEIGHT is X and acts as width downstream,
// IMAGE_WIDTH is Y and acts as height.
const IMAGE_HEIGHT: i32 = 640;
const IMAGE_WIDTH: i32 = 480;

/// Outdoor testing values. Indoor testing used a box threshold of 1700.
pub const DEFAULT: Snapshot = Snapshot {
    fast_update_interval: FAST_UPDATE_INTERVAL,
    permission_location: PERMISSION_LOCATION,
    goose_len_inches: GOOSE_LEN_INCHES,
    small_box_threshold: 2100,
    size_setpoint: SIZE_SETPOINT,
    center_setpoint: CENTER_SETPOINT,
    center_in_pixels: CENTER_IN_PIXELS,
    grass_profile: DriveProfile::new(0.001, 0.000000001, 0.08, 0.5, 0.75),
    carpet_profile: CARPET_PROFILE,
    rot_threshold: ROT_THRESHOLD,
    idle_threshold: 20000,
    max_buffer_frames: MAX_BUFFER_FRAMES,
    tag: TAG,
    image_height: IMAGE_HEIGHT,
    image_width: IMAGE_WIDTH,
};

/// Retuned on site: larger boxes, quicker idle rotation, gentler grass threshold.
pub const FIELD_TUNED: Snapshot = Snapshot {
    small_box_threshold: 17000,
    grass_profile: DriveProfile::new(0.001, 0.000000001, 0.08, 0.2, 0.75),
    idle_threshold: 200,
    ..DEFAULT
};
