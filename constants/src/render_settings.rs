use bevy::math::Vec3;

/// Initial camera position; the camera looks at `CAMERA_FOCUS`.
pub const CAMERA_START_POSITION: Vec3 = Vec3::new(0.0, 2.0, 5.0);
pub const CAMERA_FOCUS: Vec3 = Vec3::ZERO;

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Fraction of the pending orbit motion applied each frame.
pub const ORBIT_DAMPING_FACTOR: f32 = 0.25;
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_ZOOM_SPEED: f32 = 1.0;
pub const ORBIT_PAN_SPEED: f32 = 1.0;
pub const ORBIT_MIN_DISTANCE: f32 = 0.05;
pub const ORBIT_MAX_DISTANCE: f32 = 500.0;

/// Model scale while the zoom flag is clear and while it is set.
pub const MODEL_NORMAL_SCALE: f32 = 1.0;
pub const MODEL_ZOOMED_SCALE: f32 = 2.0;

pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(5.0, 10.0, 7.5);
pub const KEY_LIGHT_ILLUMINANCE: f32 = 10_000.0;
pub const SHADOW_MAP_SIZE: usize = 1024;
pub const SHADOW_NEAR: f32 = 0.5;
pub const SHADOW_FAR: f32 = 50.0;

/// Ambient fill colour, `#404040`.
pub const AMBIENT_COLOUR: [u8; 3] = [0x40, 0x40, 0x40];
pub const AMBIENT_BRIGHTNESS: f32 = 400.0;

/// Edge length of each cube face built from the equirectangular panorama.
pub const ENVIRONMENT_FACE_SIZE: u32 = 512;
pub const ENVIRONMENT_MIN_FACE_SIZE: u32 = 16;
pub const SKYBOX_BRIGHTNESS: f32 = 1000.0;
pub const ENVIRONMENT_LIGHT_INTENSITY: f32 = 900.0;

/// Seconds between frame-rate notifications sent to the host page.
pub const FPS_NOTIFY_INTERVAL: f32 = 0.5;
