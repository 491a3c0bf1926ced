use glam::Vec3;

// Shared scene and tuning constants used by both web and native frontends.

// Camera
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 5.0);
pub const CAMERA_TARGET: Vec3 = Vec3::ZERO;
pub const CAMERA_FOVY_RADIANS: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_MIN_DISTANCE: f32 = 1.5;
pub const CAMERA_MAX_DISTANCE: f32 = 50.0;
pub const ORBIT_RADIANS_PER_PIXEL: f32 = 0.005;
pub const ZOOM_PER_SCROLL_LINE: f32 = 0.9; // distance factor per wheel notch

// Animation clock: time advances by 1/60 per rendered call at time scale 1.
pub const NOMINAL_FRAME_RATE: f32 = 60.0;

// Clear color (dark grey)
pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.2, 0.2, 1.0];

// Icosphere placement
pub const ICOSPHERE_RADIUS: f32 = 1.0;

// Floor square: 4x scaled quad one unit below the spheres
pub const FLOOR_POSITION: Vec3 = Vec3::new(0.0, -1.0, 0.0);
pub const FLOOR_SCALE: f32 = 4.0;

/// Per-instance look of one fireball.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceStyle {
    pub position: Vec3,
    pub color1: Vec3,
    pub color2: Vec3,
    pub blend1: f32,
    pub blend2: f32,
}

// Default palette and positions for the three fireballs (left to right)
pub const FIREBALL_INSTANCES: [InstanceStyle; 3] = [
    InstanceStyle {
        position: Vec3::new(-2.5, 0.0, 0.0),
        color1: Vec3::new(0.1, 0.1, 1.0), // blue core
        color2: Vec3::new(1.0, 2.0, 3.0),
        blend1: 1.0,
        blend2: 0.0,
    },
    InstanceStyle {
        position: Vec3::new(0.0, 0.0, 0.0),
        color1: Vec3::new(0.1, 1.0, 0.1), // green core
        color2: Vec3::new(2.0, 3.0, 1.0),
        blend1: 0.5,
        blend2: 0.0,
    },
    InstanceStyle {
        position: Vec3::new(2.5, 0.0, 0.0),
        color1: Vec3::new(1.0, 0.1, 0.1), // red core
        color2: Vec3::new(3.0, 2.0, 1.0),
        blend1: 1.0,
        blend2: 1.0,
    },
];

// Parameter panel: a large step is this many small steps
pub const PANEL_COARSE_STEP_MULTIPLIER: f32 = 10.0;

// Frame timer rolling window
pub const FRAME_TIMER_SAMPLES: usize = 120;
