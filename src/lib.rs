//! Quake City - procedural city blocks shaken by a frame-stepped earthquake
//!
//! Core modules:
//! - `sim`: Simulation core (city generation, ground, debris, seismic response)
//! - `settings`: Data-driven configuration, loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{Settings, ShakeBaseline};
pub use sim::{FrameInput, SimContext, SimEvent, step, tick};

/// Simulation constants
pub mod consts {
    /// Driver frame delta (60 Hz, one seismic step per frame)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// City grid defaults
    pub const GRID_SIZE: u32 = 10;
    pub const GRID_SPACING: f32 = 8.0;
    /// Building height range [min, max)
    pub const BUILDING_MIN_HEIGHT: f32 = 5.0;
    pub const BUILDING_MAX_HEIGHT: f32 = 20.0;
    /// Building footprint range (width and depth) [min, max)
    pub const BUILDING_MIN_EXTENT: f32 = 3.0;
    pub const BUILDING_MAX_EXTENT: f32 = 6.0;

    /// Window layout
    pub const WINDOW_SIZE: f32 = 0.5;
    pub const WINDOW_SPACING: f32 = 1.0;
    /// Distance a window sits proud of its face (avoids z-fighting)
    pub const WINDOW_INSET: f32 = 0.01;
    /// Probability a window slot is lit
    pub const WINDOW_LIT_CHANCE: f64 = 0.7;

    /// Ground plane
    pub const GROUND_SIZE: f32 = 500.0;
    pub const GROUND_SEGMENTS: u32 = 100;
    /// Vertices at or beyond this |x| or |z| never shake
    pub const GROUND_SHAKE_EDGE: f32 = 100.0;
    pub const CRACK_RADIUS: f32 = 20.0;
    pub const CRACK_FREQUENCY: f32 = 0.5;
    pub const CRACK_DEPTH: f32 = 2.0;
    pub const GROUND_SHAKE_AMPLITUDE: f32 = 0.2;

    /// Earthquake timing (frames)
    pub const QUAKE_MAX_DURATION: u32 = 300;
    pub const QUAKE_RAMP_UP_FRACTION: f32 = 0.2;
    pub const QUAKE_RAMP_DOWN_FRACTION: f32 = 0.8;
    pub const QUAKE_INTENSITY_STEP: f32 = 0.02;

    /// Building response
    pub const BUILDING_SHAKE_AMPLITUDE: f32 = 0.5;
    pub const BUILDING_TILT_AMPLITUDE: f32 = 0.05; // radians
    /// Collapse rolls start after this many quake frames
    pub const COLLAPSE_ONSET_FRAMES: u32 = 50;
    /// Per-frame collapse chance, scaled by intensity
    pub const COLLAPSE_CHANCE: f32 = 0.001;
    pub const COLLAPSE_DROP_PER_FRAME: f32 = 0.2;
    pub const COLLAPSE_TILT_PER_FRAME: f32 = 0.01;
    /// Chance a collapsing building throws debris on a given frame
    pub const DEBRIS_CHANCE: f64 = 0.3;

    /// Debris emitters
    pub const DEBRIS_PARTICLES: usize = 100;
    pub const DEBRIS_LIFETIME: u32 = 100;
    /// Spawn box half-width in X/Z and height in Y
    pub const DEBRIS_SPREAD: f32 = 2.5;
    pub const DEBRIS_RISE: f32 = 2.0;
    /// Initial velocity bounds: ±lateral in X/Z, [0, up) in Y
    pub const DEBRIS_LATERAL_SPEED: f32 = 0.1;
    pub const DEBRIS_UP_SPEED: f32 = 0.5;
    pub const DEBRIS_GRAVITY: f32 = 0.01;
}

/// Phase term for the time-driven shake waves.
///
/// `time_ms` is simulation-local elapsed time in milliseconds; the sum is taken
/// in f64 so long runs do not lose precision before the sine.
#[inline]
pub fn wave(time_ms: f64, rate: f64, offset: f32) -> f32 {
    (time_ms * rate + offset as f64).sin() as f32
}
