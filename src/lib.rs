//! Googly Star - a bouncing star with googly eyes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, effects, eye physics)
//! - `command`: Validated control commands
//! - `store`: Shared, lock-guarded simulation handle
//! - `driver`: Fixed-rate frame loop
//! - `render`: Per-frame data handed to a renderer
//! - `api`: HTTP control surface
//! - `settings`: Runtime configuration

pub mod api;
pub mod command;
pub mod driver;
pub mod render;
pub mod settings;
pub mod sim;
pub mod store;

pub use command::{Command, CommandError};
pub use settings::Settings;
pub use store::{Health, StarStore, StatusSnapshot};

use std::f64::consts::{PI, TAU};

/// Simulation constants
pub mod consts {
    /// Reference tick rate the per-tick constants were tuned at
    pub const REFERENCE_TICK_RATE: f64 = 60.0;

    /// Sprite edge length at scale 1.0 (pixels)
    pub const STAR_BASE_SIZE: f64 = 240.0;
    /// Gap kept between the star and the display edge
    pub const WALL_PADDING: f64 = 4.0;
    /// Eye-reaction impulse recorded on a wall hit
    pub const WALL_IMPACT_IMPULSE: f64 = 0.02;
    /// Per-tick geometric decay of the wall impulse
    pub const WALL_IMPACT_DECAY: f64 = 0.85;

    pub const DEFAULT_COLOR: &str = "#c04015";
    pub const SNARKY_COLOR: &str = "#b8230e";

    /// Degrees per tick
    pub const DEFAULT_ROTATION_SPEED: f64 = 0.5;
    /// Launch velocity (pixels per tick)
    pub const DEFAULT_VELOCITY: (f64, f64) = (0.5, 0.5);

    /// Exponential easing factor of current scale toward target scale
    pub const SCALE_SMOOTHING: f64 = 0.15;
    /// Idle heartbeat swells the star by up to 8%
    pub const HEARTBEAT_SCALE: f64 = 0.08;

    /// Eye physics
    pub const EYE_GRAVITY: f64 = 0.008;
    pub const EYE_FRICTION: f64 = 0.96;
    pub const SPIN_THRESHOLD: f64 = 2.0;
    pub const CENTRIFUGAL_GAIN: f64 = 0.05;
    pub const HEARTBEAT_KICK: f64 = 0.0069;

    /// Eye geometry, relative to the scaled star
    pub const EYE_SIZE_RATIO: f64 = 0.06;
    pub const PUPIL_SIZE_RATIO: f64 = 0.5;
    pub const EYE_SPACING_RATIO: f64 = 2.5;
}

/// Wrap an angle into (-π, π]
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Current wall-clock time in seconds since the UNIX epoch
pub fn now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
