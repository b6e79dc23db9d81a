//! Star state and core simulation types
//!
//! Everything the tick and the effect scheduler mutate lives here.

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Display rectangle the star bounces inside (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Static simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub bounds: Bounds,
    /// Ticks per second the driver runs at
    pub tick_rate: f64,
    /// Seed for the jitter RNG
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(1280.0, 720.0),
            tick_rate: REFERENCE_TICK_RATE,
            seed: 0x5EED_57A2,
        }
    }
}

/// A single googly eye
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeState {
    /// Pupil angle in the star's local frame (radians, 0 = right, π/2 = down)
    pub angle: f64,
    /// Angular velocity (radians per tick)
    pub velocity: f64,
}

impl Default for EyeState {
    fn default() -> Self {
        Self {
            angle: FRAC_PI_2,
            velocity: 0.0,
        }
    }
}

/// Effects that can take the visible "active effect" label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Shrink,
    SpinOut,
    Drill,
    CornerTrap,
}

impl EffectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Shrink => "shrink",
            EffectKind::SpinOut => "spin_out",
            EffectKind::Drill => "drill",
            EffectKind::CornerTrap => "corner_trap",
        }
    }
}

/// An effect that simply ends at a fixed time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timed {
    pub ends_at: f64,
}

impl Timed {
    pub fn expired(&self, now: f64) -> bool {
        now >= self.ends_at
    }
}

/// Stationary fast spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drill {
    pub ends_at: f64,
    /// Free-flight velocity to restore when motion resumes
    pub saved_velocity: DVec2,
}

/// Spin-out progression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpinOut {
    /// Linear acceleration since `started_at`
    Ramp { started_at: f64 },
    /// Per-tick exponential slowdown back to default
    Decay,
}

/// Position locked near a display corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerTrap {
    pub corner: DVec2,
    pub started_at: f64,
    /// Free-flight velocity to restore when motion resumes
    pub saved_velocity: DVec2,
}

/// Independent effect records; `None` means inactive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shrink: Option<Timed>,
    pub color: Option<Timed>,
    pub opacity: Option<Timed>,
    pub drill: Option<Drill>,
    pub spin_out: Option<SpinOut>,
    pub corner_trap: Option<CornerTrap>,
}

impl ActiveEffects {
    /// The effect shown as "active": drill > spin_out > corner_trap > shrink
    pub fn primary(&self) -> Option<EffectKind> {
        if self.drill.is_some() {
            Some(EffectKind::Drill)
        } else if self.spin_out.is_some() {
            Some(EffectKind::SpinOut)
        } else if self.corner_trap.is_some() {
            Some(EffectKind::CornerTrap)
        } else if self.shrink.is_some() {
            Some(EffectKind::Shrink)
        } else {
            None
        }
    }

    /// Whether free-flight motion is suspended by drill or corner trap
    pub fn motion_suspended(&self) -> bool {
        self.drill.is_some() || self.corner_trap.is_some()
    }

    /// Velocity saved by whichever effect currently suspends motion
    pub fn saved_velocity(&self) -> Option<DVec2> {
        self.drill
            .map(|d| d.saved_velocity)
            .or(self.corner_trap.map(|t| t.saved_velocity))
    }
}

/// Complete star state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarState {
    pub pos: DVec2,
    /// Pixels per tick
    pub vel: DVec2,
    pub current_scale: f64,
    pub target_scale: f64,
    /// Accumulated degrees, never wrapped
    pub rotation_angle: f64,
    /// Degrees per tick
    pub rotation_speed: f64,
    pub color: String,
    pub opacity: f64,
    /// Derived from wall-clock phase each tick
    pub heartbeat_pulse: f64,
    pub wall_impact: f64,
    pub eyes_enabled: bool,
    pub left_eye: EyeState,
    pub right_eye: EyeState,
    pub effects: ActiveEffects,
}

impl StarState {
    /// A star resting at the center of `bounds`
    pub fn new(bounds: Bounds) -> Self {
        Self {
            pos: bounds.center(),
            vel: default_velocity(),
            current_scale: 1.0,
            target_scale: 1.0,
            rotation_angle: 0.0,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            color: DEFAULT_COLOR.to_string(),
            opacity: 1.0,
            heartbeat_pulse: 0.0,
            wall_impact: 0.0,
            eyes_enabled: false,
            left_eye: EyeState::default(),
            right_eye: EyeState::default(),
            effects: ActiveEffects::default(),
        }
    }

    /// Restore every default; position and accumulated rotation are kept
    pub fn reset(&mut self) {
        let pos = self.pos;
        let rotation_angle = self.rotation_angle;
        let heartbeat_pulse = self.heartbeat_pulse;
        *self = Self {
            pos,
            rotation_angle,
            heartbeat_pulse,
            ..Self::new(Bounds::new(0.0, 0.0))
        };
    }

    /// Label of the visible effect, if any
    pub fn effect_active(&self) -> Option<EffectKind> {
        self.effects.primary()
    }

    pub fn corner_trapped(&self) -> bool {
        self.effects.corner_trap.is_some()
    }

    /// Collision radius at the current scale
    pub fn radius(&self) -> f64 {
        STAR_BASE_SIZE * self.current_scale / 2.0
    }
}

pub fn default_velocity() -> DVec2 {
    DVec2::new(DEFAULT_VELOCITY.0, DEFAULT_VELOCITY.1)
}

/// The star plus everything needed to advance it
#[derive(Debug, Clone)]
pub struct Simulation {
    pub config: SimConfig,
    pub state: StarState,
    /// Jitter source, seeded from the config
    pub rng: Pcg32,
    /// Ticks run so far
    pub time_ticks: u64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self::with_seed(config, config.seed)
    }

    /// Create with an explicit RNG seed (reproducible jitter)
    pub fn with_seed(config: SimConfig, seed: u64) -> Self {
        Self {
            config,
            state: StarState::new(config.bounds),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
        }
    }
}
