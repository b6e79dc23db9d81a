//! Shared, lock-guarded simulation handle
//!
//! The frame driver and any number of command submitters share one
//! [`StarStore`]. Every read and write goes through the same mutex and
//! finishes synchronously while holding it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::now_secs;
use crate::render::FrameView;
use crate::sim::{self, SimConfig, Simulation};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

/// Point-in-time copy of the star for external reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub position: Position,
    pub velocity: Velocity,
    pub scale: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub color: String,
    pub opacity: f64,
    pub effect_active: Option<String>,
    pub corner_trapped: bool,
    pub eyes_enabled: bool,
    pub heartbeat_pulse: f64,
    pub wall_impact: f64,
    pub display_size: DisplaySize,
}

impl StatusSnapshot {
    fn of(sim: &Simulation) -> Self {
        let state = &sim.state;
        Self {
            position: Position {
                x: state.pos.x,
                y: state.pos.y,
            },
            velocity: Velocity {
                vx: state.vel.x,
                vy: state.vel.y,
            },
            scale: state.current_scale,
            rotation: state.rotation_angle,
            rotation_speed: state.rotation_speed,
            color: state.color.clone(),
            opacity: state.opacity,
            effect_active: state.effect_active().map(|e| e.as_str().to_string()),
            corner_trapped: state.corner_trapped(),
            eyes_enabled: state.eyes_enabled,
            heartbeat_pulse: state.heartbeat_pulse,
            wall_impact: state.wall_impact,
            display_size: DisplaySize {
                width: sim.config.bounds.width,
                height: sim.config.bounds.height,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub running: bool,
}

/// Cloneable handle to the one simulation
#[derive(Debug, Clone)]
pub struct StarStore {
    sim: Arc<Mutex<Simulation>>,
    running: Arc<AtomicBool>,
}

impl StarStore {
    pub fn new(config: SimConfig) -> Self {
        Self::from_simulation(Simulation::new(config))
    }

    pub fn from_simulation(sim: Simulation) -> Self {
        Self {
            sim: Arc::new(Mutex::new(sim)),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The state is plain data and every critical section is complete, so a
    /// panic elsewhere never leaves it half-written.
    fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.sim.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn manipulate(&self, command: &Command) {
        self.manipulate_at(command, now_secs());
    }

    pub fn manipulate_at(&self, command: &Command, now: f64) {
        sim::apply(&mut self.lock(), command, now);
    }

    /// Advance one tick and return the frame to draw
    pub fn tick(&self) -> FrameView {
        self.tick_at(now_secs())
    }

    pub fn tick_at(&self, now: f64) -> FrameView {
        let mut sim = self.lock();
        sim::tick(&mut sim, now);
        FrameView::from_state(&sim.state)
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot::of(&self.lock())
    }

    pub fn config(&self) -> SimConfig {
        self.lock().config
    }

    pub fn health(&self) -> Health {
        Health {
            running: self.running.load(Ordering::Acquire),
        }
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    /// Run `f` against the simulation while holding the lock
    pub fn with<T>(&self, f: impl FnOnce(&Simulation) -> T) -> T {
        f(&self.lock())
    }
}
