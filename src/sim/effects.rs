//! Effect scheduler
//!
//! Starts, cancels and expires timed effects. Drill and spin-out both drive
//! `rotation_speed` and cancel each other; drill and corner trap both
//! suspend free motion and share one saved velocity.

use glam::DVec2;
use log::info;

use super::state::{Bounds, CornerTrap, Drill, SimConfig, SpinOut, StarState, Timed};
use crate::command::Command;
use crate::consts::*;

pub const SHRINK_SCALE: f64 = 0.2;
pub const SHRINK_SECS: f64 = 15.0;
pub const COLOR_SECS: f64 = 15.0;
pub const OPACITY_SECS: f64 = 15.0;

pub const DRILL_SECS: f64 = 3.0;
pub const DRILL_ROTATION_SPEED: f64 = 10.0;

pub const SPIN_OUT_START_SPEED: f64 = 1.0;
/// Degrees per tick gained per second of ramp
pub const SPIN_OUT_RAMP_RATE: f64 = 5.0;
pub const SPIN_OUT_RAMP_SECS: f64 = 2.0;
/// Per-tick decay at the reference tick rate
pub const SPIN_OUT_DECAY_AT_REFERENCE: f64 = 0.992;
pub const SPIN_OUT_STOP_SPEED: f64 = 0.1;

pub const CORNER_TRAP_SECS: f64 = 10.0;
pub const CORNER_INSET: f64 = 50.0;

/// Spin-out decay factor per tick at `tick_rate`
///
/// Keeps the wall-clock decay rate of 0.992 per tick at 60 ticks/s.
pub fn spin_out_decay(tick_rate: f64) -> f64 {
    SPIN_OUT_DECAY_AT_REFERENCE.powf(REFERENCE_TICK_RATE / tick_rate)
}

/// The four trap corners, in tie-break order: top-left, top-right,
/// bottom-left, bottom-right
pub fn trap_corners(bounds: Bounds) -> [DVec2; 4] {
    let (w, h) = (bounds.width, bounds.height);
    [
        DVec2::new(CORNER_INSET, CORNER_INSET),
        DVec2::new(w - CORNER_INSET, CORNER_INSET),
        DVec2::new(CORNER_INSET, h - CORNER_INSET),
        DVec2::new(w - CORNER_INSET, h - CORNER_INSET),
    ]
}

/// Corner closest to `pos`; the earliest corner wins ties
pub fn nearest_corner(pos: DVec2, bounds: Bounds) -> DVec2 {
    let corners = trap_corners(bounds);
    let mut nearest = corners[0];
    let mut best = pos.distance(nearest);
    for corner in &corners[1..] {
        let dist = pos.distance(*corner);
        if dist < best {
            best = dist;
            nearest = *corner;
        }
    }
    nearest
}

/// Apply a validated command at time `now`
pub fn start(state: &mut StarState, command: &Command, now: f64, config: &SimConfig) {
    match command {
        Command::Shrink => {
            state.target_scale = SHRINK_SCALE;
            state.effects.shrink = Some(Timed {
                ends_at: now + SHRINK_SECS,
            });
            info!("Shrinking star for {SHRINK_SECS} seconds");
        }
        Command::SpinOut => {
            cancel_drill(state);
            cancel_spin_out(state);
            state.rotation_speed = SPIN_OUT_START_SPEED;
            state.effects.spin_out = Some(SpinOut::Ramp { started_at: now });
            info!("Starting spin out (ramp phase)");
        }
        Command::Drill => {
            cancel_spin_out(state);
            let saved_velocity = suspend_motion(state);
            state.rotation_speed = DRILL_ROTATION_SPEED;
            state.effects.drill = Some(Drill {
                ends_at: now + DRILL_SECS,
                saved_velocity,
            });
            info!("Starting drill for {DRILL_SECS} seconds");
        }
        Command::CornerTrap => {
            let corner = nearest_corner(state.pos, config.bounds);
            let saved_velocity = suspend_motion(state);
            state.effects.corner_trap = Some(CornerTrap {
                corner,
                started_at: now,
                saved_velocity,
            });
            info!(
                "Trapped in corner at ({}, {}) for {CORNER_TRAP_SECS} seconds",
                corner.x, corner.y
            );
        }
        Command::Color(color) => {
            state.color = color.clone();
            state.effects.color = Some(Timed {
                ends_at: now + COLOR_SECS,
            });
            info!("Changed color to {color} for {COLOR_SECS} seconds");
        }
        Command::Opacity(opacity) => {
            state.opacity = opacity.clamp(0.0, 1.0);
            state.effects.opacity = Some(Timed {
                ends_at: now + OPACITY_SECS,
            });
            info!("Changed opacity to {} for {OPACITY_SECS} seconds", state.opacity);
        }
        Command::GooglyEyes(enabled) => {
            state.eyes_enabled = *enabled;
            info!(
                "Googly eyes: {}",
                if *enabled { "enabled" } else { "disabled" }
            );
        }
        Command::Reset => {
            state.reset();
            info!("Reset to default state");
        }
    }
}

/// Advance and expire effects. Runs once per tick before motion.
pub fn tick(state: &mut StarState, now: f64, config: &SimConfig) {
    state.wall_impact *= WALL_IMPACT_DECAY;

    if state.effects.shrink.is_some_and(|t| t.expired(now)) {
        state.effects.shrink = None;
        state.target_scale = 1.0;
        info!("Shrink expired");
    }

    if state.effects.color.is_some_and(|t| t.expired(now)) {
        state.effects.color = None;
        state.color = DEFAULT_COLOR.to_string();
        info!("Color expired");
    }

    if state.effects.opacity.is_some_and(|t| t.expired(now)) {
        state.effects.opacity = None;
        state.opacity = 1.0;
        info!("Opacity expired");
    }

    if state.effects.drill.is_some_and(|d| now >= d.ends_at) {
        cancel_drill(state);
        info!("Drill expired");
    }

    if state
        .effects
        .corner_trap
        .is_some_and(|t| now - t.started_at >= CORNER_TRAP_SECS)
    {
        release_corner_trap(state);
        info!("Corner trap expired");
    }

    match state.effects.spin_out {
        Some(SpinOut::Ramp { started_at }) => {
            let elapsed = now - started_at;
            if elapsed < SPIN_OUT_RAMP_SECS {
                state.rotation_speed = SPIN_OUT_START_SPEED + elapsed * SPIN_OUT_RAMP_RATE;
            } else {
                state.effects.spin_out = Some(SpinOut::Decay);
            }
        }
        Some(SpinOut::Decay) => {
            state.rotation_speed *= spin_out_decay(config.tick_rate);
            if state.rotation_speed < SPIN_OUT_STOP_SPEED {
                state.rotation_speed = DEFAULT_ROTATION_SPEED;
                state.effects.spin_out = None;
                info!("Spin out finished");
            }
        }
        None => {}
    }
}

/// Zero velocity and return the free-flight velocity to restore later.
///
/// When motion is already suspended the previously saved velocity is reused.
fn suspend_motion(state: &mut StarState) -> DVec2 {
    let saved = state.effects.saved_velocity().unwrap_or(state.vel);
    state.vel = DVec2::ZERO;
    saved
}

/// Restore the saved velocity unless the other suspender is still active
fn resume_motion(state: &mut StarState, saved: DVec2) {
    if !state.effects.motion_suspended() {
        state.vel = saved;
    }
}

fn cancel_drill(state: &mut StarState) {
    if let Some(drill) = state.effects.drill.take() {
        state.rotation_speed = DEFAULT_ROTATION_SPEED;
        resume_motion(state, drill.saved_velocity);
    }
}

fn cancel_spin_out(state: &mut StarState) {
    if state.effects.spin_out.take().is_some() {
        state.rotation_speed = DEFAULT_ROTATION_SPEED;
    }
}

fn release_corner_trap(state: &mut StarState) {
    if let Some(trap) = state.effects.corner_trap.take() {
        resume_motion(state, trap.saved_velocity);
    }
}
