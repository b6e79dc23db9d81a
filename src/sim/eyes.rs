//! Googly eye physics
//!
//! Each pupil is a damped angular spring. Forces are recomputed from the
//! star's current rotation every tick; nothing besides angle and velocity
//! is carried between ticks.

use std::f64::consts::{FRAC_PI_2, PI};

use super::state::{EyeState, StarState};
use crate::consts::*;
use crate::normalize_angle;

/// Local pupil angles the centrifugal pull points at
const LEFT_OUTWARD: f64 = PI;
const RIGHT_OUTWARD: f64 = 0.0;

/// Per-tick forcing shared by both eyes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeForces {
    /// Local angle that points at world "down"
    pub gravity_target: f64,
    /// Centrifugal gain (0 below the spin threshold)
    pub centrifugal: f64,
    /// Shared full-body jostle subtracted from both pupils
    pub kick: f64,
}

impl EyeForces {
    pub fn from_state(state: &StarState) -> Self {
        let rotation = state.rotation_angle.to_radians();
        let spin = state.rotation_speed.abs();
        Self {
            gravity_target: FRAC_PI_2 - rotation,
            centrifugal: if spin > SPIN_THRESHOLD {
                spin * CENTRIFUGAL_GAIN
            } else {
                0.0
            },
            kick: state.heartbeat_pulse * HEARTBEAT_KICK + state.wall_impact,
        }
    }
}

/// Advance a single eye toward its targets
pub fn step_eye(eye: &mut EyeState, forces: &EyeForces, outward_target: f64) {
    let gravity_diff = normalize_angle(forces.gravity_target - eye.angle);
    let centrifugal_diff = normalize_angle(outward_target - eye.angle);

    eye.velocity += gravity_diff * EYE_GRAVITY + centrifugal_diff * forces.centrifugal;
    eye.velocity -= forces.kick;
    eye.velocity *= EYE_FRICTION;
    eye.angle += eye.velocity;
}

/// Advance both eyes. No-op while eyes are disabled.
pub fn update(state: &mut StarState) {
    if !state.eyes_enabled {
        return;
    }
    let forces = EyeForces::from_state(state);
    step_eye(&mut state.left_eye, &forces, LEFT_OUTWARD);
    step_eye(&mut state.right_eye, &forces, RIGHT_OUTWARD);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bounds;

    fn star() -> StarState {
        let mut state = StarState::new(Bounds::new(800.0, 600.0));
        state.eyes_enabled = true;
        state
    }

    #[test]
    fn test_resting_eye_stays_put() {
        let mut state = star();
        state.rotation_speed = 0.0;
        update(&mut state);
        assert_eq!(state.left_eye, EyeState::default());
        assert_eq!(state.right_eye, EyeState::default());
    }

    #[test]
    fn test_disabled_eyes_do_not_move() {
        let mut state = star();
        state.eyes_enabled = false;
        state.rotation_angle = 90.0;
        update(&mut state);
        assert_eq!(state.left_eye, EyeState::default());
    }

    #[test]
    fn test_gravity_pulls_toward_world_down() {
        let mut state = star();
        // Star turned 90°: world down is local angle 0
        state.rotation_angle = 90.0;
        state.rotation_speed = 0.0;
        for _ in 0..2000 {
            update(&mut state);
        }
        assert!(normalize_angle(state.left_eye.angle).abs() < 1e-3);
        assert!(normalize_angle(state.right_eye.angle).abs() < 1e-3);
    }

    #[test]
    fn test_centrifugal_splits_pupils_outward() {
        let mut state = star();
        state.rotation_speed = 10.0;
        let forces = EyeForces::from_state(&state);
        assert!((forces.centrifugal - 0.5).abs() < 1e-12);

        // Pupils start at π/2: left pulled toward π, right toward 0
        update(&mut state);
        assert!(state.left_eye.velocity > 0.0);
        assert!(state.right_eye.velocity < 0.0);
    }

    #[test]
    fn test_no_centrifugal_below_threshold() {
        let mut state = star();
        state.rotation_speed = -SPIN_THRESHOLD;
        assert_eq!(EyeForces::from_state(&state).centrifugal, 0.0);
    }

    #[test]
    fn test_kick_hits_both_eyes_equally() {
        let mut state = star();
        state.rotation_speed = 0.0;
        state.heartbeat_pulse = 1.0;
        state.wall_impact = WALL_IMPACT_IMPULSE;
        update(&mut state);

        let expected = -(HEARTBEAT_KICK + WALL_IMPACT_IMPULSE) * EYE_FRICTION;
        assert!((state.left_eye.velocity - expected).abs() < 1e-15);
        assert!((state.right_eye.velocity - expected).abs() < 1e-15);
        assert!((state.left_eye.angle - (FRAC_PI_2 + expected)).abs() < 1e-15);
    }
}
