//! Fixed timestep simulation tick
//!
//! Composes heartbeat, effects, scale easing, rotation, motion and eye
//! physics in a fixed order. Commands enter through [`apply`].

use log::debug;

use super::state::Simulation;
use super::{effects, eyes, heartbeat, motion};
use crate::command::Command;
use crate::consts::*;

/// Advance the simulation by one tick at wall-clock time `now`
pub fn tick(sim: &mut Simulation, now: f64) {
    let Simulation {
        config,
        state,
        rng,
        time_ticks,
    } = sim;

    *time_ticks += 1;

    state.heartbeat_pulse = heartbeat::pulse(now);

    effects::tick(state, now, config);

    // Idle breathing only while not shrunk
    if state.effects.shrink.is_none() {
        state.target_scale = 1.0 + state.heartbeat_pulse * HEARTBEAT_SCALE;
    }
    state.current_scale += (state.target_scale - state.current_scale) * SCALE_SMOOTHING;

    state.rotation_angle += state.rotation_speed;

    let hits = motion::advance(state, config.bounds, rng);
    if hits.any() {
        debug!("Wall hit at ({:.1}, {:.1})", state.pos.x, state.pos.y);
    }

    eyes::update(state);
}

/// Apply a validated command at wall-clock time `now`
pub fn apply(sim: &mut Simulation, command: &Command, now: f64) {
    effects::start(&mut sim.state, command, now, &sim.config);
}
