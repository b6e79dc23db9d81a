//! DVD-style bouncing and corner-trap jitter

use glam::DVec2;
use rand::Rng;

use super::state::{Bounds, StarState};
use crate::consts::*;

/// Maximum corner-trap jitter on each axis (pixels)
pub const TRAP_JITTER: f64 = 20.0;

/// Which walls were hit during a single step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// Advance position for one tick.
///
/// Corner trap jitters around its corner, drill holds still, otherwise the
/// star moves by its velocity and bounces off the display edges.
pub fn advance<R: Rng>(state: &mut StarState, bounds: Bounds, rng: &mut R) -> WallHits {
    if let Some(trap) = state.effects.corner_trap {
        state.pos = trap.corner + jitter(rng);
        return WallHits::default();
    }
    if state.effects.drill.is_some() {
        return WallHits::default();
    }
    bounce(state, bounds)
}

fn jitter<R: Rng>(rng: &mut R) -> DVec2 {
    DVec2::new(
        rng.random_range(-TRAP_JITTER..=TRAP_JITTER),
        rng.random_range(-TRAP_JITTER..=TRAP_JITTER),
    )
}

/// Free flight with wall reflection
pub fn bounce(state: &mut StarState, bounds: Bounds) -> WallHits {
    let mut next = state.pos + state.vel;
    let radius = state.radius();
    let min = radius + WALL_PADDING;
    let max = DVec2::new(bounds.width, bounds.height) - DVec2::splat(WALL_PADDING + radius);
    let mut hits = WallHits::default();

    if next.x < min {
        state.vel.x = state.vel.x.abs();
        next.x = min;
        hits.left = true;
    } else if next.x > max.x {
        state.vel.x = -state.vel.x.abs();
        next.x = max.x;
        hits.right = true;
    }

    if next.y < min {
        state.vel.y = state.vel.y.abs();
        next.y = min;
        hits.top = true;
    } else if next.y > max.y {
        state.vel.y = -state.vel.y.abs();
        next.y = max.y;
        hits.bottom = true;
    }

    // Eye reaction impulse
    if hits.any() {
        state.wall_impact = WALL_IMPACT_IMPULSE;
    }

    state.pos = next;
    hits
}
