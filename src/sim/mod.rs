//! Deterministic simulation module
//!
//! All star behavior lives here. This module must stay pure:
//! - Time is passed in, never read
//! - Seeded RNG only
//! - No rendering, locking or platform dependencies

pub mod effects;
pub mod eyes;
pub mod heartbeat;
pub mod motion;
pub mod state;
pub mod tick;

pub use effects::{nearest_corner, spin_out_decay, trap_corners};
pub use motion::WallHits;
pub use state::{
    ActiveEffects, Bounds, CornerTrap, Drill, EffectKind, EyeState, SimConfig, Simulation, SpinOut,
    StarState, Timed,
};
pub use tick::{apply, tick};
