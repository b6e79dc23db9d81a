//! QRS-style heartbeat pulse
//!
//! A 4 second cycle: a full half-sine beat over the first 12.5%, a quarter
//! strength echo over the next 7.5%, then silence.

use std::f64::consts::PI;

pub const CYCLE_SECS: f64 = 4.0;
const QRS_END: f64 = 0.125;
const T_WAVE_END: f64 = 0.2;
const T_WAVE_AMPLITUDE: f64 = 0.25;

/// Pulse strength in [0, 1] at wall-clock time `now` (seconds)
pub fn pulse(now: f64) -> f64 {
    let phase = now.rem_euclid(CYCLE_SECS) / CYCLE_SECS;
    if phase < QRS_END {
        (phase / QRS_END * PI).sin()
    } else if phase < T_WAVE_END {
        ((phase - QRS_END) / (T_WAVE_END - QRS_END) * PI).sin() * T_WAVE_AMPLITUDE
    } else {
        0.0
    }
}
