//! Fixed-rate frame loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{info, warn};

use crate::render::FrameSink;
use crate::store::StarStore;

/// How far behind schedule the loop may fall before re-anchoring
pub const MAX_LAG_TICKS: u32 = 8;

/// Tick the store and present a frame at its configured rate until `stop`
/// is set. The stop flag is only checked between ticks.
///
/// Returns the number of ticks run. A failing sink ends the loop.
pub fn run(store: &StarStore, sink: &mut dyn FrameSink, stop: &AtomicBool) -> Result<u64> {
    let tick_rate = store.config().tick_rate;
    let interval = Duration::from_secs_f64(1.0 / tick_rate);
    info!("Frame loop running at {tick_rate} ticks/s");

    let mut ticks = 0u64;
    let mut next = Instant::now();
    while !stop.load(Ordering::Acquire) {
        let frame = store.tick();
        sink.present(&frame)?;
        ticks += 1;

        next += interval;
        let now = Instant::now();
        if let Some(wait) = next.checked_duration_since(now) {
            thread::sleep(wait);
        } else if now.duration_since(next) > interval * MAX_LAG_TICKS {
            warn!("Frame loop fell behind, skipping ahead");
            next = now;
        }
    }

    info!("Frame loop stopped after {ticks} ticks");
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FrameView, LogSink};
    use crate::sim::{SimConfig, Simulation};
    use std::sync::Arc;

    fn fast_store() -> StarStore {
        let config = SimConfig {
            tick_rate: 240.0,
            ..Default::default()
        };
        StarStore::from_simulation(Simulation::with_seed(config, 1))
    }

    /// Stops the loop after a fixed number of frames
    struct StopAfter<'a> {
        remaining: u32,
        stop: &'a AtomicBool,
    }

    impl FrameSink for StopAfter<'_> {
        fn present(&mut self, _frame: &FrameView) -> Result<()> {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.stop.store(true, Ordering::Release);
            }
            Ok(())
        }
    }

    struct Broken;

    impl FrameSink for Broken {
        fn present(&mut self, _frame: &FrameView) -> Result<()> {
            anyhow::bail!("display lost")
        }
    }

    #[test]
    fn test_stops_after_current_tick() {
        let store = fast_store();
        let stop = AtomicBool::new(false);
        let mut sink = StopAfter {
            remaining: 5,
            stop: &stop,
        };
        let ticks = run(&store, &mut sink, &stop).unwrap();
        assert_eq!(ticks, 5);
        assert_eq!(store.with(|sim| sim.time_ticks), 5);
    }

    #[test]
    fn test_sink_failure_is_fatal() {
        let store = fast_store();
        let stop = AtomicBool::new(false);
        let err = run(&store, &mut Broken, &stop).unwrap_err();
        assert_eq!(err.to_string(), "display lost");
        assert_eq!(store.with(|sim| sim.time_ticks), 1);
    }

    #[test]
    fn test_stop_from_another_thread() {
        let store = fast_store();
        let stop = Arc::new(AtomicBool::new(false));
        let stopper = {
            let stop = stop.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                stop.store(true, Ordering::Release);
            })
        };
        let mut sink = LogSink::new(10);
        let ticks = run(&store, &mut sink, &stop).unwrap();
        stopper.join().unwrap();
        assert!(ticks > 0);
        assert_eq!(sink.frames(), ticks);
    }
}
