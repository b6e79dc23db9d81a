//! Runtime settings
//!
//! Defaults, optionally overlaid by a JSON file, then by command-line flags.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::consts::REFERENCE_TICK_RATE;
use crate::sim::{Bounds, SimConfig};

/// Highest tick rate the driver accepts
pub const MAX_TICK_RATE: f64 = 240.0;

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub width: f64,
    pub height: f64,

    // === Control surface ===
    pub host: IpAddr,
    pub port: u16,

    // === Simulation ===
    /// Ticks per second
    pub tick_rate: f64,
    /// Jitter RNG seed
    pub seed: u64,

    // === Logging ===
    /// Log a frame summary every N frames
    pub log_every: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self {
            width: sim.bounds.width,
            height: sim.bounds.height,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 9099,
            tick_rate: REFERENCE_TICK_RATE,
            seed: sim.seed,
            log_every: 300,
        }
    }
}

impl Settings {
    /// Load from a JSON file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            bail!("display size must be positive, got {}x{}", self.width, self.height);
        }
        if !(1.0..=MAX_TICK_RATE).contains(&self.tick_rate) {
            bail!("tick rate must be within 1..={MAX_TICK_RATE}, got {}", self.tick_rate);
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            bounds: Bounds::new(self.width, self.height),
            tick_rate: self.tick_rate,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.addr().to_string(), "127.0.0.1:9099");
        assert_eq!(settings.sim_config(), SimConfig::default());
    }

    #[test]
    fn test_host_can_open_to_network() {
        let settings: Settings = serde_json::from_str(r#"{"host": "0.0.0.0"}"#).unwrap();
        settings.validate().unwrap();
        assert_eq!(settings.addr().to_string(), "0.0.0.0:9099");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"port": 8080, "tick_rate": 120}"#).unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.tick_rate, 120.0);
        assert_eq!(settings.width, 1280.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings {
            width: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        settings.width = 800.0;
        settings.tick_rate = 0.5;
        assert!(settings.validate().is_err());

        settings.tick_rate = 1000.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("googly-star-settings-{}.json", std::process::id()));
        fs::write(&path, r#"{"width": 1920, "height": 1080, "seed": 42}"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(settings.sim_config().bounds, Bounds::new(1920.0, 1080.0));
        assert_eq!(settings.seed, 42);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let err = Settings::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read settings"));
    }
}
