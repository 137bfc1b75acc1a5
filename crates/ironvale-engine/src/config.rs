//! Runner configuration.
//!
//! Loaded from a TOML file. Missing or broken files fall back to defaults with
//! a warning so the runner always starts.

use std::fs;
use std::path::{Path, PathBuf};

use ironvale_common::{ConfigError, TILE_SIZE};
use ironvale_gameplay::CombatTuning;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "ironvale.toml";

/// Headless runner parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Run ===
    /// Random seed (None = from entropy)
    pub seed: Option<u64>,
    /// Number of ticks to simulate
    pub ticks: u64,
    /// Log a running summary every this many ticks (0 = only at the end)
    pub log_summary_every: u64,
    /// Continue from this snapshot instead of a fresh arena
    pub resume_from: Option<PathBuf>,
    /// Write a snapshot here when the run ends
    pub checkpoint_to: Option<PathBuf>,

    // === World ===
    /// Tile edge length in pixels
    pub tile_size: f32,

    // === Balance ===
    /// Per-type combat tables
    pub tuning: CombatTuning,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            ticks: 3600, // one minute at 60 Hz
            log_summary_every: 600,
            resume_from: None,
            checkpoint_to: None,
            tile_size: TILE_SIZE,
            tuning: CombatTuning::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}; using defaults");
                Self::default()
            },
        }
    }

    /// Load configuration, reporting why it failed.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Access {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let access = |e: std::io::Error| ConfigError::Access {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(access)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(path, contents).map_err(access)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.ticks = self.ticks.clamp(1, 1_000_000);
        if !self.tile_size.is_finite() {
            self.tile_size = TILE_SIZE;
        }
        self.tile_size = self.tile_size.clamp(4.0, 64.0);

        let effects = &mut self.tuning.effects;
        effects.max_particles = effects.max_particles.min(4096);
        effects.max_pickups = effects.max_pickups.min(1024);
        effects.burst_count = effects.burst_count.min(64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.ticks, 3600);
        assert_eq!(config.tile_size, 16.0);
        assert_eq!(config.tuning.duelist.health, 6);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.ticks = 0;
        config.tile_size = f32::NAN;
        config.tuning.effects.max_particles = 1_000_000;

        config.validate();

        assert_eq!(config.ticks, 1);
        assert_eq!(config.tile_size, 16.0);
        assert_eq!(config.tuning.effects.max_particles, 4096);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("ironvale.toml");

        let mut config = EngineConfig::default();
        config.seed = Some(12345);
        config.ticks = 900;
        config.tuning.duelist.health = 9;
        config.tuning.lobber.wait_after_shot = 90;
        config.checkpoint_to = Some(temp_dir.path().join("end.ivsn"));

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(&config_path, "ticks = 120\n\n[tuning.pikeman]\nmarch_speed = 2.0\n")
            .expect("write");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.ticks, 120);
        assert_eq!(loaded.tuning.pikeman.march_speed, 2.0);
        assert_eq!(loaded.tuning.pikeman.slide_speed, 0.8);
        assert_eq!(loaded.log_summary_every, 600);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/ironvale.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_broken_file_reports_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "ticks = \"lots\"").expect("write");

        assert!(matches!(
            EngineConfig::try_load_from(&config_path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(EngineConfig::load_from(&config_path), EngineConfig::default());
    }
}
