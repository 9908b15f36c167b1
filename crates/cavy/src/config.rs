//! Habitat configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `cavy.ron` file (if exists)
//! 3. Environment variables prefixed with `CAVY_`
//!
//! Example environment variable: `CAVY_INTERACTION__PETTING_DURATION=4.0`

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use anyhow::{Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use cavy_creature::AnimationTuning;
use cavy_props::GridLayout;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HabitatConfig {
    #[serde(default)]
    pub grid: GridLayout,

    #[serde(default)]
    pub creature: AnimationTuning,

    #[serde(default)]
    pub interaction: InteractionConfig,

    #[serde(default)]
    pub camera: CameraConfig,
}

/// Timing and placement of player-hand interactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Seconds for a full petting session
    pub petting_duration: f32,
    /// Seconds for a full hand-feed session
    pub hand_feed_duration: f32,
    /// Height above the creature where the hand starts and ends
    pub hover_height: f32,
    /// Height above the creature at the bottom of the descent
    pub contact_height: f32,
    /// Where the hand parks while idle
    pub hand_home: [f32; 3],
    /// Seed for reaction message selection
    pub reaction_seed: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            petting_duration: 3.1,
            hand_feed_duration: 2.5,
            hover_height: 4.0,
            contact_height: 1.6,
            hand_home: [0.0, 12.0, 18.0],
            reaction_seed: 7,
        }
    }
}

impl InteractionConfig {
    pub fn hand_home(&self) -> glam::Vec3 {
        glam::Vec3::from_array(self.hand_home)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Follow time constant in seconds
    pub follow_smoothness: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Seconds for an eased zoom step
    pub zoom_duration: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_smoothness: 0.3,
            distance: 40.0,
            min_distance: 8.0,
            max_distance: 80.0,
            zoom_duration: 0.35,
        }
    }
}

impl HabitatConfig {
    /// Load from `cavy.ron` in the working directory plus the environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        Self::load_from("cavy")
    }

    /// Load with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. the RON file at `path` (optional; `.ron` may be omitted)
    /// 3. Environment variables prefixed with `CAVY_` (highest priority)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults =
            Config::try_from(&HabitatConfig::default()).context("Failed to encode defaults")?;

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .add_source(defaults)
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name(&path.to_string_lossy())
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (CAVY_GRID__COLS, etc.)
            .add_source(
                Environment::with_prefix("CAVY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", path.display()))
    }

    /// Pretty RON, suitable as a starting `cavy.ron`
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HabitatConfig::default();
        assert_eq!(config.grid.cols, 14);
        assert_eq!(config.grid.rows, 10);
        assert_eq!(config.interaction.petting_duration, 3.1);
        assert_eq!(config.interaction.hand_feed_duration, 2.5);
        assert_eq!(config.creature.walk_speed, 8.0);
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Missing file falls back to defaults
        let config = HabitatConfig::load_from("does_not_exist/cavy").expect("Failed to load config");
        assert_eq!(config.grid.cell_size, 3.0);
        assert_eq!(config.interaction.hand_home, [0.0, 12.0, 18.0]);
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = HabitatConfig::default();
        config.interaction.petting_duration = 4.5;
        config.grid.cols = 20;
        let text = config.to_ron().unwrap();
        let parsed: HabitatConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
