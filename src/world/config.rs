//! World configuration

use crate::core::error::Error;
use crate::core::types::Result;
use crate::game::DEFAULT_ROUND_SECS;
use crate::picking::FixedStepPicker;
use crate::player::CollisionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::heightmap::DEFAULT_MAP_SIZE;

/// How the initial terrain is generated
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Every column at the same height
    Flat { height: i32 },
    /// Walled border, sparse random interior blocks, landmark columns
    Bordered { border_height: i32 },
    /// Fractal Perlin noise clamped to a small height range
    Noise {
        scale: f32,
        max_height: i32,
        octaves: u32,
    },
}

impl Default for GenerationMode {
    fn default() -> Self {
        GenerationMode::Bordered { border_height: 2 }
    }
}

/// Movement tuning
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// World units per move request
    pub move_speed: f32,
    /// Degrees per turn request
    pub turn_speed_deg: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.2,
            turn_speed_deg: 3.0,
        }
    }
}

/// Full configuration for a world session
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Map side length
    pub map_size: i32,
    /// Seed for terrain, tree placement, and the minigame
    pub seed: u32,
    /// Terrain generation mode
    pub generation: GenerationMode,
    /// Number of trees to scatter
    pub tree_count: usize,
    /// Movement tuning
    pub movement: MovementConfig,
    /// Collision volume and step-up
    pub collision: CollisionConfig,
    /// Block picker reach and march step
    pub picker: FixedStepPicker,
    /// Minigame round length in seconds
    pub round_secs: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            map_size: DEFAULT_MAP_SIZE,
            seed: 12345,
            generation: GenerationMode::default(),
            tree_count: 6,
            movement: MovementConfig::default(),
            collision: CollisionConfig::default(),
            picker: FixedStepPicker::default(),
            round_secs: DEFAULT_ROUND_SECS,
        }
    }
}

impl WorldConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check value ranges the serde layer cannot express
    fn validate(self) -> Result<Self> {
        if self.map_size <= 0 {
            return Err(Error::Config(format!(
                "map_size must be positive, got {}",
                self.map_size
            )));
        }
        if self.round_secs <= 0.0 {
            return Err(Error::Config(format!(
                "round_secs must be positive, got {}",
                self.round_secs
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_tuning() {
        let config = WorldConfig::default();
        assert_eq!(config.map_size, DEFAULT_MAP_SIZE);
        assert_eq!(config.generation, GenerationMode::Bordered { border_height: 2 });
        assert_eq!(config.movement.move_speed, 0.2);
        assert_eq!(config.movement.turn_speed_deg, 3.0);
        assert_eq!(config.picker.max_distance, 5.0);
        assert_eq!(config.picker.step, 0.1);
        assert_eq!(config.round_secs, DEFAULT_ROUND_SECS);
    }

    #[test]
    fn test_json_round_trip() {
        let config = WorldConfig {
            seed: 99,
            generation: GenerationMode::Noise {
                scale: 12.0,
                max_height: 4,
                octaves: 3,
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back = WorldConfig::from_json_str(&json).unwrap();
        assert_eq!(back.seed, 99);
        assert_eq!(back.generation, config.generation);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WorldConfig::from_json_str(r#"{"seed": 5}"#).unwrap();
        assert_eq!(config.seed, 5);
        assert_eq!(config.map_size, DEFAULT_MAP_SIZE);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(WorldConfig::from_json_str("{nope").is_err());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(matches!(
            WorldConfig::from_json_str(r#"{"map_size": 0}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            WorldConfig::from_json_str(r#"{"round_secs": -1.0}"#),
            Err(Error::Config(_))
        ));
    }
}
