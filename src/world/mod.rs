//! Terrain, obstacles, configuration, and the owning world context

pub mod config;
pub mod context;
pub mod heightmap;
pub mod obstacle;

pub use config::{GenerationMode, MovementConfig, WorldConfig};
pub use context::{InputEvent, WorldContext};
pub use heightmap::{DEFAULT_MAP_SIZE, HeightMap};
pub use obstacle::{Obstacle, ObstacleSet};
