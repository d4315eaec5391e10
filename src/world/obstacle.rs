//! Static world obstacles (trees)
//!
//! Obstacles are read-only from the core's perspective: the collision
//! resolver and spawn/minigame safety checks consult them, nothing edits
//! them after world start. Only the trunk is collidable; foliage is a
//! renderer concern.

use super::heightmap::{HeightMap, hash_2d};
use crate::core::types::{IVec3, Vec3};

/// A tree-like obstacle anchored to a column
#[derive(Clone, Copy, Debug)]
pub struct Obstacle {
    /// Grid X of the anchor column
    pub grid_x: i32,
    /// Grid Z of the anchor column
    pub grid_z: i32,
    /// Grid Y of the trunk base (column height at placement time)
    pub base_y: i32,
    /// Trunk height in cells
    pub trunk_height: i32,
    /// Lateral half-extent of the trunk in world units
    pub trunk_radius: f32,
}

impl Obstacle {
    /// Grid Y one past the trunk top
    pub fn trunk_top(&self) -> i32 {
        self.base_y + self.trunk_height
    }
}

/// Read-only collection of world obstacles
#[derive(Clone, Debug, Default)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    /// Create an empty obstacle set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from explicit obstacles
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// Scatter up to `count` trees on interior columns.
    ///
    /// Placement is deterministic for a given seed. Columns adjacent to an
    /// already-placed tree are skipped so trunks never touch.
    pub fn scatter(map: &HeightMap, count: usize, seed: u32) -> Self {
        let mut set = Self::new();
        let size = map.size();
        let mut attempt = 0u32;
        while set.obstacles.len() < count && attempt < count as u32 * 16 {
            let x = (1 + (hash_2d(attempt as i32, 0, seed) * (size - 2) as f32) as i32)
                .min(size - 2);
            let z = (1 + (hash_2d(0, attempt as i32, seed.wrapping_add(1)) * (size - 2) as f32) as i32)
                .min(size - 2);
            attempt += 1;

            if set.near_column(x, z, 1) {
                continue;
            }
            let Some(base_y) = map.height_at(x, z) else {
                continue;
            };
            set.obstacles.push(Obstacle {
                grid_x: x,
                grid_z: z,
                base_y,
                trunk_height: 3,
                trunk_radius: 0.3,
            });
        }
        set
    }

    /// All obstacles
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Number of obstacles
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// The obstacle anchored at a column, if any
    pub fn at_column(&self, x: i32, z: i32) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .find(|o| o.grid_x == x && o.grid_z == z)
    }

    /// Whether any obstacle anchor lies within `range` columns (Chebyshev
    /// distance) of the given column. Range 1 is the 3×3 neighborhood.
    pub fn near_column(&self, x: i32, z: i32, range: i32) -> bool {
        self.obstacles
            .iter()
            .any(|o| (o.grid_x - x).abs() <= range && (o.grid_z - z).abs() <= range)
    }

    /// Whether a world-space point falls inside any trunk bounding volume,
    /// expanded laterally by `margin`
    pub fn blocks_point(&self, map: &HeightMap, p: Vec3, margin: f32) -> bool {
        let gy = map.world_to_grid(p).y;
        self.obstacles.iter().any(|o| {
            if gy < o.base_y || gy >= o.trunk_top() {
                return false;
            }
            let center = map.grid_to_world(IVec3::new(o.grid_x, 0, o.grid_z));
            let reach = o.trunk_radius + margin;
            (p.x - (center.x + 0.5)).abs() <= reach && (p.z - (center.z + 0.5)).abs() <= reach
        })
    }
}
