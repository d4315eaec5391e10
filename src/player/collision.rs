//! Camera-volume collision against terrain and obstacles
//!
//! The player is tested as a small set of sample points: a foot point, a
//! head point, and a ring of eight lateral offsets at 45° increments at the
//! collision radius. The ring sits just above the step-up band so that
//! single-block rises are handled by the step adjustment instead of being
//! walled off. The same sampling is used for movement and spawn safety, so a
//! column that passes the spawn check is also standable during movement.

use crate::core::types::{IVec3, Vec3};
use crate::world::heightmap::HeightMap;
use crate::world::obstacle::ObstacleSet;
use serde::{Deserialize, Serialize};

/// Collision volume and step-up configuration
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Lateral sample radius in world units
    pub radius: f32,
    /// Eye height above the supporting column surface
    pub eye_height: f32,
    /// Maximum rise (in cells) smoothed by the step-up adjustment
    pub step_height: f32,
    /// Extra lateral clearance kept around obstacle trunks
    pub trunk_margin: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            eye_height: 1.5,
            step_height: 1.0,
            trunk_margin: 0.1,
        }
    }
}

/// Decides whether a camera-sized volume may occupy a position
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionResolver {
    pub config: CollisionConfig,
}

impl CollisionResolver {
    /// Create a resolver with the given configuration
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    /// Sample points for a camera volume centered on an eye position
    fn sample_points(&self, eye: Vec3) -> [Vec3; 10] {
        let c = &self.config;
        let foot = eye + Vec3::new(0.0, -c.eye_height + 0.2, 0.0);
        let head = eye + Vec3::new(0.0, 0.2, 0.0);

        // Ring just above what step-up can absorb
        let ring_y = eye.y - c.eye_height + c.step_height + 0.2;
        let mut points = [foot; 10];
        points[1] = head;
        for (i, point) in points.iter_mut().skip(2).enumerate() {
            let angle = (i as f32) * 45f32.to_radians();
            *point = Vec3::new(
                eye.x + angle.cos() * c.radius,
                ring_y,
                eye.z + angle.sin() * c.radius,
            );
        }
        points
    }

    /// Whether a single sample point collides with terrain, map boundary,
    /// or an obstacle trunk
    fn point_collides(&self, map: &HeightMap, obstacles: &ObstacleSet, p: Vec3) -> bool {
        if map.is_solid_or_wall(map.world_to_grid(p)) {
            return true;
        }
        obstacles.blocks_point(map, p, self.config.trunk_margin)
    }

    /// Whether the camera volume can occupy the given eye position
    pub fn can_occupy(&self, map: &HeightMap, obstacles: &ObstacleSet, eye: Vec3) -> bool {
        self.sample_points(eye)
            .iter()
            .all(|&p| !self.point_collides(map, obstacles, p))
    }

    /// Surface height of a column, counting an anchored obstacle trunk when
    /// it rises above the terrain
    pub fn surface_height(
        &self,
        map: &HeightMap,
        obstacles: &ObstacleSet,
        x: i32,
        z: i32,
    ) -> Option<i32> {
        let terrain = map.height_at(x, z)?;
        let trunk = obstacles
            .at_column(x, z)
            .map(|o| o.trunk_top())
            .unwrap_or(0);
        Some(terrain.max(trunk))
    }

    /// Eye position for standing on a column, at the column's world origin
    pub fn standing_eye(&self, map: &HeightMap, x: i32, z: i32) -> Option<Vec3> {
        let h = map.height_at(x, z)?;
        let base = map.grid_to_world(IVec3::new(x, 0, z));
        // Column surface sits at h - 0.5 in world Y
        Some(Vec3::new(
            base.x,
            h as f32 - 0.5 + self.config.eye_height,
            base.z,
        ))
    }

    /// Validate a move from one eye position to another.
    ///
    /// Crossing into a different column applies a vertical adjustment equal
    /// to the surface height difference: descents are always followed,
    /// rises are followed up to the configured step height and otherwise
    /// block the move. Returns the (possibly adjusted) destination, or None
    /// when the move is rejected. State is the caller's to commit.
    pub fn resolve_move(
        &self,
        map: &HeightMap,
        obstacles: &ObstacleSet,
        from: Vec3,
        to: Vec3,
    ) -> Option<Vec3> {
        let from_cell = map.world_to_grid(from);
        let to_cell = map.world_to_grid(to);

        let mut adjusted = to;
        if (from_cell.x, from_cell.z) != (to_cell.x, to_cell.z) {
            let src = self.surface_height(map, obstacles, from_cell.x, from_cell.z);
            let dst = self.surface_height(map, obstacles, to_cell.x, to_cell.z);
            if let (Some(src), Some(dst)) = (src, dst) {
                let rise = (dst - src) as f32;
                if rise > self.config.step_height {
                    return None;
                }
                adjusted.y += rise;
            }
            // Destination outside the map: left to the wall samples below
        }

        if self.can_occupy(map, obstacles, adjusted) {
            Some(adjusted)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::obstacle::Obstacle;

    fn resolver() -> CollisionResolver {
        CollisionResolver::default()
    }

    fn no_trees() -> ObstacleSet {
        ObstacleSet::new()
    }

    #[test]
    fn test_occupy_open_ground() {
        let map = HeightMap::new(32);
        let r = resolver();
        let eye = r.standing_eye(&map, 16, 16).unwrap();
        assert_eq!(eye, Vec3::new(0.0, 1.0, 0.0));
        assert!(r.can_occupy(&map, &no_trees(), eye));
    }

    #[test]
    fn test_map_edge_is_wall() {
        let map = HeightMap::new(32);
        let r = resolver();

        // Eye past the -X edge of the map
        let outside = Vec3::new(-16.5, 1.0, 0.0);
        assert!(!r.can_occupy(&map, &no_trees(), outside));

        let inside = r.standing_eye(&map, 1, 16).unwrap();
        let past_edge = inside + Vec3::new(-1.5, 0.0, 0.0);
        assert!(r.resolve_move(&map, &no_trees(), inside, past_edge).is_none());
    }

    #[test]
    fn test_step_up_single_block() {
        let mut map = HeightMap::new(32);
        map.set_height(17, 16, 1);
        let r = resolver();

        let from = r.standing_eye(&map, 16, 16).unwrap();
        let to = from + Vec3::new(1.0, 0.0, 0.0);
        let resolved = r
            .resolve_move(&map, &no_trees(), from, to)
            .expect("one-block rise must be stepped up");
        assert!((resolved.y - (from.y + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_step_up_rejects_tall_rise() {
        let mut map = HeightMap::new(32);
        map.set_height(17, 16, 2);
        let r = resolver();

        let from = r.standing_eye(&map, 16, 16).unwrap();
        let to = from + Vec3::new(1.0, 0.0, 0.0);
        assert!(r.resolve_move(&map, &no_trees(), from, to).is_none());
    }

    #[test]
    fn test_descend_follows_surface() {
        let mut map = HeightMap::flat(32, 1);
        map.set_height(17, 16, 0);
        let r = resolver();

        let from = r.standing_eye(&map, 16, 16).unwrap();
        let to = from + Vec3::new(1.0, 0.0, 0.0);
        let resolved = r
            .resolve_move(&map, &no_trees(), from, to)
            .expect("stepping down must be allowed");
        assert!((resolved.y - (from.y - 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_tall_wall_blocks_laterally() {
        let mut map = HeightMap::new(32);
        map.set_height(17, 16, 3);
        let r = resolver();

        let from = r.standing_eye(&map, 16, 16).unwrap();
        // Candidate still in the source column, but the ring pokes into
        // the wall column
        let to = from + Vec3::new(0.8, 0.0, 0.0);
        assert!(r.resolve_move(&map, &no_trees(), from, to).is_none());
    }

    #[test]
    fn test_obstacle_trunk_blocks() {
        let map = HeightMap::new(32);
        let trees = ObstacleSet::from_obstacles(vec![Obstacle {
            grid_x: 17,
            grid_z: 16,
            base_y: 0,
            trunk_height: 3,
            trunk_radius: 0.3,
        }]);
        let r = resolver();

        let from = r.standing_eye(&map, 16, 16).unwrap();
        // Terrain alone would allow this move; the trunk must not
        let to = from + Vec3::new(1.5, 0.0, 0.0);
        assert!(r.resolve_move(&map, &trees, from, to).is_none());
        assert!(r.resolve_move(&map, &no_trees(), from, to).is_some());
    }

    #[test]
    fn test_same_column_move_keeps_height() {
        let map = HeightMap::new(32);
        let r = resolver();

        let from = r.standing_eye(&map, 16, 16).unwrap();
        let to = from + Vec3::new(0.2, 0.0, 0.2);
        let resolved = r.resolve_move(&map, &no_trees(), from, to).unwrap();
        assert_eq!(resolved, to);
    }
}
