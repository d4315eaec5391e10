//! First-person player camera
//!
//! Movement is a request/validate/commit protocol: the camera computes a
//! candidate eye from its current basis vectors, the collision resolver
//! validates (and possibly step-adjusts) it, and only then do eye and look-at
//! translate together. Rotation never moves the eye. There is no sliding and
//! no partial move: a rejected request leaves the camera untouched.

use super::collision::CollisionResolver;
use crate::core::error::Error;
use crate::core::types::{IVec3, Result, Vec3};
use crate::world::heightmap::HeightMap;
use crate::world::obstacle::ObstacleSet;
use glam::Quat;
use log::warn;

/// Maximum |dot(forward, up)| the camera will commit after a pitch update
const PITCH_LIMIT: f32 = 0.98;

/// Minimum squared length for a usable forward vector
const MIN_FORWARD_LENGTH_SQ: f32 = 1e-12;

/// A translation request relative to the camera's facing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Result of a spawn-point search
#[derive(Clone, Copy, Debug)]
pub enum Spawn {
    /// A column that passed the safety check
    Safe {
        /// Grid coordinates of the column (Y is its height)
        column: IVec3,
        /// The column's world position
        position: Vec3,
    },
    /// Degraded fixed position used when the spiral found nothing
    Fallback { position: Vec3 },
}

impl Spawn {
    /// World position of the spawn point
    pub fn position(&self) -> Vec3 {
        match *self {
            Spawn::Safe { position, .. } => position,
            Spawn::Fallback { position } => position,
        }
    }
}

/// Eye/look-at/up camera state with collision-checked movement
#[derive(Clone, Debug)]
pub struct PlayerCamera {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    /// World units per move request
    pub move_speed: f32,
    /// Degrees per turn request
    pub turn_speed_deg: f32,
}

impl PlayerCamera {
    /// Create a camera looking from `eye` toward `at`, with Y up
    pub fn new(eye: Vec3, at: Vec3, move_speed: f32, turn_speed_deg: f32) -> Self {
        Self {
            eye,
            at,
            up: Vec3::Y,
            move_speed,
            turn_speed_deg,
        }
    }

    /// Normalized view direction. Errors when eye and look-at coincide.
    pub fn forward(&self) -> Result<Vec3> {
        let f = self.at - self.eye;
        if f.length_squared() < MIN_FORWARD_LENGTH_SQ {
            return Err(Error::DegenerateDirection);
        }
        Ok(f.normalize())
    }

    /// Request a translation. Returns true when the move was committed.
    pub fn try_move(
        &mut self,
        direction: MoveDirection,
        map: &HeightMap,
        obstacles: &ObstacleSet,
        resolver: &CollisionResolver,
    ) -> Result<bool> {
        let forward = self.forward()?;
        let delta = match direction {
            MoveDirection::Forward => forward,
            MoveDirection::Backward => -forward,
            // Left is up × forward, right its opposite
            MoveDirection::Left => self.up.cross(forward).normalize(),
            MoveDirection::Right => forward.cross(self.up).normalize(),
        } * self.move_speed;

        let candidate = self.eye + delta;
        match resolver.resolve_move(map, obstacles, self.eye, candidate) {
            Some(resolved) => {
                // Rigid translation: look direction is unchanged
                let shift = resolved - self.eye;
                self.eye += shift;
                self.at += shift;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Yaw left by the configured turn speed
    pub fn turn_left(&mut self) -> Result<()> {
        self.yaw(self.turn_speed_deg)
    }

    /// Yaw right by the configured turn speed
    pub fn turn_right(&mut self) -> Result<()> {
        self.yaw(-self.turn_speed_deg)
    }

    fn yaw(&mut self, degrees: f32) -> Result<()> {
        let forward = self.at - self.eye;
        if forward.length_squared() < MIN_FORWARD_LENGTH_SQ {
            return Err(Error::DegenerateDirection);
        }
        let rotation = Quat::from_axis_angle(self.up.normalize(), degrees.to_radians());
        self.at = self.eye + rotation * forward;
        Ok(())
    }

    /// Free look from a mouse delta, in degrees.
    ///
    /// Yaw always applies. Pitch applies only while the resulting forward
    /// stays clear of the poles; a delta that would push |dot(forward, up)|
    /// past the limit keeps the yawed, unpitched direction.
    pub fn look_around(&mut self, dx_deg: f32, dy_deg: f32) -> Result<()> {
        let forward = self.at - self.eye;
        if forward.length_squared() < MIN_FORWARD_LENGTH_SQ {
            return Err(Error::DegenerateDirection);
        }
        let up = self.up.normalize();

        let yawed = Quat::from_axis_angle(up, -dx_deg.to_radians()) * forward;

        let mut next = yawed;
        if let Some(right) = yawed.cross(up).try_normalize() {
            let pitched = Quat::from_axis_angle(right, -dy_deg.to_radians()) * yawed;
            if let Some(dir) = pitched.try_normalize()
                && dir.dot(up).abs() <= PITCH_LIMIT
            {
                next = pitched;
            }
        }

        self.at = self.eye + next;
        Ok(())
    }

    /// Reset pose to a spawn point, looking along -Z
    pub fn apply_spawn(&mut self, spawn: &Spawn, eye_height: f32) {
        let p = spawn.position();
        self.eye = match spawn {
            // Column surface sits half a cell below the stored height
            Spawn::Safe { .. } => Vec3::new(p.x, p.y - 0.5 + eye_height, p.z),
            Spawn::Fallback { .. } => p,
        };
        self.at = self.eye + Vec3::NEG_Z;
    }
}

/// Whether a column is a safe place to stand: in bounds, no obstacle in its
/// 3×3 neighborhood, and the camera volume fits on top of it
pub fn is_spawn_safe(
    map: &HeightMap,
    obstacles: &ObstacleSet,
    resolver: &CollisionResolver,
    x: i32,
    z: i32,
) -> bool {
    if !map.in_bounds(x, z) || obstacles.near_column(x, z, 1) {
        return false;
    }
    match resolver.standing_eye(map, x, z) {
        Some(eye) => resolver.can_occupy(map, obstacles, eye),
        None => false,
    }
}

/// Spiral outward from the map center looking for a safe spawn column.
///
/// The walk goes right, down, left, up, growing the leg length every two
/// legs. The first safe column wins. If the spiral exhausts the map, a fixed
/// elevated position above the terrain is returned and a warning logged;
/// this is degraded but never fatal.
pub fn find_safe_spawn(
    map: &HeightMap,
    obstacles: &ObstacleSet,
    resolver: &CollisionResolver,
) -> Spawn {
    let center = map.origin_offset();
    let mut x = center;
    let mut z = center;

    let safe_at = |x: i32, z: i32| -> Option<Spawn> {
        if is_spawn_safe(map, obstacles, resolver, x, z) {
            let height = map.height_at(x, z)?;
            let column = IVec3::new(x, height, z);
            Some(Spawn::Safe {
                column,
                position: map.grid_to_world(column),
            })
        } else {
            None
        }
    };

    if let Some(spawn) = safe_at(x, z) {
        return spawn;
    }

    // Right, down, left, up; leg grows every two legs
    let directions = [(1, 0), (0, 1), (-1, 0), (0, -1)];
    let mut direction = 0;
    let mut leg = 1;
    while leg <= map.size() {
        for _ in 0..2 {
            let (dx, dz) = directions[direction];
            for _ in 0..leg {
                x += dx;
                z += dz;
                if let Some(spawn) = safe_at(x, z) {
                    return spawn;
                }
            }
            direction = (direction + 1) % 4;
        }
        leg += 1;
    }

    let position = Vec3::new(0.0, map.size() as f32 + 2.0, 0.0);
    warn!(
        "no safe spawn column found, falling back to elevated position {:?}",
        position
    );
    Spawn::Fallback { position }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::obstacle::Obstacle;

    fn camera() -> PlayerCamera {
        PlayerCamera::new(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 2.0, 0.0), 0.2, 3.0)
    }

    fn resolver() -> CollisionResolver {
        CollisionResolver::default()
    }

    #[test]
    fn test_forward_degenerate() {
        let mut cam = camera();
        cam.at = cam.eye;
        assert!(matches!(cam.forward(), Err(Error::DegenerateDirection)));
        assert!(cam.turn_left().is_err());
        assert!(cam.look_around(1.0, 1.0).is_err());
    }

    #[test]
    fn test_move_commits_rigidly() {
        let map = HeightMap::new(32);
        let trees = ObstacleSet::new();
        let r = resolver();
        let mut cam = camera();
        cam.eye = r.standing_eye(&map, 16, 16).unwrap();
        cam.at = cam.eye + Vec3::NEG_Z;

        let before_look = cam.at - cam.eye;
        let moved = cam.try_move(MoveDirection::Forward, &map, &trees, &r).unwrap();
        assert!(moved);
        assert!((cam.eye.z - -0.2).abs() < 1e-5);
        // Look direction unchanged by translation
        assert!((cam.at - cam.eye - before_look).length() < 1e-5);
    }

    #[test]
    fn test_rejected_move_leaves_state() {
        let mut map = HeightMap::new(32);
        // Tall wall one column ahead (-Z)
        map.set_height(16, 15, 4);
        let trees = ObstacleSet::new();
        let r = resolver();
        let mut cam = camera();
        cam.eye = r.standing_eye(&map, 16, 16).unwrap();
        cam.at = cam.eye + Vec3::NEG_Z;

        let before = (cam.eye, cam.at);
        // Walk into the wall until rejected
        let mut rejected = false;
        for _ in 0..10 {
            if !cam.try_move(MoveDirection::Forward, &map, &trees, &r).unwrap() {
                rejected = true;
                break;
            }
        }
        assert!(rejected);
        // Whatever was committed is consistent; the rejected request itself
        // changed nothing beyond prior accepted moves
        assert_eq!(cam.at - cam.eye, before.1 - before.0);
    }

    #[test]
    fn test_strafe_is_perpendicular() {
        let map = HeightMap::new(32);
        let trees = ObstacleSet::new();
        let r = resolver();
        let mut cam = camera();
        cam.eye = r.standing_eye(&map, 16, 16).unwrap();
        cam.at = cam.eye + Vec3::NEG_Z;

        cam.try_move(MoveDirection::Left, &map, &trees, &r).unwrap();
        // Facing -Z, left is -X
        assert!((cam.eye.x - -0.2).abs() < 1e-5);
        assert!((cam.eye.z - 0.0).abs() < 1e-5);
    }

    #[test]
    fn test_turn_preserves_eye_and_length() {
        let mut cam = camera();
        let eye = cam.eye;
        let len = (cam.at - cam.eye).length();

        cam.turn_left().unwrap();
        assert_eq!(cam.eye, eye);
        assert!(((cam.at - cam.eye).length() - len).abs() < 1e-4);

        // 120 turns of 3 degrees come back around
        let start_at = cam.at;
        for _ in 0..120 {
            cam.turn_right().unwrap();
        }
        assert!((cam.at - start_at).length() < 1e-3);
    }

    #[test]
    fn test_pitch_clamp_holds() {
        let mut cam = camera();
        // Hammer the pitch upward far past vertical
        for _ in 0..200 {
            cam.look_around(0.0, -10.0).unwrap();
            let f = cam.forward().unwrap();
            assert!(
                f.dot(cam.up).abs() <= PITCH_LIMIT + 1e-4,
                "pitch escaped the clamp: {}",
                f.dot(cam.up)
            );
        }
    }

    #[test]
    fn test_spawn_center_of_empty_map() {
        let map = HeightMap::new(32);
        let spawn = find_safe_spawn(&map, &ObstacleSet::new(), &resolver());
        match spawn {
            Spawn::Safe { column, position } => {
                assert_eq!(column, IVec3::new(16, 0, 16));
                assert_eq!(position, Vec3::new(0.0, 0.0, 0.0));
            }
            Spawn::Fallback { .. } => panic!("empty map must spawn at center"),
        }
    }

    #[test]
    fn test_spawn_spirals_past_obstacle() {
        let map = HeightMap::new(32);
        let trees = ObstacleSet::from_obstacles(vec![Obstacle {
            grid_x: 16,
            grid_z: 16,
            base_y: 0,
            trunk_height: 3,
            trunk_radius: 0.3,
        }]);
        let spawn = find_safe_spawn(&map, &trees, &resolver());
        match spawn {
            Spawn::Safe { column, .. } => {
                // Outside the tree's 3×3 neighborhood, near the center
                assert!((column.x - 16).abs() > 1 || (column.z - 16).abs() > 1);
                assert!((column.x - 16).abs() <= 2 && (column.z - 16).abs() <= 2);
            }
            Spawn::Fallback { .. } => panic!("spiral must find a column two out"),
        }
    }

    #[test]
    fn test_spawn_fallback_when_exhausted() {
        // Trees every other column: every column has one in its 3×3
        // neighborhood, so no spawn is safe
        let map = HeightMap::new(8);
        let mut trees = Vec::new();
        for x in [1, 3, 5, 7] {
            for z in [1, 3, 5, 7] {
                trees.push(Obstacle {
                    grid_x: x,
                    grid_z: z,
                    base_y: 0,
                    trunk_height: 3,
                    trunk_radius: 0.3,
                });
            }
        }
        let spawn = find_safe_spawn(&map, &ObstacleSet::from_obstacles(trees), &resolver());
        match spawn {
            Spawn::Fallback { position } => assert!(position.y > 8.0),
            Spawn::Safe { column, .. } => panic!("unexpected safe column {:?}", column),
        }
    }

    #[test]
    fn test_apply_spawn_sets_pose() {
        let map = HeightMap::new(32);
        let r = resolver();
        let spawn = find_safe_spawn(&map, &ObstacleSet::new(), &r);
        let mut cam = camera();
        cam.apply_spawn(&spawn, r.config.eye_height);

        assert_eq!(cam.eye, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(cam.at - cam.eye, Vec3::NEG_Z);
        // The spawn pose must itself be collision-free
        assert!(r.can_occupy(&map, &ObstacleSet::new(), cam.eye));
    }
}
