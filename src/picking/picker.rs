//! Ray-marched block picking
//!
//! The picker samples the view ray at fixed increments and reports the first
//! solid cell it lands in. This is deliberately not an exact voxel traversal:
//! the fixed step can skip the exact cell boundary at grazing angles, which
//! is why face classification falls back to `Top` when no boundary is close
//! enough. Callers that need exact DDA can substitute another `BlockPicker`
//! implementation without touching the rest of the core.

use crate::core::error::Error;
use crate::core::types::{IVec3, Result, Vec3};
use crate::world::heightmap::HeightMap;
use serde::{Deserialize, Serialize};

/// How close (in cell-local units) a sample must be to a cell boundary for
/// that boundary to count as the struck face
const FACE_EPSILON: f32 = 0.01;

/// Minimum squared length for a usable ray direction
const MIN_DIRECTION_LENGTH_SQ: f32 = 1e-12;

/// A cell face, named from the cell's local frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    /// -X side
    Left,
    /// +X side
    Right,
    /// -Y side
    Bottom,
    /// +Y side
    Top,
    /// -Z side
    Front,
    /// +Z side
    Back,
}

impl Face {
    /// Grid offset to the neighboring cell across this face
    pub fn offset(self) -> IVec3 {
        match self {
            Face::Left => IVec3::new(-1, 0, 0),
            Face::Right => IVec3::new(1, 0, 0),
            Face::Bottom => IVec3::new(0, -1, 0),
            Face::Top => IVec3::new(0, 1, 0),
            Face::Front => IVec3::new(0, 0, -1),
            Face::Back => IVec3::new(0, 0, 1),
        }
    }
}

/// The first solid cell struck by a ray
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Grid coordinates of the struck cell
    pub cell: IVec3,
    /// Which face the ray crossed into the cell
    pub face: Face,
    /// Continuous-space point of the sample that registered the hit
    pub world_pos: Vec3,
}

/// Block picking strategy
pub trait BlockPicker {
    /// Find the first solid cell along a ray, or None within reach.
    ///
    /// The direction does not need to be normalized, but a near-zero-length
    /// vector is a caller error and is reported as such.
    fn pick(&self, map: &HeightMap, origin: Vec3, direction: Vec3) -> Result<Option<RayHit>>;
}

/// Fixed-step ray-march picker
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedStepPicker {
    /// Maximum reach distance in world units
    pub max_distance: f32,
    /// March increment in world units
    pub step: f32,
}

impl Default for FixedStepPicker {
    fn default() -> Self {
        Self {
            max_distance: 5.0,
            step: 0.1,
        }
    }
}

impl FixedStepPicker {
    /// Classify which face a sample entered its cell through.
    ///
    /// An axis qualifies when the sample's in-cell fraction is within
    /// `FACE_EPSILON` of a cell boundary and the ray direction enters from
    /// outside on that axis. When no axis qualifies (the march stepped past
    /// the boundary), `Top` is reported; downstream editing depends on this
    /// exact fallback.
    fn hit_face(p: Vec3, dir: Vec3) -> Face {
        let local_x = p.x - p.x.floor();
        let local_y = p.y - p.y.floor();
        let local_z = p.z - p.z.floor();

        if local_x < FACE_EPSILON && dir.x > 0.0 {
            Face::Left
        } else if local_x > 1.0 - FACE_EPSILON && dir.x < 0.0 {
            Face::Right
        } else if local_y < FACE_EPSILON && dir.y > 0.0 {
            Face::Bottom
        } else if local_y > 1.0 - FACE_EPSILON && dir.y < 0.0 {
            Face::Top
        } else if local_z < FACE_EPSILON && dir.z > 0.0 {
            Face::Front
        } else if local_z > 1.0 - FACE_EPSILON && dir.z < 0.0 {
            Face::Back
        } else {
            Face::Top
        }
    }
}

impl BlockPicker for FixedStepPicker {
    fn pick(&self, map: &HeightMap, origin: Vec3, direction: Vec3) -> Result<Option<RayHit>> {
        if direction.length_squared() < MIN_DIRECTION_LENGTH_SQ {
            return Err(Error::DegenerateDirection);
        }
        let dir = direction.normalize();

        let mut dist = 0.0;
        while dist < self.max_distance {
            let p = origin + dir * dist;
            let cell = map.world_to_grid(p);

            if cell.y >= 0 && map.in_bounds(cell.x, cell.z) && map.is_solid_at(cell) {
                return Ok(Some(RayHit {
                    cell,
                    face: Self::hit_face(p, dir),
                    world_pos: p,
                }));
            }
            dist += self.step;
        }
        Ok(None)
    }
}
