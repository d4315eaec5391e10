//! Block placement and removal
//!
//! The editor is the only writer of column heights after world start. It
//! enforces the column invariants: blocks are built on top of (or onto) the
//! existing stack, column heights never exceed the map side length, only a
//! column's topmost block can be removed, the bedrock layer is immutable,
//! and generated terrain cannot be excavated. Every edit either fully
//! applies or leaves the map untouched.

use super::picker::RayHit;
use crate::world::heightmap::HeightMap;
use log::debug;
use thiserror::Error;

/// Reasons an edit request is rejected
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("target cell is outside the map")]
    OutOfBounds,

    #[error("block would float or bury inside the column")]
    Unsupported,

    #[error("column is already at the maximum height")]
    ColumnFull,

    #[error("bedrock layer cannot be removed")]
    Bedrock,

    #[error("generated terrain cannot be removed")]
    BelowBaseline,

    #[error("only the topmost block of a column can be removed")]
    NotColumnTop,
}

/// Applies add/remove operations against a height map.
///
/// Holds a snapshot of the generated terrain taken at world start; removal
/// never digs below it.
#[derive(Clone, Debug)]
pub struct BlockEditor {
    baseline: HeightMap,
}

impl BlockEditor {
    /// Create an editor with the given baseline terrain snapshot
    pub fn new(baseline: HeightMap) -> Self {
        Self { baseline }
    }

    /// The baseline terrain snapshot
    pub fn baseline(&self) -> &HeightMap {
        &self.baseline
    }

    /// Place a block in the cell adjacent to a ray hit, across the hit face.
    ///
    /// Accepted only when the target cell is in bounds, at or above the
    /// column's current height, and below the height cap; the column height
    /// then becomes target Y + 1.
    pub fn add_block(&self, map: &mut HeightMap, hit: &RayHit) -> Result<(), EditError> {
        let target = hit.cell + hit.face.offset();
        if target.y < 0 {
            return Err(EditError::OutOfBounds);
        }
        let Some(height) = map.height_at(target.x, target.z) else {
            return Err(EditError::OutOfBounds);
        };

        if target.y < height {
            return Err(EditError::Unsupported);
        }
        // Column heights are capped at the map side length
        if target.y + 1 > map.size() {
            return Err(EditError::ColumnFull);
        }
        map.set_height(target.x, target.z, target.y + 1);
        debug!(
            "placed block at ({}, {}, {}), column now {}",
            target.x, target.y, target.z, target.y + 1
        );
        Ok(())
    }

    /// Remove the block struck by a ray.
    ///
    /// Accepted only for the topmost block of a column, above both the
    /// bedrock layer and the baseline terrain.
    pub fn remove_block(&self, map: &mut HeightMap, hit: &RayHit) -> Result<(), EditError> {
        let cell = hit.cell;
        if cell.y <= 0 {
            return Err(EditError::Bedrock);
        }
        let Some(height) = map.height_at(cell.x, cell.z) else {
            return Err(EditError::OutOfBounds);
        };
        let Some(baseline) = self.baseline.height_at(cell.x, cell.z) else {
            return Err(EditError::OutOfBounds);
        };

        if cell.y < baseline {
            return Err(EditError::BelowBaseline);
        }
        if cell.y != height - 1 {
            return Err(EditError::NotColumnTop);
        }
        map.set_height(cell.x, cell.z, height - 1);
        debug!(
            "removed block at ({}, {}, {}), column now {}",
            cell.x, cell.y, cell.z, height - 1
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{IVec3, Vec3};
    use crate::picking::picker::Face;

    fn hit(cell: IVec3, face: Face) -> RayHit {
        RayHit {
            cell,
            face,
            world_pos: Vec3::ZERO,
        }
    }

    fn editor_over(map: &HeightMap) -> BlockEditor {
        BlockEditor::new(map.clone())
    }

    #[test]
    fn test_add_remove_round_trip() {
        let mut map = HeightMap::flat(32, 1);
        let editor = editor_over(&map);

        // Build on the top face of the surface block
        let add = hit(IVec3::new(10, 0, 10), Face::Top);
        editor.add_block(&mut map, &add).unwrap();
        assert_eq!(map.height_at(10, 10), Some(2));

        // Remove the new top block
        let remove = hit(IVec3::new(10, 1, 10), Face::Top);
        editor.remove_block(&mut map, &remove).unwrap();
        assert_eq!(map.height_at(10, 10), Some(1));
    }

    #[test]
    fn test_add_onto_side_face() {
        let mut map = HeightMap::flat(32, 1);
        map.set_height(10, 10, 3);
        let editor = editor_over(&map);

        // Hitting the -X face of the stack's top block targets the cell at
        // (9, 2, 10); that column is height 1, so the target is above it
        let side = hit(IVec3::new(10, 2, 10), Face::Left);
        editor.add_block(&mut map, &side).unwrap();
        assert_eq!(map.height_at(9, 10), Some(3));
    }

    #[test]
    fn test_add_rejects_buried_target() {
        let mut map = HeightMap::flat(32, 2);
        let editor = editor_over(&map);

        // Target cell y=0 is below the column height
        let buried = hit(IVec3::new(10, 1, 10), Face::Bottom);
        assert_eq!(editor.add_block(&mut map, &buried), Err(EditError::Unsupported));
        assert_eq!(map.height_at(10, 10), Some(2));
    }

    #[test]
    fn test_add_rejects_full_column() {
        // Every column already at the cap (height == map size)
        let mut map = HeightMap::flat(4, 4);
        let editor = editor_over(&map);

        let top = hit(IVec3::new(1, 3, 1), Face::Top);
        assert_eq!(editor.add_block(&mut map, &top), Err(EditError::ColumnFull));
        assert_eq!(map.height_at(1, 1), Some(4));
    }

    #[test]
    fn test_add_rejects_out_of_bounds() {
        let mut map = HeightMap::flat(32, 1);
        let editor = editor_over(&map);

        let off_edge = hit(IVec3::new(0, 0, 10), Face::Left);
        assert_eq!(editor.add_block(&mut map, &off_edge), Err(EditError::OutOfBounds));

        let below = hit(IVec3::new(10, 0, 10), Face::Bottom);
        assert_eq!(editor.add_block(&mut map, &below), Err(EditError::OutOfBounds));
    }

    #[test]
    fn test_remove_refuses_bedrock() {
        let mut map = HeightMap::flat(32, 1);
        // Baseline zero so only the bedrock rule can fire
        let editor = BlockEditor::new(HeightMap::new(32));

        let floor = hit(IVec3::new(10, 0, 10), Face::Top);
        assert_eq!(editor.remove_block(&mut map, &floor), Err(EditError::Bedrock));
        assert_eq!(map.height_at(10, 10), Some(1));
    }

    #[test]
    fn test_remove_refuses_generated_terrain() {
        let mut map = HeightMap::flat(32, 3);
        let editor = editor_over(&map);

        let top = hit(IVec3::new(10, 2, 10), Face::Top);
        assert_eq!(
            editor.remove_block(&mut map, &top),
            Err(EditError::BelowBaseline)
        );
        assert_eq!(map.height_at(10, 10), Some(3));
    }

    #[test]
    fn test_remove_only_topmost() {
        let mut map = HeightMap::flat(32, 1);
        let editor = editor_over(&map);

        // Stack two player blocks
        editor.add_block(&mut map, &hit(IVec3::new(10, 0, 10), Face::Top)).unwrap();
        editor.add_block(&mut map, &hit(IVec3::new(10, 1, 10), Face::Top)).unwrap();
        assert_eq!(map.height_at(10, 10), Some(3));

        // The lower player block is not the column top
        assert_eq!(
            editor.remove_block(&mut map, &hit(IVec3::new(10, 1, 10), Face::Top)),
            Err(EditError::NotColumnTop)
        );
        editor.remove_block(&mut map, &hit(IVec3::new(10, 2, 10), Face::Top)).unwrap();
        assert_eq!(map.height_at(10, 10), Some(2));
    }

    #[test]
    fn test_height_never_negative() {
        let mut map = HeightMap::flat(32, 1);
        let editor = BlockEditor::new(HeightMap::new(32));

        // Even with a zero baseline, the bedrock rule keeps heights >= 1
        // for any removable hit, so heights cannot go below zero
        let floor = hit(IVec3::new(5, 0, 5), Face::Top);
        assert!(editor.remove_block(&mut map, &floor).is_err());
        assert_eq!(map.height_at(5, 5), Some(1));
    }
}
