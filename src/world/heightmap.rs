//! Column-height terrain map
//!
//! The world is a fixed N×N grid of columns. Each cell stores one integer:
//! the column height. A column of height `h` is solid for grid Y in `[0, h)`
//! and empty above. Heights never exceed the map side length.
//!
//! World X/Z map to grid indices through an origin offset of N/2, so the map
//! is centered on the world origin. Block cells are centered vertically:
//! grid Y is recovered from world Y with a +0.5 floor bias, matching a
//! renderer that draws cell `y` spanning world Y in `[y - 0.5, y + 0.5)`.

use crate::core::types::{IVec3, Vec3};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Default map side length
pub const DEFAULT_MAP_SIZE: i32 = 32;

/// Fixed-size square grid of column heights
#[derive(Clone, Debug)]
pub struct HeightMap {
    size: i32,
    heights: Vec<i32>,
}

/// Integer hash producing a value in [0, 1]. Shared by the procedural
/// generators so terrain and tree scatter stay deterministic for a seed.
pub(crate) fn hash_2d(ix: i32, iz: i32, seed: u32) -> f32 {
    let mut h = (ix as u32).wrapping_mul(374761393)
        .wrapping_add((iz as u32).wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1274126177));
    h = (h ^ (h >> 13)).wrapping_mul(1103515245);
    h = h ^ (h >> 16);
    (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
}

impl HeightMap {
    /// Create a map with all columns at height zero
    pub fn new(size: i32) -> Self {
        debug_assert!(size > 0);
        Self {
            size,
            heights: vec![0; (size * size) as usize],
        }
    }

    /// Create a map with every column at the given height
    pub fn flat(size: i32, height: i32) -> Self {
        let mut map = Self::new(size);
        map.heights.fill(height.clamp(0, size));
        map
    }

    /// Create a walled map with sparse random terrain.
    ///
    /// Border columns are raised to `border_height`, roughly one interior
    /// column in ten gets height 1 or 2, and three fixed landmark columns
    /// are placed near the center.
    pub fn bordered_random(size: i32, seed: u32, border_height: i32) -> Self {
        let mut map = Self::new(size);
        for x in 0..size {
            for z in 0..size {
                if x == 0 || x == size - 1 || z == 0 || z == size - 1 {
                    map.set_height(x, z, border_height);
                } else if hash_2d(x, z, seed) < 0.1 {
                    let h = 1 + (hash_2d(x, z, seed.wrapping_add(1)) * 2.0) as i32;
                    map.set_height(x, z, h.min(2));
                }
            }
        }

        // Landmark columns near spawn
        let c = size / 2;
        map.set_height(c, c, 1);
        map.set_height(c - 1, c - 1, 2);
        map.set_height(c + 1, c + 1, 2);
        map
    }

    /// Create a map from fractal Perlin noise, clamped to `[0, max_height]`
    pub fn from_noise(size: i32, seed: u32, scale: f32, max_height: i32, octaves: u32) -> Self {
        let fbm = Fbm::<Perlin>::new(seed).set_octaves(octaves.max(1) as usize);
        let mut map = Self::new(size);
        let cap = max_height.min(size);
        for x in 0..size {
            for z in 0..size {
                let nx = (x as f32 / scale) as f64;
                let nz = (z as f32 / scale) as f64;
                let normalized = (fbm.get([nx, nz]) + 1.0) / 2.0;
                let h = (normalized * (max_height as f64 + 1.0)) as i32;
                map.set_height(x, z, h.clamp(0, cap));
            }
        }
        map
    }

    /// Map side length
    pub fn size(&self) -> i32 {
        self.size
    }

    /// World-origin offset: grid index of the column containing world X/Z zero
    pub fn origin_offset(&self) -> i32 {
        self.size / 2
    }

    /// Check whether a column index is inside the map
    pub fn in_bounds(&self, x: i32, z: i32) -> bool {
        x >= 0 && x < self.size && z >= 0 && z < self.size
    }

    /// Convert a continuous world position to grid coordinates.
    ///
    /// X/Z are offset by half the map size; Y gets the +0.5 cell-center bias.
    pub fn world_to_grid(&self, p: Vec3) -> IVec3 {
        let o = self.origin_offset() as f32;
        IVec3::new(
            (p.x + o).floor() as i32,
            (p.y + 0.5).floor() as i32,
            (p.z + o).floor() as i32,
        )
    }

    /// Convert grid coordinates to the cell's world origin (render translate
    /// convention: cell (x, y, z) sits at world (x - N/2, y, z - N/2))
    pub fn grid_to_world(&self, cell: IVec3) -> Vec3 {
        let o = self.origin_offset() as f32;
        Vec3::new(cell.x as f32 - o, cell.y as f32, cell.z as f32 - o)
    }

    /// Column height, or None when the column is outside the map
    pub fn height_at(&self, x: i32, z: i32) -> Option<i32> {
        if self.in_bounds(x, z) {
            Some(self.heights[(x * self.size + z) as usize])
        } else {
            None
        }
    }

    /// Set a column height. Bounds are checked; invariant enforcement beyond
    /// that is the editor's job. Returns false for out-of-bounds columns.
    pub fn set_height(&mut self, x: i32, z: i32, height: i32) -> bool {
        if !self.in_bounds(x, z) {
            return false;
        }
        debug_assert!(height >= 0 && height <= self.size);
        self.heights[(x * self.size + z) as usize] = height;
        true
    }

    /// Whether a grid cell is solid, with ray semantics: cells outside the
    /// map X/Z extent (or below Y zero) are misses, not walls
    pub fn is_solid_at(&self, cell: IVec3) -> bool {
        if cell.y < 0 {
            return false;
        }
        match self.height_at(cell.x, cell.z) {
            Some(h) => cell.y < h,
            None => false,
        }
    }

    /// Whether a grid cell is solid, with collision semantics: leaving the
    /// map X/Z extent or dipping below Y zero counts as hitting a wall
    pub fn is_solid_or_wall(&self, cell: IVec3) -> bool {
        if cell.y < 0 {
            return true;
        }
        match self.height_at(cell.x, cell.z) {
            Some(h) => cell.y < h,
            None => true,
        }
    }

    /// Iterate over all columns as (x, z, height)
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        let size = self.size;
        (0..size).flat_map(move |x| {
            (0..size).map(move |z| (x, z, self.heights[(x * size + z) as usize]))
        })
    }
}
