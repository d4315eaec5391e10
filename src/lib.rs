//! Voxwalk - a walkable voxel block-world core

pub mod core;
pub mod game;
pub mod picking;
pub mod player;
pub mod world;
