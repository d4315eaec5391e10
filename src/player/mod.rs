//! Player camera, collision, and spawn search

pub mod camera;
pub mod collision;

pub use camera::{MoveDirection, PlayerCamera, Spawn, find_safe_spawn, is_spawn_safe};
pub use collision::{CollisionConfig, CollisionResolver};
