//! Owning world context and input dispatch
//!
//! One `WorldContext` owns everything mutable: the height map, its baseline
//! snapshot (via the editor), the obstacle set, the player camera, and the
//! minigame. Everything runs single-threaded and synchronous; the embedder
//! drives it with one `InputEvent` per input and one `tick` per frame.

use super::config::{GenerationMode, WorldConfig};
use super::heightmap::HeightMap;
use super::obstacle::ObstacleSet;
use crate::core::types::{Result, Vec3};
use crate::game::BlockFinder;
use crate::picking::{BlockEditor, BlockPicker, FixedStepPicker, RayHit};
use crate::player::{
    CollisionResolver, MoveDirection, PlayerCamera, find_safe_spawn,
};
use log::{debug, info};

/// A discrete input event from the embedding input layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    TurnLeft,
    TurnRight,
    /// Mouse-look delta in degrees
    Look { dx: f32, dy: f32 },
    /// Place a block against the face under the crosshair
    PlaceBlock,
    /// Remove the block under the crosshair
    RemoveBlock,
    /// Click the block under the crosshair (minigame)
    ClickBlock,
    StartGame,
    StopGame,
}

/// The single owning context for a world session
pub struct WorldContext {
    config: WorldConfig,
    map: HeightMap,
    editor: BlockEditor,
    obstacles: ObstacleSet,
    camera: PlayerCamera,
    resolver: CollisionResolver,
    picker: FixedStepPicker,
    game: BlockFinder,
    selection: Option<RayHit>,
}

fn generate_map(config: &WorldConfig) -> HeightMap {
    match config.generation {
        GenerationMode::Flat { height } => HeightMap::flat(config.map_size, height),
        GenerationMode::Bordered { border_height } => {
            HeightMap::bordered_random(config.map_size, config.seed, border_height)
        }
        GenerationMode::Noise {
            scale,
            max_height,
            octaves,
        } => HeightMap::from_noise(config.map_size, config.seed, scale, max_height, octaves),
    }
}

impl WorldContext {
    /// Build a world from configuration: generate terrain, snapshot the
    /// baseline, scatter trees, and spawn the player
    pub fn new(config: WorldConfig) -> Self {
        let map = generate_map(&config);
        let obstacles = ObstacleSet::scatter(&map, config.tree_count, config.seed);
        let editor = BlockEditor::new(map.clone());
        let resolver = CollisionResolver::new(config.collision);

        let mut camera = PlayerCamera::new(
            Vec3::new(0.0, 2.0, 5.0),
            Vec3::new(0.0, 2.0, 0.0),
            config.movement.move_speed,
            config.movement.turn_speed_deg,
        );
        let spawn = find_safe_spawn(&map, &obstacles, &resolver);
        camera.apply_spawn(&spawn, config.collision.eye_height);
        info!(
            "world ready: {}x{} map, {} trees, spawn {:?}",
            map.size(),
            map.size(),
            obstacles.len(),
            spawn.position()
        );

        let game = BlockFinder::new(config.round_secs, config.seed);
        Self {
            picker: config.picker,
            config,
            map,
            editor,
            obstacles,
            camera,
            resolver,
            game,
            selection: None,
        }
    }

    /// The terrain map
    pub fn map(&self) -> &HeightMap {
        &self.map
    }

    /// The obstacle set
    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// The player camera
    pub fn camera(&self) -> &PlayerCamera {
        &self.camera
    }

    /// The minigame
    pub fn game(&self) -> &BlockFinder {
        &self.game
    }

    /// The configuration the world was built from
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The block currently under the crosshair, from the last refresh
    pub fn selection(&self) -> Option<&RayHit> {
        self.selection.as_ref()
    }

    /// Raycast along the camera's view direction
    pub fn pick(&self) -> Result<Option<RayHit>> {
        let forward = self.camera.forward()?;
        self.picker.pick(&self.map, self.camera.eye, forward)
    }

    /// Re-run the pick and cache it for the renderer's highlight
    pub fn refresh_selection(&mut self) -> Result<Option<&RayHit>> {
        self.selection = self.pick()?;
        Ok(self.selection.as_ref())
    }

    /// Dispatch one input event. Returns true when world state changed.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<bool> {
        let changed = match event {
            InputEvent::MoveForward => self.try_move(MoveDirection::Forward)?,
            InputEvent::MoveBackward => self.try_move(MoveDirection::Backward)?,
            InputEvent::MoveLeft => self.try_move(MoveDirection::Left)?,
            InputEvent::MoveRight => self.try_move(MoveDirection::Right)?,
            InputEvent::TurnLeft => {
                self.camera.turn_left()?;
                true
            }
            InputEvent::TurnRight => {
                self.camera.turn_right()?;
                true
            }
            InputEvent::Look { dx, dy } => {
                self.camera.look_around(dx, dy)?;
                true
            }
            InputEvent::PlaceBlock => self.place_block()?,
            InputEvent::RemoveBlock => self.remove_block()?,
            InputEvent::ClickBlock => self.click_block()?,
            InputEvent::StartGame => {
                self.game.start(&self.map, &self.obstacles);
                true
            }
            InputEvent::StopGame => {
                self.game.stop();
                true
            }
        };
        if changed {
            self.refresh_selection()?;
        }
        Ok(changed)
    }

    /// Advance the frame clock. Ends the minigame round when time runs out
    /// and respawns the player, mirroring the round-over reset.
    pub fn tick(&mut self, dt: f32) {
        if self.game.tick(dt) {
            self.respawn();
        }
    }

    /// Move the camera back to a safe spawn point
    pub fn respawn(&mut self) {
        let spawn = find_safe_spawn(&self.map, &self.obstacles, &self.resolver);
        self.camera.apply_spawn(&spawn, self.config.collision.eye_height);
        self.selection = None;
    }

    fn try_move(&mut self, direction: MoveDirection) -> Result<bool> {
        let moved = self
            .camera
            .try_move(direction, &self.map, &self.obstacles, &self.resolver)?;
        if !moved {
            debug!("move {:?} rejected", direction);
        }
        Ok(moved)
    }

    fn place_block(&mut self) -> Result<bool> {
        let Some(hit) = self.pick()? else {
            return Ok(false);
        };
        match self.editor.add_block(&mut self.map, &hit) {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!("place rejected: {}", e);
                Ok(false)
            }
        }
    }

    fn remove_block(&mut self) -> Result<bool> {
        let Some(hit) = self.pick()? else {
            return Ok(false);
        };
        match self.editor.remove_block(&mut self.map, &hit) {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!("remove rejected: {}", e);
                Ok(false)
            }
        }
    }

    fn click_block(&mut self) -> Result<bool> {
        if !self.game.is_playing() {
            return Ok(false);
        }
        let Some(target) = self.game.target() else {
            return Ok(false);
        };
        let forward = self.camera.forward()?;

        // The target block sits on top of its column, above the height
        // field, so the terrain picker cannot see it. March the same ray
        // against that one cell, letting terrain occlude it.
        let mut dist = self.picker.step;
        while dist < self.picker.max_distance {
            let p = self.camera.eye + forward * dist;
            let cell = self.map.world_to_grid(p);
            if cell == target {
                return Ok(self
                    .game
                    .handle_block_click(cell, &self.map, &self.obstacles));
            }
            if self.map.is_solid_at(cell) {
                return Ok(false);
            }
            dist += self.picker.step;
        }
        Ok(false)
    }
}
