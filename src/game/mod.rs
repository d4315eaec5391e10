//! Timed "find the block" minigame
//!
//! One target block sits on a random visible, obstacle-free column. Clicking
//! it scores a point and moves the target; a round lasts a fixed number of
//! seconds, driven by the caller's per-frame ticks. The high score survives
//! across rounds in memory only; persisting it is the embedder's business.

use crate::core::types::IVec3;
use crate::world::heightmap::HeightMap;
use crate::world::obstacle::ObstacleSet;
use log::{debug, info};

/// Default round length in seconds
pub const DEFAULT_ROUND_SECS: f32 = 60.0;

/// Block-finder minigame state
#[derive(Clone, Debug)]
pub struct BlockFinder {
    playing: bool,
    score: u32,
    high_score: u32,
    time_remaining: f32,
    round_secs: f32,
    target: Option<IVec3>,
    rng_state: u32,
}

impl BlockFinder {
    /// Create an idle game with the given round length and RNG seed
    pub fn new(round_secs: f32, seed: u32) -> Self {
        Self {
            playing: false,
            score: 0,
            high_score: 0,
            time_remaining: 0.0,
            round_secs,
            target: None,
            rng_state: seed | 1,
        }
    }

    fn next_random(&mut self) -> u32 {
        let mut h = self.rng_state.wrapping_mul(1103515245).wrapping_add(12345);
        h = (h ^ (h >> 13)).wrapping_mul(0x5bd1e995);
        h ^= h >> 15;
        self.rng_state = h;
        h
    }

    /// Whether a round is in progress
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Score of the current round
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score this session
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Seconds left in the current round
    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    /// Current target cell (the cell sitting on top of its column)
    pub fn target(&self) -> Option<IVec3> {
        self.target
    }

    /// Start a round. No-op while one is already running.
    pub fn start(&mut self, map: &HeightMap, obstacles: &ObstacleSet) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.score = 0;
        self.time_remaining = self.round_secs;
        self.place_target(map, obstacles);
        info!("block finder round started ({}s)", self.round_secs);
    }

    /// Stop the round early, keeping the high score
    pub fn stop(&mut self) {
        if self.playing {
            self.end_round();
        }
    }

    /// Advance the round clock. Returns true when the round ended this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.playing {
            return false;
        }
        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.end_round();
            return true;
        }
        false
    }

    fn end_round(&mut self) {
        self.playing = false;
        self.time_remaining = 0.0;
        self.target = None;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        info!(
            "round over: score {}, high score {}",
            self.score, self.high_score
        );
    }

    /// Move the target to a random column with no obstacle in its 3×3
    /// neighborhood. The target sits one cell above the column top.
    pub fn place_target(&mut self, map: &HeightMap, obstacles: &ObstacleSet) {
        let candidates: Vec<IVec3> = map
            .columns()
            .filter(|&(x, z, _)| !obstacles.near_column(x, z, 1))
            .map(|(x, z, h)| IVec3::new(x, h, z))
            .collect();

        if candidates.is_empty() {
            self.target = None;
            return;
        }
        let pick = self.next_random() as usize % candidates.len();
        self.target = Some(candidates[pick]);
        debug!("target placed at {:?}", self.target);
    }

    /// Report a clicked cell. Scores and re-places the target on a match.
    pub fn handle_block_click(
        &mut self,
        cell: IVec3,
        map: &HeightMap,
        obstacles: &ObstacleSet,
    ) -> bool {
        if !self.playing {
            return false;
        }
        if self.target != Some(cell) {
            return false;
        }
        self.score += 1;
        self.place_target(map, obstacles);
        true
    }

    /// One-line HUD text for the renderer
    pub fn hud_line(&self) -> String {
        format!(
            "Time: {}s | Score: {} | High Score: {}",
            self.time_remaining.ceil() as i32,
            self.score,
            self.high_score
        )
    }
}
