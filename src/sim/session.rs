//! Level session controller
//!
//! Phase transitions driven by input requests. Each request maps to exactly
//! one transition and is ignored outside the phase it applies to.
//!
//! ```text
//! Title --start--> Playing --deposit target--> LevelComplete --advance--> Playing (level + 1)
//!                  Playing --timer expired---> GameOver      --retry----> Playing (same level)
//!                  Playing <--pause/resume--> Paused
//! ```

use glam::Vec2;

use super::level::{LevelConfig, generate_level};
use super::state::{GamePhase, GameState};
use crate::clamp_to_world;
use crate::consts::PLAYER_RADIUS;

impl GameState {
    /// Build the current level from scratch and start playing it
    pub fn start_level(&mut self) {
        let retries = self.retries_for(self.level);
        self.config = LevelConfig::for_level(self.level, retries);

        let layout = generate_level(&mut self.rng, &self.config, self.level);
        self.obstacles = layout.obstacles;
        self.collectibles = layout.collectibles;
        self.bonuses = layout.bonuses;
        self.adversaries = layout.adversaries;
        self.generation = Some(layout.report);

        self.player.reset_to_start();
        self.deposited = 0;
        self.time_remaining = self.config.time_limit as f32;
        self.phase_secs = 0.0;
        self.screen_shake = 0.0;
        self.particles.clear();
        self.phase = GamePhase::Playing;

        log::info!(
            "Level {} (retry {}): need {}, {}s, {} trees, {} adversaries",
            self.level,
            retries,
            self.config.required,
            self.config.time_limit,
            self.obstacles.len(),
            self.adversaries.len()
        );
    }

    /// Title -> Playing at level 1
    pub fn request_start(&mut self) -> bool {
        if self.phase != GamePhase::Title {
            return false;
        }
        self.level = 1;
        self.start_level();
        true
    }

    /// GameOver -> Playing, same level, one more retry on the books
    pub fn request_retry(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        *self.retries.entry(self.level).or_insert(0) += 1;
        self.start_level();
        true
    }

    /// LevelComplete -> Playing at the next level
    pub fn request_advance(&mut self) -> bool {
        if self.phase != GamePhase::LevelComplete {
            return false;
        }
        self.level += 1;
        self.start_level();
        true
    }

    /// Playing -> Paused
    pub fn request_pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    /// Paused -> Playing
    pub fn request_resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        true
    }

    /// Point the player somewhere; clamped so the dog stays on the field
    ///
    /// Non-finite points are dropped and the previous target is kept.
    pub fn set_movement_target(&mut self, target: Vec2) {
        if !target.is_finite() {
            log::debug!("Ignoring non-finite movement target {target}");
            return;
        }
        self.player.target = clamp_to_world(target, PLAYER_RADIUS);
    }

    /// Seconds left on the level clock
    pub fn remaining_time(&self) -> f32 {
        self.time_remaining.max(0.0)
    }
}
