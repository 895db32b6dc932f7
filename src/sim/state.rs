//! Game state and core simulation types
//!
//! Everything a session needs lives on [`GameState`]; nothing is global, so
//! several sessions can run side by side and tests can seed their own.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{GenerationReport, LevelConfig};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start input
    Title,
    /// Active gameplay
    Playing,
    /// Gameplay frozen; the level timer does not run
    Paused,
    /// Required items deposited, waiting to advance
    LevelComplete,
    /// Timer ran out, waiting for a retry
    GameOver,
}

/// Discrete simulation events for the audio/haptic/persistence collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Primary collectible picked up
    Collect,
    /// Bonus collectible picked up (time extended)
    BonusCollect,
    /// Carried items dropped into the goal
    Deposit { count: u32 },
    /// Player hit by an adversary
    Hit { dropped: u32 },
    /// Level finished with this much time left
    LevelComplete { level: u32, remaining_secs: f32 },
    /// Timer expired
    GameOver { level: u32 },
}

impl GameEvent {
    /// Collaborator-facing event name
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Collect | GameEvent::BonusCollect => "collect",
            GameEvent::Deposit { .. } => "deposit",
            GameEvent::Hit { .. } => "hit",
            GameEvent::LevelComplete { .. } => "levelComplete",
            GameEvent::GameOver { .. } => "gameOver",
        }
    }
}

/// The player-controlled dog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Movement target (from pointer/touch)
    pub target: Vec2,
    /// Facing angle (radians), for rendering
    pub angle: f32,
    /// Items currently carried
    pub carried: u32,
    /// Seconds of stun left
    pub stun_secs: f32,
    /// Seconds of hit immunity left
    pub invuln_secs: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            target: PLAYER_START,
            angle: 0.0,
            carried: 0,
            stun_secs: 0.0,
            invuln_secs: 0.0,
        }
    }
}

impl Player {
    #[inline]
    pub fn is_stunned(&self) -> bool {
        self.stun_secs > 0.0
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invuln_secs > 0.0
    }

    /// Put the player back on the start point for a new attempt
    pub fn reset_to_start(&mut self) {
        self.pos = PLAYER_START;
        self.target = PLAYER_START;
        self.carried = 0;
        self.stun_secs = 0.0;
        self.invuln_secs = 0.0;
    }
}

/// A tree; slows (never stops) anything walking through it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    /// Footprint height
    pub height: f32,
    /// Footprint width
    pub width: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, height: f32) -> Self {
        Self {
            pos,
            height,
            width: height * OBSTACLE_WIDTH_RATIO,
        }
    }

    /// Effective collision radius
    #[inline]
    pub fn collision_radius(&self) -> f32 {
        self.height * OBSTACLE_RADIUS_FACTOR
    }
}

/// A golf ball counted toward level completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec2,
    /// One-way flag: once collected it stays collected
    pub collected: bool,
}

impl Collectible {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            collected: false,
        }
    }
}

/// Time-bonus pickup; removed from the active set when taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusCollectible {
    pub pos: Vec2,
}

/// A roaming adversary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adversary {
    pub pos: Vec2,
    /// Velocity chosen on the last tick (units/second)
    pub vel: Vec2,
    /// Seconds of flee left
    pub flee_secs: f32,
    /// Unit direction held while fleeing
    pub flee_dir: Vec2,
}

impl Adversary {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            flee_secs: 0.0,
            flee_dir: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn is_fleeing(&self) -> bool {
        self.flee_secs > 0.0
    }
}

/// Particle color tag, resolved by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Ball,
    Bonus,
    Basket,
    Impact,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    /// Life lost per second
    pub decay: f32,
    pub radius: f32,
    pub color: ParticleColor,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    /// Domain separation so cosmetic randomness never shifts layouts
    const FX_STREAM: u64 = 0xE0E1_7E77;

    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    pub fn to_fx_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed.wrapping_add(Self::FX_STREAM))
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub rng_state: RngState,
    /// Gameplay RNG (level layouts, drop scatter)
    pub rng: Pcg32,
    /// Cosmetic RNG (particles)
    pub fx_rng: Pcg32,
    /// Balance parameters
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Current level (1-based, unbounded)
    pub level: u32,
    /// Failed attempts per level since it was last completed
    pub retries: BTreeMap<u32, u32>,
    /// Active configuration (after difficulty scaling)
    pub config: LevelConfig,
    /// Seconds left on the level timer
    pub time_remaining: f32,
    /// Items dropped into the goal this attempt
    pub deposited: u32,
    /// Seconds spent in the current LevelComplete phase
    pub phase_secs: f32,
    /// Remaining time recorded when the last level was completed
    pub last_completion_secs: Option<f32>,
    /// Outcome of the last level generation
    pub generation: Option<GenerationReport>,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub bonuses: Vec<BonusCollectible>,
    pub adversaries: Vec<Adversary>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Screen shake intensity (0-1), decays every tick
    pub screen_shake: f32,
    /// Events since the caller last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session on the title screen with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new session on the title screen
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            fx_rng: rng_state.to_fx_rng(),
            rng_state,
            tuning,
            phase: GamePhase::Title,
            level: 1,
            retries: BTreeMap::new(),
            config: LevelConfig::for_level(1, 0),
            time_remaining: 0.0,
            deposited: 0,
            phase_secs: 0.0,
            last_completion_secs: None,
            generation: None,
            player: Player::default(),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            bonuses: Vec::new(),
            adversaries: Vec::new(),
            particles: Vec::new(),
            screen_shake: 0.0,
            events: Vec::new(),
        }
    }

    /// Run seed
    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    /// Retry count for a level
    pub fn retries_for(&self, level: u32) -> u32 {
        self.retries.get(&level).copied().unwrap_or(0)
    }

    /// Number of primary collectibles still on the field
    pub fn uncollected(&self) -> usize {
        self.collectibles.iter().filter(|c| !c.collected).count()
    }

    /// Take all buffered events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
