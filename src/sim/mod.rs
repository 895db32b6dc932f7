//! Simulation core
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Elapsed time comes in as `dt`, never from a clock
//! - Randomness only from the session's seeded RNGs
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod generate;
pub mod geometry;
pub mod level;
pub mod particles;
pub mod reachability;
pub mod session;
pub mod state;
pub mod tick;

pub use geometry::{circles_overlap, distance, overlaps_obstacle};
pub use level::{GenerationReport, LEVEL_TABLE, LevelConfig, LevelLayout, generate_level};
pub use reachability::{ReachabilityGrid, layout_playable};
pub use state::{
    Adversary, BonusCollectible, Collectible, GameEvent, GamePhase, GameState, Obstacle, Particle,
    ParticleColor, Player,
};
pub use tick::{TickInput, tick};
