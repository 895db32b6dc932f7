//! Zoey's Golf - a single-screen fetch-and-deposit arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (level generation, reachability, entity step, phases)
//! - `tuning`: Data-driven game balance
//! - `records`: Best-time / best-level persistence
//! - `feedback`: Audio/haptic event boundary

pub mod feedback;
pub mod records;
pub mod sim;
pub mod tuning;

pub use records::{BestRecords, RecordStore};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep for headless runs (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Player (the dog)
    pub const PLAYER_RADIUS: f32 = 22.0;
    pub const PLAYER_START: Vec2 = Vec2::new(WORLD_WIDTH / 2.0 - 70.0, WORLD_HEIGHT / 2.0);
    /// Distance below which the player snaps onto its target
    pub const ARRIVE_DISTANCE: f32 = 2.0;

    /// Adversaries
    pub const ADVERSARY_RADIUS: f32 = 18.0;
    /// Inset of the spawn anchors from the world edges
    pub const ADVERSARY_ANCHOR_MARGIN: f32 = 60.0;
    /// Full width of the uniform spawn jitter
    pub const ADVERSARY_JITTER: f32 = 40.0;
    /// Chase is suppressed when closer than this (avoids jitter on top of the player)
    pub const ADVERSARY_MIN_CHASE_DISTANCE: f32 = 1.0;

    /// Goal basket, fixed at world centre
    pub const GOAL_POS: Vec2 = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
    pub const GOAL_RADIUS: f32 = 45.0;
    /// Extra keep-out around the goal for collectibles
    pub const GOAL_ITEM_CLEARANCE: f32 = 25.0;

    /// Collectibles
    pub const COLLECTIBLE_RADIUS: f32 = 8.0;
    pub const BONUS_RADIUS: f32 = 10.0;
    pub const COLLECTIBLE_PADDING: f32 = 75.0;
    /// Collectibles generated beyond the required count
    pub const COLLECTIBLE_SURPLUS: u32 = 15;
    /// Hard cap on generated collectibles per level
    pub const COLLECTIBLE_CAP: u32 = 65;
    /// Most items lost per hit
    pub const MAX_DROP_ON_HIT: u32 = 3;
    pub const DROP_PLACEMENT_TRIES: u32 = 24;

    /// Obstacles (trees)
    pub const OBSTACLE_PADDING: f32 = 70.0;
    pub const OBSTACLE_GOAL_CLEARANCE: f32 = 80.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 32.0;
    pub const OBSTACLE_MAX_HEIGHT: f32 = 56.0;
    pub const OBSTACLE_WIDTH_RATIO: f32 = 0.9;
    /// Effective collision radius as a fraction of footprint height
    pub const OBSTACLE_RADIUS_FACTOR: f32 = 0.85;
    pub const OBSTACLE_MAX_TRIES: u32 = 500;

    /// Reachability grid
    pub const GRID_CELL: f32 = 24.0;
    pub const GRID_PROBE_FACTOR: f32 = 0.8;

    /// Level generation
    pub const GENERATION_ATTEMPTS: u32 = 14;
    pub const OBSTACLE_EASING_AFTER: u32 = 8;
    pub const ADVERSARY_EASING_AFTER: u32 = 10;
    pub const MIN_GENERATED_OBSTACLES: u32 = 2;
    pub const FALLBACK_OBSTACLES: u32 = 2;
    pub const FALLBACK_ADVERSARY_REDUCTION: u32 = 2;
}

/// Clamp a position so a circle of `radius` stays inside the world
#[inline]
pub fn clamp_to_world(pos: Vec2, radius: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, consts::WORLD_WIDTH - radius),
        pos.y.clamp(radius, consts::WORLD_HEIGHT - radius),
    )
}

/// Unit vector for an angle (radians)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
