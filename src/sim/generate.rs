//! Procedural placement of trees, balls, bonus pickups and adversaries
//!
//! All placement is rejection sampling under a fixed attempt budget. Running
//! out of budget yields a short list, never an error; the level loop decides
//! whether the result is good enough.

use glam::Vec2;
use rand::Rng;

use super::geometry::{circles_overlap, distance, inside_world, overlaps_obstacle};
use super::state::{Adversary, BonusCollectible, Collectible, Obstacle};
use crate::consts::*;
use crate::direction_from_angle;

/// Attempts per bonus collectible
const BONUS_TRIES_PER_ITEM: u32 = 60;

/// Uniform point inside the world inset by `padding` on every side
fn random_point<R: Rng + ?Sized>(rng: &mut R, padding: f32) -> Vec2 {
    Vec2::new(
        padding + rng.random::<f32>() * (WORLD_WIDTH - 2.0 * padding),
        padding + rng.random::<f32>() * (WORLD_HEIGHT - 2.0 * padding),
    )
}

/// Place up to `count` non-overlapping trees away from the goal
pub fn generate_obstacles<R: Rng + ?Sized>(rng: &mut R, count: u32) -> Vec<Obstacle> {
    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(count as usize);
    let mut tries = 0;

    while (obstacles.len() as u32) < count && tries < OBSTACLE_MAX_TRIES {
        tries += 1;
        let pos = random_point(rng, OBSTACLE_PADDING);
        let height = rng.random_range(OBSTACLE_MIN_HEIGHT..OBSTACLE_MAX_HEIGHT);
        if distance(pos, GOAL_POS) < OBSTACLE_GOAL_CLEARANCE {
            continue;
        }
        let candidate = Obstacle::new(pos, height);
        let crowded = obstacles
            .iter()
            .any(|o| distance(pos, o.pos) < o.collision_radius() + candidate.width);
        if !crowded {
            obstacles.push(candidate);
        }
    }

    if (obstacles.len() as u32) < count {
        log::debug!("Placed {}/{} trees before giving up", obstacles.len(), count);
    }
    obstacles
}

/// True if an item of `radius` may sit at `pos`: in bounds, off the goal, clear of trees
pub fn is_valid_item_position(obstacles: &[Obstacle], pos: Vec2, radius: f32) -> bool {
    inside_world(pos, radius)
        && distance(pos, GOAL_POS) >= GOAL_RADIUS + GOAL_ITEM_CLEARANCE
        && !overlaps_obstacle(obstacles, pos, radius)
}

/// Number of balls to scatter for a level needing `required`
pub fn collectible_count(required: u32) -> u32 {
    (required + COLLECTIBLE_SURPLUS).min(COLLECTIBLE_CAP)
}

/// Scatter the level's golf balls into free space
pub fn generate_collectibles<R: Rng + ?Sized>(
    rng: &mut R,
    obstacles: &[Obstacle],
    required: u32,
) -> Vec<Collectible> {
    let need = collectible_count(required);
    let max_tries = need * 150;
    let mut collectibles = Vec::with_capacity(need as usize);
    let mut tries = 0;

    while (collectibles.len() as u32) < need && tries < max_tries {
        tries += 1;
        let pos = random_point(rng, COLLECTIBLE_PADDING);
        if is_valid_item_position(obstacles, pos, COLLECTIBLE_RADIUS) {
            collectibles.push(Collectible::new(pos));
        }
    }
    collectibles
}

/// Scatter bonus pickups clear of trees, balls and each other
pub fn generate_bonuses<R: Rng + ?Sized>(
    rng: &mut R,
    obstacles: &[Obstacle],
    collectibles: &[Collectible],
    count: u32,
) -> Vec<BonusCollectible> {
    let mut bonuses: Vec<BonusCollectible> = Vec::with_capacity(count as usize);
    let max_tries = count * BONUS_TRIES_PER_ITEM;
    let mut tries = 0;

    while (bonuses.len() as u32) < count && tries < max_tries {
        tries += 1;
        let pos = random_point(rng, COLLECTIBLE_PADDING);
        if !is_valid_item_position(obstacles, pos, BONUS_RADIUS) {
            continue;
        }
        let near_ball = collectibles
            .iter()
            .any(|c| circles_overlap(pos, BONUS_RADIUS, c.pos, COLLECTIBLE_RADIUS));
        let near_bonus = bonuses
            .iter()
            .any(|b| circles_overlap(pos, BONUS_RADIUS, b.pos, BONUS_RADIUS));
        if !near_ball && !near_bonus {
            bonuses.push(BonusCollectible { pos });
        }
    }
    bonuses
}

/// Fixed spawn anchors: four corners, then top and bottom midpoints
pub fn adversary_anchors() -> [Vec2; 6] {
    let m = ADVERSARY_ANCHOR_MARGIN;
    [
        Vec2::new(m, m),
        Vec2::new(WORLD_WIDTH - m, m),
        Vec2::new(WORLD_WIDTH - m, WORLD_HEIGHT - m),
        Vec2::new(m, WORLD_HEIGHT - m),
        Vec2::new(WORLD_WIDTH / 2.0, m),
        Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT - m),
    ]
}

/// Spawn adversaries on the anchor ring with a little jitter
///
/// Trees are ignored here; an adversary spawned inside one just walks out slowly.
pub fn generate_adversaries<R: Rng + ?Sized>(rng: &mut R, count: u32) -> Vec<Adversary> {
    let anchors = adversary_anchors();
    (0..count as usize)
        .map(|i| {
            let anchor = anchors[i % anchors.len()];
            let jitter = Vec2::new(
                (rng.random::<f32>() - 0.5) * ADVERSARY_JITTER,
                (rng.random::<f32>() - 0.5) * ADVERSARY_JITTER,
            );
            Adversary::new(anchor + jitter)
        })
        .collect()
}

/// Try to drop one ball somewhere around `center`; None if no free spot was found
pub fn scatter_near<R: Rng + ?Sized>(
    rng: &mut R,
    obstacles: &[Obstacle],
    center: Vec2,
) -> Option<Collectible> {
    for _ in 0..DROP_PLACEMENT_TRIES {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let spread = PLAYER_RADIUS + COLLECTIBLE_RADIUS + 8.0 + rng.random::<f32>() * 18.0;
        let pos = center + direction_from_angle(angle) * spread;
        if is_valid_item_position(obstacles, pos, COLLECTIBLE_RADIUS) {
            return Some(Collectible::new(pos));
        }
    }
    None
}
