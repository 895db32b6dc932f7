//! Circle geometry shared by generation, reachability and the tick step
//!
//! Every overlap test is strict: circles that exactly touch do not overlap.

use glam::Vec2;

use super::state::Obstacle;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True iff the two circles overlap (strictly)
#[inline]
pub fn circles_overlap(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    distance(c1, c2) < r1 + r2
}

/// True iff a circle at `point` overlaps any obstacle's effective radius
pub fn overlaps_obstacle(obstacles: &[Obstacle], point: Vec2, radius: f32) -> bool {
    obstacles
        .iter()
        .any(|o| circles_overlap(point, radius, o.pos, o.collision_radius()))
}

/// True iff a circle of `radius` at `point` lies fully inside the world
#[inline]
pub fn inside_world(point: Vec2, radius: f32) -> bool {
    use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};

    point.x >= radius
        && point.y >= radius
        && point.x <= WORLD_WIDTH - radius
        && point.y <= WORLD_HEIGHT - radius
}
