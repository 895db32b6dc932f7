//! Per-frame simulation tick
//!
//! Variable timestep: `dt` is the measured real time since the previous
//! frame, in seconds. Within a tick, movement and hits resolve before
//! pickups and deposits so an item reached this frame counts this frame.

use glam::Vec2;

use super::autopilot;
use super::generate::scatter_near;
use super::geometry::{circles_overlap, overlaps_obstacle};
use super::particles::{self, Burst};
use super::state::{GameEvent, GamePhase, GameState};
use crate::clamp_to_world;
use crate::consts::*;

/// Screen shake decay rate (per second, exponential)
const SHAKE_DECAY: f32 = 6.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement target in world coordinates (from mouse/touch position)
    pub target: Option<Vec2>,
    /// Start from the title screen
    pub start: bool,
    /// Retry after game over
    pub retry: bool,
    /// Continue after a completed level
    pub advance: bool,
    pub pause: bool,
    pub resume: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the session by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.max(0.0);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot::drive(state, &mut input);
    }
    apply_input(state, &input);

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::Playing => step(state, dt),
        GamePhase::LevelComplete => {
            state.phase_secs += dt;
            if let Some(delay) = state.tuning.level_complete_auto_advance {
                if state.phase_secs >= delay {
                    state.request_advance();
                }
            }
        }
        GamePhase::Title | GamePhase::GameOver => {}
    }

    particles::update(&mut state.particles, dt);
    state.screen_shake *= (-SHAKE_DECAY * dt).exp();
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if let Some(target) = input.target {
        state.set_movement_target(target);
    }
    if input.start {
        state.request_start();
    }
    if input.retry {
        state.request_retry();
    }
    if input.advance {
        state.request_advance();
    }
    if input.pause {
        state.request_pause();
    }
    if input.resume {
        state.request_resume();
    }
}

/// One Playing-phase step
fn step(state: &mut GameState, dt: f32) {
    // The clock does not run while the player is stunned
    let stunned_for = state.player.stun_secs.min(dt);
    state.time_remaining -= dt - stunned_for;

    state.player.stun_secs = (state.player.stun_secs - dt).max(0.0);
    state.player.invuln_secs = (state.player.invuln_secs - dt).max(0.0);
    for adversary in &mut state.adversaries {
        adversary.flee_secs = (adversary.flee_secs - dt).max(0.0);
    }

    move_player(state, dt);
    move_adversaries(state, dt);
    resolve_hit(state);
    collect_items(state);
    deposit(state);

    if state.phase == GamePhase::Playing && state.time_remaining <= 0.0 {
        state.time_remaining = 0.0;
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { level: state.level });
        log::info!("Level {}: time's up", state.level);
    }
}

/// Speed multiplier for a circle at `pos`
fn terrain_factor(state: &GameState, pos: Vec2, radius: f32) -> f32 {
    if overlaps_obstacle(&state.obstacles, pos, radius) {
        state.tuning.obstacle_slow_factor
    } else {
        1.0
    }
}

fn move_player(state: &mut GameState, dt: f32) {
    if state.player.is_stunned() {
        return;
    }

    let to_target = state.player.target - state.player.pos;
    let dist = to_target.length();
    if dist < ARRIVE_DISTANCE {
        state.player.pos = clamp_to_world(state.player.target, PLAYER_RADIUS);
        return;
    }

    state.player.angle = to_target.y.atan2(to_target.x);
    let speed = state.tuning.player_speed * terrain_factor(state, state.player.pos, PLAYER_RADIUS);
    let travel = (speed * dt).min(dist);
    let next = state.player.pos + to_target / dist * travel;
    state.player.pos = clamp_to_world(next, PLAYER_RADIUS);
}

fn move_adversaries(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let player_stunned = state.player.is_stunned();

    for i in 0..state.adversaries.len() {
        let adversary = state.adversaries[i];
        let vel = if adversary.is_fleeing() {
            adversary.flee_dir * state.tuning.flee_speed
        } else if !player_stunned {
            let to_player = player_pos - adversary.pos;
            let dist = to_player.length();
            if dist >= ADVERSARY_MIN_CHASE_DISTANCE {
                to_player / dist * state.tuning.chase_speed
            } else {
                Vec2::ZERO
            }
        } else {
            Vec2::ZERO
        };
        let vel = vel * terrain_factor(state, adversary.pos, ADVERSARY_RADIUS);

        let adversary = &mut state.adversaries[i];
        adversary.vel = vel;
        adversary.pos = clamp_to_world(adversary.pos + vel * dt, ADVERSARY_RADIUS);
    }
}

/// Player vs adversary: the first overlapping adversary lands a hit
fn resolve_hit(state: &mut GameState) {
    if state.player.is_invulnerable() {
        return;
    }
    let player_pos = state.player.pos;
    let Some(adversary) = state
        .adversaries
        .iter_mut()
        .find(|a| circles_overlap(player_pos, PLAYER_RADIUS, a.pos, ADVERSARY_RADIUS))
    else {
        return;
    };

    let tuning = &state.tuning;
    state.player.stun_secs = tuning.stun_secs;
    state.player.invuln_secs = tuning.invuln_secs;

    let away = (adversary.pos - player_pos)
        .try_normalize()
        .unwrap_or(Vec2::ONE.normalize());
    adversary.flee_dir = away;
    adversary.flee_secs = tuning.flee_secs;
    adversary.pos = clamp_to_world(player_pos + away * tuning.retreat_distance, ADVERSARY_RADIUS);

    state.screen_shake = (state.screen_shake + tuning.hit_shake).min(1.0);
    particles::emit(
        &mut state.particles,
        &mut state.fx_rng,
        player_pos + away * PLAYER_RADIUS,
        &Burst::HIT,
        tuning.max_particles,
    );

    let dropped = state.player.carried.min(MAX_DROP_ON_HIT);
    state.player.carried -= dropped;
    for _ in 0..dropped {
        // A ball with nowhere to land is simply lost
        if let Some(ball) = scatter_near(&mut state.rng, &state.obstacles, player_pos) {
            state.collectibles.push(ball);
        }
    }

    state.events.push(GameEvent::Hit { dropped });
    log::debug!("Player hit, dropped {dropped}");
}

fn collect_items(state: &mut GameState) {
    let player_pos = state.player.pos;
    let max_particles = state.tuning.max_particles;

    for ball in state.collectibles.iter_mut().filter(|c| !c.collected) {
        if circles_overlap(player_pos, PLAYER_RADIUS, ball.pos, COLLECTIBLE_RADIUS) {
            ball.collected = true;
            state.player.carried += 1;
            state.events.push(GameEvent::Collect);
            particles::emit(
                &mut state.particles,
                &mut state.fx_rng,
                ball.pos,
                &Burst::COLLECT,
                max_particles,
            );
        }
    }

    let mut taken = Vec::new();
    state.bonuses.retain(|b| {
        let hit = circles_overlap(player_pos, PLAYER_RADIUS, b.pos, BONUS_RADIUS);
        if hit {
            taken.push(b.pos);
        }
        !hit
    });

    for pos in taken {
        state.time_remaining += state.tuning.bonus_time_secs;
        state.events.push(GameEvent::BonusCollect);
        particles::emit(
            &mut state.particles,
            &mut state.fx_rng,
            pos,
            &Burst::BONUS,
            max_particles,
        );
    }
}

fn deposit(state: &mut GameState) {
    let at_goal = circles_overlap(state.player.pos, PLAYER_RADIUS, GOAL_POS, GOAL_RADIUS);
    if !at_goal || state.player.carried == 0 {
        return;
    }

    let count = state.player.carried;
    state.deposited += count;
    state.player.carried = 0;
    state.events.push(GameEvent::Deposit { count });
    particles::emit(
        &mut state.particles,
        &mut state.fx_rng,
        GOAL_POS,
        &Burst::DEPOSIT,
        state.tuning.max_particles,
    );

    if state.deposited >= state.config.required {
        let remaining_secs = state.remaining_time();
        state.phase = GamePhase::LevelComplete;
        state.phase_secs = 0.0;
        state.last_completion_secs = Some(remaining_secs);
        state.retries.remove(&state.level);
        state.events.push(GameEvent::LevelComplete {
            level: state.level,
            remaining_secs,
        });
        log::info!(
            "Level {} complete with {:.1}s left",
            state.level,
            remaining_secs
        );
    }
}
