//! Idle/demo autopilot
//!
//! Fetches the nearest ball, heads home once it carries enough, and sidesteps
//! adversaries that get close. Also presses through the menus.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::consts::*;

/// Carry at most this many before heading for the goal
const HAUL_SIZE: u32 = 5;
/// Adversaries closer than this are dodged
const DODGE_RADIUS: f32 = 90.0;
/// How far to step sideways when dodging
const DODGE_STEP: f32 = 120.0;
/// Grab bonus pickups when the clock gets this low
const BONUS_HUNT_SECS: f32 = 20.0;

/// Fill in `input` the way a player would
pub fn drive(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Title => input.start = true,
        GamePhase::GameOver => input.retry = true,
        GamePhase::LevelComplete => input.advance = true,
        GamePhase::Paused => {}
        GamePhase::Playing => input.target = Some(choose_target(state)),
    }
}

/// Where the autopilot wants to walk this frame
pub fn choose_target(state: &GameState) -> Vec2 {
    let pos = state.player.pos;

    let threat = state
        .adversaries
        .iter()
        .filter(|a| !a.is_fleeing())
        .map(|a| (a.pos, a.pos.distance(pos)))
        .filter(|&(_, d)| d < DODGE_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((threat_pos, _)) = threat {
        let away = (pos - threat_pos).normalize_or_zero();
        // Step diagonally so we don't just pin ourselves against a wall
        let side = away.perp();
        return pos + (away + side * 0.5) * DODGE_STEP;
    }

    let still_needed = state.config.required.saturating_sub(state.deposited);
    let haul = HAUL_SIZE.min(still_needed.max(1));
    if state.player.carried >= haul {
        return GOAL_POS;
    }

    if state.remaining_time() < BONUS_HUNT_SECS {
        if let Some(bonus) = nearest(pos, state.bonuses.iter().map(|b| b.pos)) {
            return bonus;
        }
    }

    nearest(
        pos,
        state
            .collectibles
            .iter()
            .filter(|c| !c.collected)
            .map(|c| c.pos),
    )
    .unwrap_or(GOAL_POS)
}

fn nearest(from: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| a.distance(from).total_cmp(&b.distance(from)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Adversary, BonusCollectible, Collectible};
    use crate::sim::tick::tick;

    fn playing() -> GameState {
        let mut state = GameState::new(77);
        state.request_start();
        state.obstacles.clear();
        state.collectibles.clear();
        state.bonuses.clear();
        state.adversaries.clear();
        state
    }

    #[test]
    fn test_presses_start() {
        let state = GameState::new(1);
        let mut input = TickInput::default();
        drive(&state, &mut input);
        assert!(input.start);
    }

    #[test]
    fn test_goes_for_nearest_ball() {
        let mut state = playing();
        state.collectibles.push(Collectible::new(Vec2::new(700.0, 500.0)));
        state.collectibles.push(Collectible::new(Vec2::new(200.0, 250.0)));
        assert_eq!(choose_target(&state), Vec2::new(200.0, 250.0));
    }

    #[test]
    fn test_heads_home_when_loaded() {
        let mut state = playing();
        state.collectibles.push(Collectible::new(Vec2::new(200.0, 250.0)));
        state.player.carried = HAUL_SIZE;
        assert_eq!(choose_target(&state), GOAL_POS);

        // One short of finishing: go home with what we have
        state.player.carried = 1;
        state.deposited = state.config.required - 1;
        assert_eq!(choose_target(&state), GOAL_POS);
    }

    #[test]
    fn test_dodges_close_adversary() {
        let mut state = playing();
        state.collectibles.push(Collectible::new(Vec2::new(600.0, 300.0)));
        state
            .adversaries
            .push(Adversary::new(state.player.pos + Vec2::new(50.0, 0.0)));
        let target = choose_target(&state);
        assert!(target.x < state.player.pos.x);
    }

    #[test]
    fn test_hunts_bonus_when_short_on_time() {
        let mut state = playing();
        state.collectibles.push(Collectible::new(Vec2::new(200.0, 250.0)));
        state.bonuses.push(BonusCollectible {
            pos: Vec2::new(700.0, 100.0),
        });
        state.time_remaining = 10.0;
        assert_eq!(choose_target(&state), Vec2::new(700.0, 100.0));
    }

    #[test]
    fn test_soak_clears_level_one() {
        let mut state = GameState::new(2024);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut completed = false;
        for _ in 0..(60 * 90) {
            tick(&mut state, &input, 1.0 / 60.0);
            if state
                .drain_events()
                .iter()
                .any(|e| matches!(e, crate::sim::GameEvent::LevelComplete { .. }))
            {
                completed = true;
                break;
            }
        }
        assert!(completed, "autopilot failed level 1");
        assert_eq!(state.level, 1);
    }
}
