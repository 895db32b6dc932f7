//! Level table, difficulty scaling and the generate-and-validate loop

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::generate::{
    generate_adversaries, generate_bonuses, generate_collectibles, generate_obstacles,
};
use super::reachability::layout_playable;
use super::state::{Adversary, BonusCollectible, Collectible, Obstacle};
use crate::consts::*;

/// Parameters for one level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Balls that must be deposited to finish
    pub required: u32,
    /// Seconds on the clock
    pub time_limit: u32,
    pub obstacle_count: u32,
    pub adversary_count: u32,
}

impl LevelConfig {
    const fn new(
        required: u32,
        time_limit: u32,
        obstacle_count: u32,
        adversary_count: u32,
    ) -> Self {
        Self {
            required,
            time_limit,
            obstacle_count,
            adversary_count,
        }
    }

    /// Base configuration for a 1-based level, extended past the authored table
    pub fn base(level: u32) -> Self {
        let level = level.max(1);
        let last = LEVEL_TABLE.len() as u32;
        let index = (level.min(last) - 1) as usize;
        let mut config = LEVEL_TABLE[index];

        let extra = level.saturating_sub(last);
        if extra > 0 {
            config.required = config
                .required
                .saturating_add(extra.saturating_mul(2))
                .min(MAX_REQUIRED);
            config.obstacle_count = config
                .obstacle_count
                .saturating_add(extra / 2)
                .min(MAX_OBSTACLES);
            config.adversary_count = config
                .adversary_count
                .saturating_add(extra / 3)
                .min(MAX_ADVERSARIES);
        }
        config
    }

    /// Configuration for a level after `retries` failed attempts
    ///
    /// More retries never make a level harder: the clock grows (capped) and
    /// tree/adversary counts shrink (floored).
    pub fn for_level(level: u32, retries: u32) -> Self {
        let base = Self::base(level);
        Self {
            required: base.required,
            time_limit: base
                .time_limit
                .saturating_add(retries.saturating_mul(RETRY_TIME_STEP).min(RETRY_TIME_CAP)),
            obstacle_count: base
                .obstacle_count
                .saturating_sub(retries / 3)
                .max(RETRY_MIN_OBSTACLES),
            adversary_count: base.adversary_count.saturating_sub(retries / 2),
        }
    }
}

/// Authored levels 1..=10
pub const LEVEL_TABLE: [LevelConfig; 10] = [
    LevelConfig::new(5, 90, 4, 0),
    LevelConfig::new(8, 85, 5, 1),
    LevelConfig::new(10, 80, 6, 1),
    LevelConfig::new(12, 75, 7, 2),
    LevelConfig::new(15, 70, 8, 2),
    LevelConfig::new(20, 65, 9, 3),
    LevelConfig::new(25, 60, 10, 3),
    LevelConfig::new(35, 55, 11, 4),
    LevelConfig::new(42, 50, 12, 4),
    LevelConfig::new(50, 45, 14, 5),
];

/// Ceilings for procedurally extended levels
pub const MAX_REQUIRED: u32 = 60;
pub const MAX_OBSTACLES: u32 = 18;
pub const MAX_ADVERSARIES: u32 = 6;

/// Retry easing
pub const RETRY_TIME_STEP: u32 = 4;
pub const RETRY_TIME_CAP: u32 = 20;
pub const RETRY_MIN_OBSTACLES: u32 = 3;

/// Time-bonus pickups for a level (none on the first two)
pub fn bonus_count(level: u32) -> u32 {
    if level < 3 { 0 } else { (1 + level / 4).min(3) }
}

/// How a level layout was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation attempts made (1-based, at most GENERATION_ATTEMPTS)
    pub attempts: u32,
    /// True when every attempt failed and the sparse layout was used
    pub fallback: bool,
    /// Trees asked for on the accepted attempt
    pub obstacle_count: u32,
    /// Adversaries spawned on the accepted attempt
    pub adversary_count: u32,
}

/// A freshly generated level
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub bonuses: Vec<BonusCollectible>,
    pub adversaries: Vec<Adversary>,
    pub report: GenerationReport,
}

/// Tree and adversary counts for 1-based generation attempt `attempt`
///
/// Easing is cumulative: every attempt past the 8th removes one more tree
/// (never below 2, or the configured count if that is smaller), and every
/// attempt past the 10th removes one more adversary. Attempt 14 therefore
/// asks for 6 fewer trees and 4 fewer adversaries than attempt 1.
pub fn attempt_counts(config: &LevelConfig, attempt: u32) -> (u32, u32) {
    let obstacle_count = config
        .obstacle_count
        .saturating_sub(attempt.saturating_sub(OBSTACLE_EASING_AFTER))
        .max(MIN_GENERATED_OBSTACLES.min(config.obstacle_count));
    let adversary_count = config
        .adversary_count
        .saturating_sub(attempt.saturating_sub(ADVERSARY_EASING_AFTER));
    (obstacle_count, adversary_count)
}

/// Build a playable layout for `config`, easing off after repeated failures
///
/// Counts per attempt come from [`attempt_counts`]. If all attempts fail, a
/// sparse layout is returned unconditionally so the level always starts.
pub fn generate_level<R: Rng + ?Sized>(
    rng: &mut R,
    config: &LevelConfig,
    level: u32,
) -> LevelLayout {
    for attempt in 1..=GENERATION_ATTEMPTS {
        let (obstacle_count, adversary_count) = attempt_counts(config, attempt);

        let obstacles = generate_obstacles(rng, obstacle_count);
        let collectibles = generate_collectibles(rng, &obstacles, config.required);
        let adversaries = generate_adversaries(rng, adversary_count);

        let enough = collectibles.len() as u32 >= config.required;
        if enough && layout_playable(&obstacles, &collectibles, config.required) {
            log::debug!("Level {level} layout accepted on attempt {attempt}");
            let bonuses = generate_bonuses(rng, &obstacles, &collectibles, bonus_count(level));
            return LevelLayout {
                obstacles,
                collectibles,
                bonuses,
                adversaries,
                report: GenerationReport {
                    attempts: attempt,
                    fallback: false,
                    obstacle_count,
                    adversary_count,
                },
            };
        }
        log::debug!("Level {level} attempt {attempt} rejected");
    }

    let obstacle_count = FALLBACK_OBSTACLES.min(config.obstacle_count);
    let adversary_count = config
        .adversary_count
        .saturating_sub(FALLBACK_ADVERSARY_REDUCTION);
    log::info!("Level {level}: using fallback layout");

    let obstacles = generate_obstacles(rng, obstacle_count);
    let collectibles = generate_collectibles(rng, &obstacles, config.required);
    let adversaries = generate_adversaries(rng, adversary_count);
    let bonuses = generate_bonuses(rng, &obstacles, &collectibles, bonus_count(level));
    LevelLayout {
        obstacles,
        collectibles,
        bonuses,
        adversaries,
        report: GenerationReport {
            attempts: GENERATION_ATTEMPTS,
            fallback: true,
            obstacle_count,
            adversary_count,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::reachability::{ReachabilityGrid, count_reachable};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_level_one_no_retries() {
        let config = LevelConfig::for_level(1, 0);
        assert_eq!(config, LevelConfig::new(5, 90, 4, 0));
    }

    #[test]
    fn test_table_clamps_and_extends() {
        assert_eq!(LevelConfig::base(0), LEVEL_TABLE[0]);
        assert_eq!(LevelConfig::base(10), LEVEL_TABLE[9]);

        let eleven = LevelConfig::base(11);
        assert_eq!(eleven.required, 52);
        assert_eq!(eleven.time_limit, 45);
        assert_eq!(eleven.obstacle_count, 14);
        assert_eq!(eleven.adversary_count, 5);

        let far = LevelConfig::base(500);
        assert_eq!(far.required, MAX_REQUIRED);
        assert_eq!(far.obstacle_count, MAX_OBSTACLES);
        assert_eq!(far.adversary_count, MAX_ADVERSARIES);
        assert!(far.required <= COLLECTIBLE_CAP);
    }

    #[test]
    fn test_extension_is_monotonic() {
        let mut prev = LevelConfig::base(10);
        for level in 11..60 {
            let next = LevelConfig::base(level);
            assert!(next.required >= prev.required);
            assert!(next.obstacle_count >= prev.obstacle_count);
            assert!(next.adversary_count >= prev.adversary_count);
            prev = next;
        }
    }

    #[test]
    fn test_retry_easing_at_level_ten() {
        let config = LevelConfig::for_level(10, 6);
        assert_eq!(config.required, 50);
        assert_eq!(config.time_limit, 45 + 20);
        assert_eq!(config.obstacle_count, 12);
        assert_eq!(config.adversary_count, 2);
    }

    #[test]
    fn test_huge_level_and_retries_saturate() {
        let config = LevelConfig::for_level(u32::MAX, u32::MAX);
        assert_eq!(config.required, MAX_REQUIRED);
        assert_eq!(config.time_limit, 45 + RETRY_TIME_CAP);
        assert_eq!(config.obstacle_count, RETRY_MIN_OBSTACLES);
        assert_eq!(config.adversary_count, 0);

        let base = LevelConfig::base(u32::MAX);
        assert_eq!(base.obstacle_count, MAX_OBSTACLES);
        assert_eq!(base.adversary_count, MAX_ADVERSARIES);
        assert_eq!(LevelConfig::for_level(1, u32::MAX).time_limit, 90 + RETRY_TIME_CAP);
    }

    #[test]
    fn test_attempt_counts_schedule() {
        let config = LevelConfig::new(20, 60, 10, 5);
        let expected = [
            (1, (10, 5)),
            (8, (10, 5)),
            (9, (9, 5)),
            (10, (8, 5)),
            (11, (7, 4)),
            (14, (4, 1)),
        ];
        for (attempt, counts) in expected {
            assert_eq!(attempt_counts(&config, attempt), counts, "attempt {attempt}");
        }
    }

    #[test]
    fn test_attempt_counts_floors() {
        // Trees bottom out at 2, adversaries at 0
        let config = LevelConfig::new(20, 60, 5, 2);
        assert_eq!(attempt_counts(&config, 11), (2, 1));
        assert_eq!(attempt_counts(&config, 14), (2, 0));

        // A config asking for fewer trees than the floor is left alone
        let sparse = LevelConfig::new(5, 90, 1, 0);
        assert_eq!(attempt_counts(&sparse, 14), (1, 0));
    }

    #[test]
    fn test_bonus_count() {
        assert_eq!(bonus_count(1), 0);
        assert_eq!(bonus_count(2), 0);
        assert_eq!(bonus_count(3), 1);
        assert_eq!(bonus_count(4), 2);
        assert_eq!(bonus_count(40), 3);
    }

    #[test]
    fn test_level_one_accepted_without_easing() {
        for seed in 0..16 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let config = LevelConfig::for_level(1, 0);
            let layout = generate_level(&mut rng, &config, 1);
            assert!(!layout.report.fallback, "seed {seed} fell back");
            assert!(layout.report.attempts <= OBSTACLE_EASING_AFTER);
            assert_eq!(layout.report.obstacle_count, 4);
            assert!(layout.adversaries.is_empty());
            assert!(layout.bonuses.is_empty());
            assert_eq!(layout.collectibles.len(), 20);
        }
    }

    #[test]
    fn test_accepted_layout_is_reachable() {
        for (seed, level) in [(1u64, 3u32), (2, 6), (3, 9), (4, 14)] {
            let mut rng = Pcg32::seed_from_u64(seed);
            let config = LevelConfig::for_level(level, 0);
            let layout = generate_level(&mut rng, &config, level);
            if layout.report.fallback {
                continue;
            }
            let grid = ReachabilityGrid::new(&layout.obstacles);
            assert!(grid.has_path(PLAYER_START, GOAL_POS));
            let required = config.required as usize;
            assert!(count_reachable(&grid, &layout.collectibles, required) >= required);
        }
    }

    #[test]
    fn test_impossible_config_falls_back() {
        // More balls required than can ever be generated
        let config = LevelConfig::new(COLLECTIBLE_CAP + 1, 60, 10, 5);
        let mut rng = Pcg32::seed_from_u64(9);
        let layout = generate_level(&mut rng, &config, 99);
        assert!(layout.report.fallback);
        assert_eq!(layout.report.attempts, GENERATION_ATTEMPTS);
        assert_eq!(layout.report.obstacle_count, FALLBACK_OBSTACLES);
        assert_eq!(layout.report.adversary_count, 3);
        assert_eq!(layout.adversaries.len(), 3);
        assert!(!layout.collectibles.is_empty());
        assert!(layout.obstacles.len() <= FALLBACK_OBSTACLES as usize);
    }

    proptest! {
        #[test]
        fn prop_retries_never_harder(
            level in prop_oneof![1u32..40, Just(u32::MAX - 1)],
            retries in prop_oneof![0u32..30, Just(u32::MAX - 1)],
        ) {
            let now = LevelConfig::for_level(level, retries);
            let next = LevelConfig::for_level(level, retries + 1);
            prop_assert_eq!(now.required, next.required);
            prop_assert!(next.time_limit >= now.time_limit);
            prop_assert!(next.obstacle_count <= now.obstacle_count);
            prop_assert!(next.adversary_count <= now.adversary_count);
            prop_assert!(next.time_limit <= LevelConfig::base(level).time_limit + RETRY_TIME_CAP);
            prop_assert!(next.obstacle_count >= RETRY_MIN_OBSTACLES);
        }
    }
}
