//! Speed, spawn cadence and level length as functions of progress

use crate::consts::*;

/// World scroll speed for a score and level, capped at `GAME_SPEED_MAX`
pub fn world_speed(score: i64, level: u32) -> f32 {
    let target = GAME_SPEED_INITIAL
        + score as f32 * SPEED_SCALE_PER_POINT
        + level.saturating_sub(1) as f32 * SPEED_PER_LEVEL;
    target.min(GAME_SPEED_MAX)
}

/// Milliseconds between regular spawns, floored at `SPAWN_RATE_MIN`
pub fn spawn_interval_ms(score: i64, level: u32) -> f64 {
    (SPAWN_RATE_INITIAL - score as f64 * 1.5 - level as f64 * 50.0).max(SPAWN_RATE_MIN)
}

/// Length of a level (distance from its start to its boss)
pub fn level_distance(level: u32) -> f32 {
    LEVEL_DISTANCE_BASE * LEVEL_DISTANCE_SCALING.powi(level.saturating_sub(1) as i32)
}

/// Boss threshold for `level`, measured from `current_distance`
pub fn next_boss_distance(current_distance: f32, level: u32) -> f32 {
    current_distance + level_distance(level)
}

/// Boss health for a level (exponential)
pub fn boss_health(level: u32) -> i64 {
    (BOSS_BASE_HEALTH * BOSS_HP_SCALING.powi(level.saturating_sub(1) as i32)).floor() as i64
}

/// Score bonus for reaching `new_level`
pub fn level_bonus(new_level: u32) -> i64 {
    100 * new_level.saturating_sub(1) as i64
}

/// 0 at starting speed, 1 at max speed
pub fn speed_intensity(speed: f32) -> f32 {
    ((speed - GAME_SPEED_INITIAL) / (GAME_SPEED_MAX - GAME_SPEED_INITIAL)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_values() {
        assert_eq!(world_speed(0, 1), GAME_SPEED_INITIAL);
        assert_eq!(world_speed(100, 2), 600.0 + 20.0 + 100.0);
        assert_eq!(world_speed(1_000_000, 1), GAME_SPEED_MAX);
        assert_eq!(spawn_interval_ms(20, 1), 1000.0 - 30.0 - 50.0);
        assert_eq!(spawn_interval_ms(10_000, 1), SPAWN_RATE_MIN);
    }

    #[test]
    fn test_boss_scaling() {
        assert_eq!(boss_health(1), 150);
        assert_eq!(boss_health(2), 270);
        assert_eq!(boss_health(3), 486);
    }

    #[test]
    fn test_level_distances() {
        assert_eq!(level_distance(1), 10000.0);
        assert!((level_distance(2) - 12000.0).abs() < 0.01);
        assert!((next_boss_distance(10500.0, 2) - 22500.0).abs() < 0.01);
        assert_eq!(level_bonus(2), 100);
        assert_eq!(level_bonus(1), 0);
    }

    proptest! {
        #[test]
        fn prop_speed_non_decreasing_in_score(a in 0i64..50_000, b in 0i64..50_000, level in 1u32..20) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(world_speed(lo, level) <= world_speed(hi, level));
            prop_assert!(world_speed(hi, level) <= GAME_SPEED_MAX);
        }

        #[test]
        fn prop_cadence_non_increasing(
            a in 0i64..50_000,
            b in 0i64..50_000,
            la in 1u32..30,
            lb in 1u32..30,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (llo, lhi) = if la <= lb { (la, lb) } else { (lb, la) };
            prop_assert!(spawn_interval_ms(hi, llo) <= spawn_interval_ms(lo, llo));
            prop_assert!(spawn_interval_ms(lo, lhi) <= spawn_interval_ms(lo, llo));
            prop_assert!(spawn_interval_ms(hi, lhi) >= SPAWN_RATE_MIN);
        }
    }
}
