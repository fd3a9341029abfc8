//! Combat Rules
//!
//! Melee reach, strike direction and knock-back displacement, shared by
//! the player and every hostile tier.

use crate::core::direction::Direction;
use crate::core::vec2::Vec2;

/// Horizontal deltas smaller than this are treated as zero.
pub const AXIS_EPSILON: f64 = 1e-9;

/// A swing in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Attack {
    /// Side being swung at
    pub dir: Direction,
    /// Tick the swing started
    pub started: u64,
}

/// Whether `target` is on the side of `attacker` that a swing towards
/// `dir` covers. The dividing line itself counts.
pub fn in_strike_zone(attacker: Vec2, dir: Direction, target: Vec2) -> bool {
    match dir {
        Direction::North => target.y <= attacker.y,
        Direction::East => target.x >= attacker.x,
        Direction::South => target.y >= attacker.y,
        Direction::West => target.x <= attacker.x,
    }
}

/// Speed split between the axes by the angle of `delta`.
///
/// Returns non-negative `(x, y)` components whose vector length is
/// `speed`. A vanishing horizontal delta gives a purely vertical split.
pub fn axis_speeds(delta: Vec2, speed: f64) -> (f64, f64) {
    if delta.x.abs() < AXIS_EPSILON {
        return (0.0, speed);
    }
    let angle = (delta.y.abs() / delta.x.abs()).atan();
    (angle.cos() * speed, angle.sin() * speed)
}

/// Sign pushing `d` further from zero; a tie pushes negative.
#[inline]
fn away_sign(d: f64) -> f64 {
    if d <= 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Displacement pushing an actor at `position` away from `source`.
pub fn knockback(position: Vec2, source: Vec2, speed: f64) -> Vec2 {
    let delta = position - source;
    let (sx, sy) = axis_speeds(delta, speed);
    Vec2::new(away_sign(delta.x) * sx, away_sign(delta.y) * sy)
}

/// Displacement moving an actor at `position` towards `target`.
pub fn pursuit(position: Vec2, target: Vec2, speed: f64) -> Vec2 {
    knockback(position, target, speed).negate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strike_zone() {
        let p = Vec2::new(100.0, 100.0);
        let south = Vec2::new(100.0, 120.0);
        assert!(in_strike_zone(p, Direction::South, south));
        assert!(!in_strike_zone(p, Direction::North, south));
        assert!(in_strike_zone(p, Direction::East, Vec2::new(130.0, 50.0)));
        assert!(!in_strike_zone(p, Direction::West, Vec2::new(130.0, 50.0)));
        // Level with the player counts for both sides of that axis.
        assert!(in_strike_zone(p, Direction::North, Vec2::new(90.0, 100.0)));
        assert!(in_strike_zone(p, Direction::South, Vec2::new(90.0, 100.0)));
    }

    #[test]
    fn test_knockback_pushes_away() {
        let kb = knockback(Vec2::new(110.0, 100.0), Vec2::new(100.0, 100.0), 3.0);
        assert!((kb.x - 3.0).abs() < 1e-9);
        assert!(kb.y.abs() < 1e-9 || kb.y < 0.0);
    }

    #[test]
    fn test_knockback_vertical_when_aligned() {
        // Directly below the source: straight down, no NaN.
        let kb = knockback(Vec2::new(100.0, 130.0), Vec2::new(100.0, 100.0), 2.0);
        assert_eq!(kb.x, 0.0);
        assert_eq!(kb.y, 2.0);

        // Same point: still finite.
        let kb = knockback(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 2.0);
        assert!(kb.is_finite());
        assert_eq!(kb.length(), 2.0);
    }

    #[test]
    fn test_pursuit_moves_closer() {
        let from = Vec2::new(0.0, 0.0);
        let to = Vec2::new(30.0, 40.0);
        let step = pursuit(from, to, 5.0);
        assert!((step.x - 3.0).abs() < 1e-9);
        assert!((step.y - 4.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn test_displacement_length_is_speed(
            px in -500.0f64..500.0, py in -500.0f64..500.0,
            sx in -500.0f64..500.0, sy in -500.0f64..500.0,
            speed in 0.1f64..10.0,
        ) {
            let kb = knockback(Vec2::new(px, py), Vec2::new(sx, sy), speed);
            prop_assert!(kb.is_finite());
            prop_assert!((kb.length() - speed).abs() < 1e-6);
        }
    }
}
