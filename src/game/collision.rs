//! Collision and Movement
//!
//! Movement is resolved one axis at a time. Each axis is tested against
//! the two grid cells just beyond the mover's leading edge and against
//! nearby actors on the far side; a blocked axis is dropped while the
//! other still applies, so actors slide along walls and each other.

use crate::core::direction::Direction;
use crate::core::vec2::Vec2;
use crate::game::entity::{Actor, Stance};
use crate::game::tile::TileKind;
use crate::game::zone::TileGrid;

/// Something a mover can bump into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    /// Centre
    pub position: Vec2,
    /// Collision radius (half of size)
    pub radius: f64,
    /// Inside its own post-hit window; recoiling actors don't block
    pub recoiling: bool,
}

/// Which axes of a requested move were applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// X displacement applied
    pub moved_x: bool,
    /// Y displacement applied
    pub moved_y: bool,
}

/// Check if two circles overlap or touch.
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f64, pos_b: Vec2, radius_b: f64) -> bool {
    let combined = radius_a + radius_b;
    pos_a.distance_squared(pos_b) <= combined * combined
}

/// Try to move an actor by `delta`.
///
/// Both axes are tested from the starting position before either is
/// applied.
pub fn attempt_move(
    actor: &mut Actor,
    delta: Vec2,
    grid: &TileGrid,
    obstacles: &[Obstacle],
    tick: u64,
) -> MoveOutcome {
    let x_dir = match delta.x {
        d if d < 0.0 => Some(Direction::West),
        d if d > 0.0 => Some(Direction::East),
        _ => None,
    };
    let y_dir = match delta.y {
        d if d < 0.0 => Some(Direction::North),
        d if d > 0.0 => Some(Direction::South),
        _ => None,
    };

    let free = |dir: Option<Direction>| dir.is_some_and(|d| !axis_blocked(actor, d, grid, obstacles, tick));
    let outcome = MoveOutcome {
        moved_x: free(x_dir),
        moved_y: free(y_dir),
    };

    if outcome.moved_x {
        actor.position.x += delta.x;
    }
    if outcome.moved_y {
        actor.position.y += delta.y;
    }
    outcome
}

/// Whether moving the actor one step towards `dir` is vetoed.
pub fn axis_blocked(
    actor: &Actor,
    dir: Direction,
    grid: &TileGrid,
    obstacles: &[Obstacle],
    tick: u64,
) -> bool {
    tile_blocked(actor, dir, grid) || actor_blocked(actor, dir, obstacles, tick)
}

/// The two probe points just beyond the leading edge.
pub fn edge_probes(position: Vec2, radius: f64, dir: Direction) -> [Vec2; 2] {
    let (x, y, r) = (position.x, position.y, radius);
    match dir {
        Direction::North => [Vec2::new(x + r, y - r - 1.0), Vec2::new(x - r, y - r - 1.0)],
        Direction::East => [Vec2::new(x + r + 1.0, y - r), Vec2::new(x + r + 1.0, y + r)],
        Direction::South => [Vec2::new(x + r, y + r + 1.0), Vec2::new(x - r, y + r + 1.0)],
        Direction::West => [Vec2::new(x - r - 1.0, y - r), Vec2::new(x - r - 1.0, y + r)],
    }
}

/// Tile test. Cells outside the grid count as solid.
fn tile_blocked(actor: &Actor, dir: Direction, grid: &TileGrid) -> bool {
    edge_probes(actor.position, actor.radius(), dir)
        .iter()
        .any(|probe| grid.tile_at_point(*probe).map_or(true, |tile| tile.is_collidable()))
}

/// Actor test: only obstacles on the far side along the axis count.
fn actor_blocked(actor: &Actor, dir: Direction, obstacles: &[Obstacle], tick: u64) -> bool {
    if actor.hits.is_recoiling(tick) {
        return false;
    }
    let here = actor.position;
    obstacles.iter().any(|other| {
        let ahead = match dir {
            Direction::North => here.y > other.position.y,
            Direction::East => here.x < other.position.x,
            Direction::South => here.y < other.position.y,
            Direction::West => here.x > other.position.x,
        };
        ahead
            && !other.recoiling
            && circles_overlap(here, actor.radius(), other.position, other.radius)
    })
}

/// Kill a grounded actor standing on a pit. Returns true if it died here.
pub fn pit_check(actor: &mut Actor, grid: &TileGrid) -> bool {
    if !actor.alive || actor.stance != Stance::Grounded {
        return false;
    }
    if grid.tile_under(actor.position).kind() == TileKind::Pit {
        actor.alive = false;
        return true;
    }
    false
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tile::{Tile, TileKind};
    use proptest::prelude::*;

    /// 10x10 open grid with a solid border.
    fn walled_grid() -> TileGrid {
        let mut tiles = Vec::new();
        for row in 0..10 {
            for col in 0..10 {
                let edge = row == 0 || col == 0 || row == 9 || col == 9;
                tiles.push(if edge { Tile::new(TileKind::Wall) } else { Tile::open() });
            }
        }
        TileGrid::new(10, 10, 32, tiles)
    }

    fn actor_at(x: f64, y: f64) -> Actor {
        Actor::new(Vec2::new(x, y))
    }

    #[test]
    fn test_free_move() {
        let grid = walled_grid();
        let mut a = actor_at(160.0, 160.0);
        let out = attempt_move(&mut a, Vec2::new(2.0, -3.0), &grid, &[], 1);
        assert_eq!(out, MoveOutcome { moved_x: true, moved_y: true });
        assert_eq!(a.position, Vec2::new(162.0, 157.0));
    }

    #[test]
    fn test_wall_slide() {
        let grid = walled_grid();
        // Flush against the west wall (x = 32 is the first open column).
        let mut a = actor_at(42.0, 160.0);
        let out = attempt_move(&mut a, Vec2::new(-1.0, 1.0), &grid, &[], 1);
        assert!(!out.moved_x);
        assert!(out.moved_y);
        assert_eq!(a.position, Vec2::new(42.0, 161.0));
    }

    #[test]
    fn test_axes_tested_from_start_position() {
        // Lone wall at (5, 5). Moving diagonally towards its corner is clear on
        // both axes from where the actor starts, so both apply.
        let mut tiles = vec![Tile::open(); 100];
        tiles[5 * 10 + 5] = Tile::new(TileKind::Wall);
        let grid = TileGrid::new(10, 10, 32, tiles);

        let mut a = actor_at(147.0, 149.5);
        let out = attempt_move(&mut a, Vec2::new(3.0, 3.0), &grid, &[], 1);
        assert_eq!(out, MoveOutcome { moved_x: true, moved_y: true });
        assert_eq!(a.position, Vec2::new(150.0, 152.5));
    }

    #[test]
    fn test_actor_blocks_only_far_side() {
        let grid = walled_grid();
        let other = Obstacle { position: Vec2::new(175.0, 160.0), radius: 10.0, recoiling: false };

        // Other is east and touching: moving east is vetoed.
        let mut a = actor_at(160.0, 160.0);
        assert!(!attempt_move(&mut a, Vec2::new(1.0, 0.0), &grid, &[other], 1).moved_x);

        // Moving west (away) is allowed.
        assert!(attempt_move(&mut a, Vec2::new(-1.0, 0.0), &grid, &[other], 1).moved_x);
    }

    #[test]
    fn test_recoiling_actors_pass_through() {
        let grid = walled_grid();
        let mut other = Obstacle { position: Vec2::new(175.0, 160.0), radius: 10.0, recoiling: true };
        let mut a = actor_at(160.0, 160.0);
        assert!(attempt_move(&mut a, Vec2::new(1.0, 0.0), &grid, &[other], 1).moved_x);

        // Mover inside its own window ignores everyone.
        other.recoiling = false;
        a.hits.strike(5);
        assert!(attempt_move(&mut a, Vec2::new(1.0, 0.0), &grid, &[other], 6).moved_x);
    }

    #[test]
    fn test_pit_kills_only_grounded() {
        let mut tiles = vec![Tile::open(); 9];
        tiles[4] = Tile::new(TileKind::Pit);
        let grid = TileGrid::new(3, 3, 32, tiles);

        let mut airborne = actor_at(48.0, 48.0);
        airborne.stance = Stance::Airborne;
        assert!(!pit_check(&mut airborne, &grid));
        assert!(airborne.alive);

        let mut grounded = actor_at(48.0, 48.0);
        assert!(pit_check(&mut grounded, &grid));
        assert!(!grounded.alive);

        let mut beside = actor_at(16.0, 16.0);
        assert!(!pit_check(&mut beside, &grid));
    }

    proptest! {
        #[test]
        fn test_single_axis_block_keeps_other_axis(
            y in 60.0f64..250.0,
            dy in prop_oneof![-3.0f64..-0.5, 0.5f64..3.0],
        ) {
            let grid = walled_grid();
            // Against the east wall: x axis blocked, y axis free.
            let mut a = actor_at(277.0, y);
            let out = attempt_move(&mut a, Vec2::new(2.0, dy), &grid, &[], 1);
            prop_assert!(!out.moved_x);
            prop_assert!(out.moved_y);
            prop_assert_eq!(a.position.x, 277.0);
            prop_assert_eq!(a.position.y, y + dy);
        }
    }
}
