//! Tiles
//!
//! One fixed-size grid cell: terrain type, collidability and orientation.
//! Tiles are built once by the zone decoder; opening a lock is the only
//! mutation they ever see.

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;

/// Tier of a lock, matched against key tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LockTier {
    /// Opened by Key I
    I = 1,
    /// Opened by Key II
    II = 2,
    /// Opened by Key III
    III = 3,
}

/// Terrain type of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Walkable floor
    Open,
    /// Solid wall
    Wall,
    /// Kills grounded actors that stand on it
    Pit,
    /// Moves the player to another zone
    Teleport {
        /// Destination zone index
        destination: usize,
    },
    /// Solid until opened with a key of the same tier
    Lock(LockTier),
}

impl TileKind {
    /// Stable tag for hashing and render snapshots.
    pub fn tag(self) -> u8 {
        match self {
            TileKind::Open => 0,
            TileKind::Wall => 1,
            TileKind::Pit => 2,
            TileKind::Teleport { .. } => 3,
            TileKind::Lock(tier) => 3 + tier as u8,
        }
    }
}

/// A single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    kind: TileKind,
    collidable: bool,
    orientation: Direction,
}

impl Tile {
    /// Create a tile facing north.
    pub fn new(kind: TileKind) -> Self {
        Self::oriented(kind, Direction::North)
    }

    /// Create a tile with an explicit orientation.
    pub fn oriented(kind: TileKind, orientation: Direction) -> Self {
        let collidable = matches!(kind, TileKind::Wall | TileKind::Lock(_));
        Self {
            kind,
            collidable,
            orientation,
        }
    }

    /// Open floor.
    pub fn open() -> Self {
        Self::new(TileKind::Open)
    }

    /// Terrain type.
    #[inline]
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Whether movement into this tile is blocked.
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.collidable
    }

    /// Facing, used by locks.
    #[inline]
    pub fn orientation(&self) -> Direction {
        self.orientation
    }

    /// Destination zone if this is a teleport.
    pub fn teleport_destination(&self) -> Option<usize> {
        match self.kind {
            TileKind::Teleport { destination } => Some(destination),
            _ => None,
        }
    }

    /// Tier of a still-closed lock.
    pub fn closed_lock(&self) -> Option<LockTier> {
        match self.kind {
            TileKind::Lock(tier) if self.collidable => Some(tier),
            _ => None,
        }
    }

    /// Open a lock. Returns false (and changes nothing) for any other tile
    /// or a lock that is already open.
    pub fn open_lock(&mut self) -> bool {
        if self.closed_lock().is_none() {
            return false;
        }
        self.collidable = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_kind() -> impl Strategy<Value = TileKind> {
        prop_oneof![
            Just(TileKind::Open),
            Just(TileKind::Wall),
            Just(TileKind::Pit),
            (0usize..16).prop_map(|destination| TileKind::Teleport { destination }),
            Just(TileKind::Lock(LockTier::I)),
            Just(TileKind::Lock(LockTier::II)),
            Just(TileKind::Lock(LockTier::III)),
        ]
    }

    proptest! {
        #[test]
        fn test_collidable_iff_wall_or_closed_lock(kind in any_kind()) {
            let tile = Tile::new(kind);
            let expected = matches!(kind, TileKind::Wall | TileKind::Lock(_));
            prop_assert_eq!(tile.is_collidable(), expected);
        }

        #[test]
        fn test_open_lock_only_affects_locks(kind in any_kind()) {
            let mut tile = Tile::new(kind);
            let before = tile;
            let opened = tile.open_lock();
            if matches!(kind, TileKind::Lock(_)) {
                prop_assert!(opened);
                prop_assert!(!tile.is_collidable());
                prop_assert_eq!(tile.kind(), before.kind());
            } else {
                prop_assert!(!opened);
                prop_assert_eq!(tile, before);
            }
        }
    }

    #[test]
    fn test_lock_opens_once() {
        let mut tile = Tile::oriented(TileKind::Lock(LockTier::II), Direction::East);
        assert_eq!(tile.closed_lock(), Some(LockTier::II));
        assert!(tile.open_lock());
        assert_eq!(tile.closed_lock(), None);
        assert!(!tile.open_lock());
        assert_eq!(tile.orientation(), Direction::East);
    }

    #[test]
    fn test_teleport_destination() {
        assert_eq!(Tile::new(TileKind::Teleport { destination: 4 }).teleport_destination(), Some(4));
        assert_eq!(Tile::open().teleport_destination(), None);
    }
}
