//! Inventory
//!
//! Fixed grid of item slots plus a selector. The selected slot decides
//! which key the player tries on locks and which sword sets their damage.

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;
use crate::game::tile::LockTier;

/// Inventory rows.
pub const INVENTORY_ROWS: usize = 3;

/// Inventory columns.
pub const INVENTORY_COLS: usize = 5;

/// Sword tiers and their damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SwordTier {
    /// 15 damage
    I,
    /// 25 damage
    II,
    /// 40 damage
    III,
}

impl SwordTier {
    /// Melee damage while this sword is selected.
    pub fn damage(self) -> i32 {
        match self {
            SwordTier::I => 15,
            SwordTier::II => 25,
            SwordTier::III => 40,
        }
    }
}

/// What an item is, decoded from its numeric id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Id 0, placeholder
    Blank,
    /// Ids 4-6
    Key(LockTier),
    /// Ids 7-9
    Sword(SwordTier),
    /// Any other id
    Other(u8),
}

impl ItemKind {
    /// Decode an item id.
    pub fn from_id(id: u8) -> Self {
        match id {
            0 => ItemKind::Blank,
            4 => ItemKind::Key(LockTier::I),
            5 => ItemKind::Key(LockTier::II),
            6 => ItemKind::Key(LockTier::III),
            7 => ItemKind::Sword(SwordTier::I),
            8 => ItemKind::Sword(SwordTier::II),
            9 => ItemKind::Sword(SwordTier::III),
            other => ItemKind::Other(other),
        }
    }

    /// Numeric id.
    pub fn id(self) -> u8 {
        match self {
            ItemKind::Blank => 0,
            ItemKind::Key(LockTier::I) => 4,
            ItemKind::Key(LockTier::II) => 5,
            ItemKind::Key(LockTier::III) => 6,
            ItemKind::Sword(SwordTier::I) => 7,
            ItemKind::Sword(SwordTier::II) => 8,
            ItemKind::Sword(SwordTier::III) => 9,
            ItemKind::Other(id) => id,
        }
    }

    /// Sword tier, if this is a weapon.
    pub fn sword(self) -> Option<SwordTier> {
        match self {
            ItemKind::Sword(tier) => Some(tier),
            _ => None,
        }
    }
}

/// Slot grid coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Row
    pub row: usize,
    /// Column
    pub col: usize,
}

/// Player inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: [[Option<ItemKind>; INVENTORY_COLS]; INVENTORY_ROWS],
    selector: Slot,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Empty inventory with the selector at the top-left slot.
    pub fn new() -> Self {
        Self {
            slots: [[None; INVENTORY_COLS]; INVENTORY_ROWS],
            selector: Slot::default(),
        }
    }

    /// Put an item in the first free slot, row-major.
    /// Returns false if the inventory is full.
    pub fn pick_up(&mut self, item: ItemKind) -> bool {
        for row in self.slots.iter_mut() {
            if let Some(slot) = row.iter_mut().find(|slot| slot.is_none()) {
                *slot = Some(item);
                return true;
            }
        }
        false
    }

    /// Item under the selector.
    pub fn selected(&self) -> Option<ItemKind> {
        self.slots[self.selector.row][self.selector.col]
    }

    /// Remove and return the item under the selector.
    pub fn remove_selected(&mut self) -> Option<ItemKind> {
        self.slots[self.selector.row][self.selector.col].take()
    }

    /// Current selector position.
    pub fn selector(&self) -> Slot {
        self.selector
    }

    /// Move the selector one slot, stopping at the grid edges.
    pub fn move_selector(&mut self, dir: Direction) {
        let s = &mut self.selector;
        match dir {
            Direction::North => s.row = s.row.saturating_sub(1),
            Direction::South => s.row = (s.row + 1).min(INVENTORY_ROWS - 1),
            Direction::West => s.col = s.col.saturating_sub(1),
            Direction::East => s.col = (s.col + 1).min(INVENTORY_COLS - 1),
        }
    }

    /// Every slot, row-major.
    pub fn slots(&self) -> impl Iterator<Item = Option<ItemKind>> + '_ {
        self.slots.iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ids() {
        for id in 0..=255u8 {
            assert_eq!(ItemKind::from_id(id).id(), id);
        }
        assert_eq!(ItemKind::from_id(5), ItemKind::Key(LockTier::II));
        assert_eq!(ItemKind::from_id(9).sword(), Some(SwordTier::III));
        assert_eq!(ItemKind::from_id(4).sword(), None);
    }

    #[test]
    fn test_pick_up_fills_row_major() {
        let mut inv = Inventory::new();
        for _ in 0..INVENTORY_COLS {
            assert!(inv.pick_up(ItemKind::Blank));
        }
        assert!(inv.pick_up(ItemKind::Key(LockTier::I)));
        assert_eq!(inv.slots().nth(INVENTORY_COLS), Some(Some(ItemKind::Key(LockTier::I))));
    }

    #[test]
    fn test_pick_up_fails_when_full() {
        let mut inv = Inventory::new();
        for _ in 0..INVENTORY_ROWS * INVENTORY_COLS {
            assert!(inv.pick_up(ItemKind::Other(42)));
        }
        assert!(!inv.pick_up(ItemKind::Other(42)));
        assert!(inv.slots().all(|slot| slot == Some(ItemKind::Other(42))));
    }

    #[test]
    fn test_selector_clamps() {
        let mut inv = Inventory::new();
        inv.move_selector(Direction::North);
        inv.move_selector(Direction::West);
        assert_eq!(inv.selector(), Slot { row: 0, col: 0 });
        for _ in 0..10 {
            inv.move_selector(Direction::South);
            inv.move_selector(Direction::East);
        }
        assert_eq!(inv.selector(), Slot { row: INVENTORY_ROWS - 1, col: INVENTORY_COLS - 1 });
    }

    #[test]
    fn test_selected_and_remove() {
        let mut inv = Inventory::new();
        inv.pick_up(ItemKind::Sword(SwordTier::I));
        inv.pick_up(ItemKind::Key(LockTier::III));
        assert_eq!(inv.selected(), Some(ItemKind::Sword(SwordTier::I)));

        inv.move_selector(Direction::East);
        assert_eq!(inv.remove_selected(), Some(ItemKind::Key(LockTier::III)));
        assert!(inv.selected().is_none());

        inv.move_selector(Direction::West);
        assert_eq!(inv.remove_selected(), Some(ItemKind::Sword(SwordTier::I)));
        assert!(inv.slots().all(|slot| slot.is_none()));
    }
}
