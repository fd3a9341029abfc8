//! Game Events
//!
//! Events raised during a simulation step, for logging, tests and replay
//! verification.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::entity::{EntityId, EntityTemplate};
use crate::game::environment::Pickup;
use crate::game::tile::LockTier;
use crate::game::world::Phase;

/// Priority for event ordering within a tick.
///
/// Lower value = earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Deaths first
    Death = 0,
    /// Then damage
    Damage = 1,
    /// Then pickups
    Pickup = 2,
    /// Then new entities
    Spawn = 3,
    /// Then terrain and zone changes
    Zone = 4,
    /// Lowest priority
    Other = 255,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A zone entity lost health
    EntityDamaged {
        /// Damage dealt
        amount: i32,
        /// Health left
        hp: i32,
    },

    /// A zone entity died
    EntityDied {
        /// Where
        position: Vec2,
    },

    /// A death produced a drop
    DropSpawned {
        /// What dropped
        template: EntityTemplate,
        /// Where
        position: Vec2,
    },

    /// The end boss split into fragments
    BossSplit {
        /// Where
        position: Vec2,
    },

    /// The player lost health
    PlayerDamaged {
        /// Damage taken
        amount: i32,
        /// Health left
        hp: i32,
    },

    /// The player died
    PlayerDied {
        /// Where
        position: Vec2,
        /// Lives remaining
        lives: u32,
    },

    /// The player came back
    PlayerRespawned {
        /// Respawn point
        position: Vec2,
        /// Lives remaining
        lives: u32,
    },

    /// The player entered another zone
    ZoneEntered {
        /// Zone left
        from: usize,
        /// Zone entered
        to: usize,
        /// Arrival point
        position: Vec2,
    },

    /// A key opened a lock
    LockOpened {
        /// Tile column
        col: usize,
        /// Tile row
        row: usize,
        /// Lock tier
        tier: LockTier,
    },

    /// A pickup was collected
    PickedUp {
        /// What was collected
        pickup: Pickup,
        /// Player money afterwards
        money: u32,
    },

    /// The world phase changed
    PhaseChanged {
        /// Previous phase
        old_phase: Phase,
        /// New phase
        new_phase: Phase,
    },

    /// A dialogue scene opened
    DialogueStarted,
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Update tick when the event occurred
    pub tick: u64,

    /// Ordering priority
    pub priority: EventPriority,

    /// Zone entity involved (for tie-breaking); `None` for the player
    pub entity: Option<EntityId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, priority: EventPriority, entity: Option<EntityId>, data: GameEventData) -> Self {
        Self {
            tick,
            priority,
            entity,
            data,
        }
    }

    /// Create entity damaged event.
    pub fn entity_damaged(tick: u64, id: EntityId, amount: i32, hp: i32) -> Self {
        Self::new(tick, EventPriority::Damage, Some(id), GameEventData::EntityDamaged { amount, hp })
    }

    /// Create entity died event.
    pub fn entity_died(tick: u64, id: EntityId, position: Vec2) -> Self {
        Self::new(tick, EventPriority::Death, Some(id), GameEventData::EntityDied { position })
    }

    /// Create drop spawned event.
    pub fn drop_spawned(tick: u64, id: EntityId, template: EntityTemplate, position: Vec2) -> Self {
        Self::new(
            tick,
            EventPriority::Spawn,
            Some(id),
            GameEventData::DropSpawned { template, position },
        )
    }

    /// Create boss split event.
    pub fn boss_split(tick: u64, id: EntityId, position: Vec2) -> Self {
        Self::new(tick, EventPriority::Spawn, Some(id), GameEventData::BossSplit { position })
    }

    /// Create player damaged event. `by` is the striker, if any.
    pub fn player_damaged(tick: u64, by: Option<EntityId>, amount: i32, hp: i32) -> Self {
        Self::new(tick, EventPriority::Damage, by, GameEventData::PlayerDamaged { amount, hp })
    }

    /// Create player died event.
    pub fn player_died(tick: u64, position: Vec2, lives: u32) -> Self {
        Self::new(tick, EventPriority::Death, None, GameEventData::PlayerDied { position, lives })
    }

    /// Create player respawned event.
    pub fn player_respawned(tick: u64, position: Vec2, lives: u32) -> Self {
        Self::new(
            tick,
            EventPriority::Other,
            None,
            GameEventData::PlayerRespawned { position, lives },
        )
    }

    /// Create zone entered event.
    pub fn zone_entered(tick: u64, from: usize, to: usize, position: Vec2) -> Self {
        Self::new(
            tick,
            EventPriority::Zone,
            None,
            GameEventData::ZoneEntered { from, to, position },
        )
    }

    /// Create lock opened event.
    pub fn lock_opened(tick: u64, col: usize, row: usize, tier: LockTier) -> Self {
        Self::new(tick, EventPriority::Zone, None, GameEventData::LockOpened { col, row, tier })
    }

    /// Create picked up event.
    pub fn picked_up(tick: u64, id: EntityId, pickup: Pickup, money: u32) -> Self {
        Self::new(tick, EventPriority::Pickup, Some(id), GameEventData::PickedUp { pickup, money })
    }

    /// Create phase changed event.
    pub fn phase_changed(tick: u64, old_phase: Phase, new_phase: Phase) -> Self {
        Self::new(
            tick,
            EventPriority::Other,
            None,
            GameEventData::PhaseChanged { old_phase, new_phase },
        )
    }

    /// Create dialogue started event.
    pub fn dialogue_started(tick: u64, id: EntityId) -> Self {
        Self::new(tick, EventPriority::Other, Some(id), GameEventData::DialogueStarted)
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.priority == other.priority && self.entity == other.entity
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then entity
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.entity.cmp(&other.entity))
    }
}
