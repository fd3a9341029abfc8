//! Entity Model
//!
//! Every simulated actor shares one [`Actor`] record (position, health,
//! timers, drop table). Zone-resident actors wrap it in an [`Entity`] with
//! a behavior tag; the player wraps it in [`Player`](crate::game::player::Player).

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;
use crate::core::hash::StateHasher;
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::collision::{pit_check, Obstacle};
use crate::game::dialogue::Dialogue;
use crate::game::environment::{self, Destructible, Pickup};
use crate::game::events::GameEvent;
use crate::game::friendly::{self, Friendly};
use crate::game::hostile::{self, HostileTier, Pursuer};
use crate::game::inventory::ItemKind;
use crate::game::player::Player;
use crate::game::zone::TileGrid;

/// Ticks an actor stays invulnerable (and recoils) after a hit.
pub const DEFAULT_HIT_DELAY: u64 = 10;

/// Default hit points.
pub const DEFAULT_HP: i32 = 100;

/// Default contact damage.
pub const DEFAULT_DAMAGE: i32 = 10;

/// Default speed, pixels per step.
pub const DEFAULT_SPEED: f64 = 3.0;

/// Default diameter in pixels.
pub const DEFAULT_SIZE: f64 = 20.0;

// =============================================================================
// IDS AND SMALL STATE
// =============================================================================

/// Zone-local entity identifier, assigned in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Whether an actor touches the ground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    /// On the ground; pits are deadly
    #[default]
    Grounded,
    /// Mid-jump; pits are ignored
    Airborne,
}

/// Post-hit invulnerability window.
///
/// After a hit at tick `T` the actor can't be hit again before
/// `T + delay`, and recoils for every tick in `[T, T + delay]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitWindow {
    last_hit: Option<u64>,
    delay: u64,
}

impl Default for HitWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_DELAY)
    }
}

impl HitWindow {
    /// Never-hit window with the given length.
    pub fn new(delay: u64) -> Self {
        Self { last_hit: None, delay }
    }

    /// Tick of the last hit.
    pub fn last_hit(&self) -> Option<u64> {
        self.last_hit
    }

    /// Whether a new hit can land at `tick`.
    pub fn can_be_hit(&self, tick: u64) -> bool {
        match self.last_hit {
            None => true,
            Some(t) => tick.checked_sub(t).map_or(true, |elapsed| elapsed >= self.delay),
        }
    }

    /// Whether the actor is being knocked back at `tick`.
    pub fn is_recoiling(&self, tick: u64) -> bool {
        match self.last_hit {
            None => false,
            Some(t) => tick.checked_sub(t).is_some_and(|elapsed| elapsed <= self.delay),
        }
    }

    /// Record a hit at `tick`.
    pub fn strike(&mut self, tick: u64) {
        self.last_hit = Some(tick);
    }
}

/// Four independent held-direction flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionIntent {
    /// Moving north
    pub north: bool,
    /// Moving east
    pub east: bool,
    /// Moving south
    pub south: bool,
    /// Moving west
    pub west: bool,
}

impl MotionIntent {
    /// Set one direction flag.
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::North => self.north = held,
            Direction::East => self.east = held,
            Direction::South => self.south = held,
            Direction::West => self.west = held,
        }
    }

    /// Read one direction flag.
    pub fn held(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Release everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Pack as bits (N=1, E=2, S=4, W=8).
    pub fn bits(&self) -> u8 {
        Direction::ALL
            .iter()
            .filter(|d| self.held(**d))
            .fold(0, |acc, d| acc | (1 << *d as u8))
    }
}

// =============================================================================
// DROPS
// =============================================================================

/// Value description of an entity to create later (drops, splits).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityTemplate {
    /// Currency pickup
    Money(u32),
    /// Purchasable item pickup
    Item {
        /// What it is
        kind: ItemKind,
        /// Price in currency
        cost: u32,
    },
    /// Hostile of a tier
    Hostile(HostileTier),
    /// Destructible of a kind
    Destructible(u8),
}

/// Uniform drop table; `None` entries are deliberate "nothing" outcomes.
pub type DropTable = Vec<Option<EntityTemplate>>;

// =============================================================================
// ACTOR
// =============================================================================

/// Fields every actor has.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// False once dead
    pub alive: bool,
    /// Centre, in pixels
    pub position: Vec2,
    /// Facing
    pub facing: Direction,
    /// Current hit points
    pub hp: i32,
    /// Maximum hit points
    pub max_hp: i32,
    /// Damage dealt on contact or strike
    pub damage: i32,
    /// Pixels per step
    pub speed: f64,
    /// Diameter in pixels
    pub size: f64,
    /// Held movement directions
    pub motion: MotionIntent,
    /// Ground or air
    pub stance: Stance,
    /// Invulnerability / knock-back window
    pub hits: HitWindow,
    /// Rolled once on death
    pub drops: DropTable,
    /// Set once the drop has been rolled
    pub dropped: bool,
}

impl Actor {
    /// Actor with default stats, facing south.
    pub fn new(position: Vec2) -> Self {
        Self {
            alive: true,
            position,
            facing: Direction::South,
            hp: DEFAULT_HP,
            max_hp: DEFAULT_HP,
            damage: DEFAULT_DAMAGE,
            speed: DEFAULT_SPEED,
            size: DEFAULT_SIZE,
            motion: MotionIntent::default(),
            stance: Stance::Grounded,
            hits: HitWindow::default(),
            drops: Vec::new(),
            dropped: false,
        }
    }

    /// Override the combat stats. Health starts full.
    pub fn with_stats(mut self, hp: i32, damage: i32, speed: f64, size: f64) -> Self {
        self.hp = hp;
        self.max_hp = hp;
        self.damage = damage;
        self.speed = speed;
        self.size = size;
        self
    }

    /// Attach a drop table.
    pub fn with_drops(mut self, drops: DropTable) -> Self {
        self.drops = drops;
        self
    }

    /// Collision radius.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Pit and health checks. Returns true if the actor died in this call.
    pub fn check_vitals(&mut self, grid: &TileGrid, pits_deadly: bool) -> bool {
        let was_alive = self.alive;
        if pits_deadly {
            pit_check(self, grid);
        }
        if self.hp <= 0 {
            self.alive = false;
        }
        was_alive && !self.alive
    }

    /// Roll the drop table once after death.
    pub fn roll_drop(&mut self, rng: &mut DeterministicRng) -> Option<EntityTemplate> {
        if self.alive || self.dropped {
            return None;
        }
        self.dropped = true;
        rng.choose(&self.drops).copied().flatten()
    }

    /// Apply damage and open the hit window.
    pub fn take_hit(&mut self, amount: i32, tick: u64) {
        self.hp -= amount;
        self.hits.strike(tick);
    }

    /// Feed the mutable state into a hasher.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_bool(self.alive);
        hasher.update_vec2(self.position);
        hasher.update_u8(self.facing as u8);
        hasher.update_i32(self.hp);
        hasher.update_i32(self.damage);
        hasher.update_u8(self.motion.bits());
        hasher.update_bool(self.stance == Stance::Airborne);
        hasher.update_u64(self.hits.last_hit().map_or(u64::MAX, |t| t));
        hasher.update_bool(self.dropped);
    }
}

// =============================================================================
// ENTITY
// =============================================================================

/// Behavior tag of a zone-resident entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Pursues and hurts the player
    Hostile(Pursuer),
    /// Currency or item lying on the ground
    Pickup(Pickup),
    /// Breakable scenery
    Destructible(Destructible),
    /// Talks to the player
    Friendly(Friendly),
}

impl EntityKind {
    /// Stable tag for hashing and render snapshots.
    pub fn tag(&self) -> u8 {
        match self {
            EntityKind::Hostile(p) => p.tier as u8,
            EntityKind::Pickup(Pickup::Money { .. }) => 10,
            EntityKind::Pickup(Pickup::Item { .. }) => 11,
            EntityKind::Destructible(_) => 12,
            EntityKind::Friendly(_) => 13,
        }
    }
}

/// An actor living in a zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Zone-local id
    pub id: EntityId,
    /// Shared actor state
    pub actor: Actor,
    /// Behavior
    pub kind: EntityKind,
}

/// A template waiting to be placed in the zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingSpawn {
    /// What to create
    pub template: EntityTemplate,
    /// Where
    pub position: Vec2,
}

/// Everything an entity may read or touch while updating.
pub struct EntityContext<'a> {
    /// Current update tick
    pub tick: u64,
    /// Zone terrain
    pub grid: &'a TileGrid,
    /// Other blocking actors, the player included
    pub obstacles: &'a [Obstacle],
    /// The player
    pub player: &'a mut Player,
    /// Drop randomness
    pub rng: &'a mut DeterministicRng,
    /// Interaction was requested this step
    pub interact: bool,
    /// Events raised this step
    pub events: &'a mut Vec<GameEvent>,
    /// Entities to append after this update
    pub spawns: &'a mut Vec<PendingSpawn>,
    /// Dialogue to open, if any
    pub scene: &'a mut Option<Dialogue>,
}

impl Entity {
    /// Instantiate a template.
    pub fn from_template(id: EntityId, template: EntityTemplate, position: Vec2) -> Self {
        match template {
            EntityTemplate::Money(amount) => environment::money(id, position, amount),
            EntityTemplate::Item { kind, cost } => environment::item(id, position, kind, cost),
            EntityTemplate::Hostile(tier) => hostile::spawn(id, tier, position),
            EntityTemplate::Destructible(variant) => environment::destructible(id, position, variant),
        }
    }

    /// Per-step update, dispatched on the behavior tag.
    pub fn update(&mut self, ctx: &mut EntityContext<'_>) {
        match &mut self.kind {
            EntityKind::Hostile(pursuer) => hostile::update(self.id, &mut self.actor, pursuer, ctx),
            EntityKind::Pickup(pickup) => environment::update_pickup(self.id, &mut self.actor, pickup, ctx),
            EntityKind::Destructible(_) => environment::update_destructible(self.id, &mut self.actor, ctx),
            EntityKind::Friendly(friend) => friendly::update(self.id, &mut self.actor, friend, ctx),
        }
    }

    /// Blocking footprint for other movers. Pickups and the dead don't block.
    pub fn as_obstacle(&self, tick: u64) -> Option<Obstacle> {
        if !self.actor.alive {
            return None;
        }
        let recoiling = match self.kind {
            EntityKind::Pickup(_) => return None,
            EntityKind::Destructible(_) => false,
            EntityKind::Hostile(_) | EntityKind::Friendly(_) => self.actor.hits.is_recoiling(tick),
        };
        Some(Obstacle {
            position: self.actor.position,
            radius: self.actor.radius(),
            recoiling,
        })
    }

    /// Whether this is a hostile of any tier.
    pub fn is_hostile(&self) -> bool {
        matches!(self.kind, EntityKind::Hostile(_))
    }

    /// Whether this is a live end-boss or one of its fragments.
    pub fn is_live_boss(&self) -> bool {
        match &self.kind {
            EntityKind::Hostile(p) => self.actor.alive && p.tier.counts_for_victory(),
            _ => false,
        }
    }

    /// Whether this is a pickup that has been collected.
    pub fn is_spent_pickup(&self) -> bool {
        matches!(self.kind, EntityKind::Pickup(_)) && !self.actor.alive
    }

    /// Feed the mutable state into a hasher.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id.0);
        hasher.update_u8(self.kind.tag());
        self.actor.hash_into(hasher);
        if let EntityKind::Hostile(p) = &self.kind {
            hasher.update_bool(p.pursuing);
        }
    }
}

/// Roll an actor's drop (once) and queue it at the actor's position.
pub(crate) fn queue_drop(id: EntityId, actor: &mut Actor, ctx: &mut EntityContext<'_>) {
    if let Some(template) = actor.roll_drop(ctx.rng) {
        ctx.spawns.push(PendingSpawn { template, position: actor.position });
        ctx.events.push(GameEvent::drop_spawned(ctx.tick, id, template, actor.position));
    }
}
