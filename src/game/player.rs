//! Player
//!
//! The player-controlled actor. It lives outside any zone's entity list
//! but moves against the active zone's tiles and entities.

use std::f64::consts::FRAC_1_SQRT_2;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::direction::Direction;
use crate::core::hash::StateHasher;
use crate::core::vec2::Vec2;
use crate::game::collision::{attempt_move, pit_check, Obstacle};
use crate::game::combat::{knockback, Attack};
use crate::game::entity::{Actor, Entity, EntityId, Stance};
use crate::game::events::GameEvent;
use crate::game::inventory::{Inventory, ItemKind};
use crate::game::tile::LockTier;
use crate::game::zone::TileGrid;

/// Ticks a swing stays active.
pub const ATTACK_DURATION: u64 = 5;

/// Ticks a jump stays airborne.
pub const JUMP_DURATION: u64 = 20;

/// Melee reach beyond the target's radius.
pub const PLAYER_REACH: f64 = 30.0;

/// Damage with no sword selected.
pub const PLAYER_BASE_DAMAGE: i32 = 20;

/// Default lives.
pub const PLAYER_LIVES: u32 = 3;

/// Default ticks between death and respawn.
pub const RESPAWN_DELAY: u64 = 75;

/// What a swing request turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwingOutcome {
    /// A swing started
    Started,
    /// No sword is selected
    NoWeapon,
    /// The player can't act right now
    Ignored,
}

/// What the world has to do after the player's update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerOutcome {
    /// Stepped onto a teleport to this zone
    pub teleport: Option<usize>,
    /// Dead with no lives left and the respawn delay over
    pub out_of_lives: bool,
}

/// What the player reads and touches while updating.
pub struct PlayerContext<'a> {
    /// Current update tick
    pub tick: u64,
    /// Active zone terrain (locks can open)
    pub grid: &'a mut TileGrid,
    /// Active zone entities
    pub entities: &'a [Entity],
    /// Where a respawn lands
    pub respawn_at: Vec2,
    /// Number of zones; teleports beyond it are ignored
    pub zone_count: usize,
    /// Events raised this step
    pub events: &'a mut Vec<GameEvent>,
}

/// The player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Shared actor state
    pub actor: Actor,
    /// Respawns left
    pub lives: u32,
    /// Currency
    pub money: u32,
    /// Items
    pub inventory: Inventory,
    /// Melee reach
    pub reach: f64,
    /// Damage with no sword selected
    pub base_damage: i32,
    /// Current swing, if any
    pub attack: Option<Attack>,
    /// Tick the current jump started
    pub jump_started: Option<u64>,
    /// Whether movement and actions are accepted
    pub can_control: bool,
    /// Zone the player came from; picks the entry point
    pub previous_zone: usize,
    /// Whoever struck last, for knock-back
    pub last_hit_by: Option<EntityId>,
    /// Tick of death while waiting to respawn
    pub death_tick: Option<u64>,
    /// Ticks between death and respawn
    pub respawn_delay: u64,
}

impl Player {
    /// Fresh player at `position`.
    pub fn new(position: Vec2, lives: u32, respawn_delay: u64) -> Self {
        let actor = Actor::new(position).with_stats(
            crate::game::entity::DEFAULT_HP,
            PLAYER_BASE_DAMAGE,
            crate::game::entity::DEFAULT_SPEED,
            crate::game::entity::DEFAULT_SIZE,
        );
        Self {
            actor,
            lives,
            money: 0,
            inventory: Inventory::new(),
            reach: PLAYER_REACH,
            base_damage: PLAYER_BASE_DAMAGE,
            attack: None,
            jump_started: None,
            can_control: true,
            previous_zone: 0,
            last_hit_by: None,
            death_tick: None,
            respawn_delay,
        }
    }

    // =========================================================================
    // TRIGGERS
    // =========================================================================

    /// Hold or release a movement direction. Ignored while dead.
    pub fn set_motion(&mut self, dir: Direction, held: bool) {
        if self.actor.alive {
            self.actor.motion.set(dir, held);
        }
    }

    /// Start a swing towards `dir`.
    pub fn try_attack(&mut self, dir: Direction, tick: u64) -> SwingOutcome {
        if !self.actor.alive || !self.can_control {
            return SwingOutcome::Ignored;
        }
        if self.inventory.selected().and_then(ItemKind::sword).is_none() {
            return SwingOutcome::NoWeapon;
        }
        self.attack = Some(Attack { dir, started: tick });
        self.can_control = false;
        SwingOutcome::Started
    }

    /// Start a jump. Only from the ground.
    pub fn try_jump(&mut self, tick: u64) -> bool {
        if !self.actor.alive || !self.can_control || self.actor.stance != Stance::Grounded {
            return false;
        }
        self.jump_started = Some(tick);
        true
    }

    /// Blocking footprint for zone entities.
    pub fn as_obstacle(&self, tick: u64) -> Option<Obstacle> {
        self.actor.alive.then(|| Obstacle {
            position: self.actor.position,
            radius: self.actor.radius(),
            recoiling: self.actor.hits.is_recoiling(tick),
        })
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    /// One step of player logic.
    ///
    /// Order: vitals, timers, jump, locks, teleport, contact damage,
    /// knock-back, walking, weapon damage, then a final pit check so a
    /// grounded step onto a pit kills on the same step.
    pub fn update(&mut self, ctx: &mut PlayerContext<'_>) -> PlayerOutcome {
        let tick = ctx.tick;
        let mut outcome = PlayerOutcome::default();

        // 1. Vitals
        if self.actor.check_vitals(ctx.grid, true) {
            self.on_death(tick, ctx.events);
        }
        if !self.actor.alive {
            outcome.out_of_lives = self.wait_for_respawn(ctx);
            return outcome;
        }

        self.can_control = true;
        let obstacles: Vec<Obstacle> = ctx.entities.iter().filter_map(|e| e.as_obstacle(tick)).collect();

        // 2. Swing timer
        if let Some(attack) = self.attack {
            if tick.saturating_sub(attack.started) > ATTACK_DURATION {
                self.attack = None;
            } else {
                self.can_control = false;
            }
        }

        // 3. Jump: forced travel in the facing direction
        match self.jump_started {
            Some(started) if tick.saturating_sub(started) < JUMP_DURATION => {
                self.can_control = false;
                self.actor.stance = Stance::Airborne;
                let unit = self.actor.facing.unit();
                self.walk(unit, ctx.grid, &obstacles, tick);
            }
            _ => {
                self.jump_started = None;
                self.actor.stance = Stance::Grounded;
            }
        }

        // 4. Locks
        self.try_unlock(ctx);

        // 5. Teleport
        if let Some(dest) = ctx.grid.tile_under(self.actor.position).teleport_destination() {
            if dest < ctx.zone_count {
                outcome.teleport = Some(dest);
                return outcome;
            }
        }

        // 6. Contact damage from hostiles
        for entity in ctx.entities.iter().filter(|e| e.is_hostile() && e.actor.alive) {
            let reach = self.actor.radius() + entity.actor.radius();
            if self.actor.position.distance(entity.actor.position) <= reach
                && self.actor.hits.can_be_hit(tick)
            {
                self.actor.take_hit(entity.actor.damage, tick);
                self.last_hit_by = Some(entity.id);
                ctx.events.push(GameEvent::player_damaged(
                    tick,
                    Some(entity.id),
                    entity.actor.damage,
                    self.actor.hp,
                ));
            }
        }

        // 7. Knock-back away from the last striker
        if self.actor.hits.is_recoiling(tick) {
            self.can_control = false;
            self.jump_started = None;
            self.actor.stance = Stance::Grounded;
            let source = self
                .last_hit_by
                .and_then(|id| ctx.entities.iter().find(|e| e.id == id))
                .map(|e| e.actor.position);
            if let Some(source) = source {
                let delta = knockback(self.actor.position, source, self.actor.speed);
                attempt_move(&mut self.actor, delta, ctx.grid, &obstacles, tick);
            }
        }

        // 8. Walking
        if self.can_control {
            if let Some((unit, facing)) = walk_direction(&self.actor) {
                self.actor.facing = facing;
                self.walk(unit, ctx.grid, &obstacles, tick);
            }
        }

        // 9. Weapon damage
        self.actor.damage = self
            .inventory
            .selected()
            .and_then(ItemKind::sword)
            .map_or(self.base_damage, |sword| sword.damage());

        // 10. Same-step pit death
        if pit_check(&mut self.actor, ctx.grid) {
            self.on_death(tick, ctx.events);
        }

        outcome
    }

    /// Move `floor(speed)` unit steps, each checked separately.
    fn walk(&mut self, unit: Vec2, grid: &TileGrid, obstacles: &[Obstacle], tick: u64) {
        let steps = self.actor.speed.max(0.0).floor() as u32;
        for _ in 0..steps {
            attempt_move(&mut self.actor, unit, grid, obstacles, tick);
        }
    }

    fn on_death(&mut self, tick: u64, events: &mut Vec<GameEvent>) {
        self.death_tick = Some(tick);
        self.attack = None;
        self.jump_started = None;
        self.actor.stance = Stance::Grounded;
        info!(tick, lives = self.lives, at = %self.actor.position, "player died");
        events.push(GameEvent::player_died(tick, self.actor.position, self.lives));
    }

    /// Count down the respawn delay. Returns true when the game is lost.
    fn wait_for_respawn(&mut self, ctx: &mut PlayerContext<'_>) -> bool {
        let died = *self.death_tick.get_or_insert(ctx.tick);
        if ctx.tick.saturating_sub(died) < self.respawn_delay {
            return false;
        }
        if self.lives == 0 {
            return true;
        }

        self.lives -= 1;
        self.actor.alive = true;
        self.actor.hp = self.actor.max_hp;
        self.actor.position = ctx.respawn_at;
        self.actor.motion.clear();
        self.death_tick = None;
        info!(lives = self.lives, at = %ctx.respawn_at, "player respawned");
        ctx.events.push(GameEvent::player_respawned(ctx.tick, ctx.respawn_at, self.lives));
        false
    }

    /// Open an adjacent lock if the selected key matches it.
    fn try_unlock(&mut self, ctx: &mut PlayerContext<'_>) {
        let Some((col, row, tier)) = touching_lock(&self.actor, ctx.grid) else {
            return;
        };
        if self.inventory.selected() != Some(ItemKind::Key(tier)) {
            return;
        }
        if let Some(tile) = ctx.grid.tile_mut(col, row) {
            if tile.open_lock() {
                self.inventory.remove_selected();
                debug!(col, row, ?tier, "lock opened");
                ctx.events.push(GameEvent::lock_opened(ctx.tick, col, row, tier));
            }
        }
    }

    /// Feed the mutable state into a hasher.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        self.actor.hash_into(hasher);
        hasher.update_u32(self.lives);
        hasher.update_u32(self.money);
        for slot in self.inventory.slots() {
            hasher.update_u8(slot.map_or(0, ItemKind::id));
        }
        let selector = self.inventory.selector();
        hasher.update_u64(selector.row as u64);
        hasher.update_u64(selector.col as u64);
        hasher.update_u64(self.attack.map_or(u64::MAX, |a| a.started));
        hasher.update_u64(self.jump_started.map_or(u64::MAX, |t| t));
        hasher.update_u64(self.previous_zone as u64);
        hasher.update_u64(self.death_tick.map_or(u64::MAX, |t| t));
    }
}

/// Unit step and facing for the held directions.
///
/// Diagonals move at 45° and face east or west; opposing keys resolve
/// north before south and east before west.
fn walk_direction(actor: &Actor) -> Option<(Vec2, Direction)> {
    let m = actor.motion;
    let d = FRAC_1_SQRT_2;
    let walk = match (m.north, m.east, m.south, m.west) {
        (true, _, _, true) => (Vec2::new(-d, -d), Direction::West),
        (true, true, _, _) => (Vec2::new(d, -d), Direction::East),
        (_, _, true, true) => (Vec2::new(-d, d), Direction::West),
        (_, true, true, _) => (Vec2::new(d, d), Direction::East),
        (true, _, _, _) => (Direction::North.unit(), Direction::North),
        (_, _, true, _) => (Direction::South.unit(), Direction::South),
        (_, true, _, _) => (Direction::East.unit(), Direction::East),
        (_, _, _, true) => (Direction::West.unit(), Direction::West),
        _ => return None,
    };
    Some(walk)
}

/// A closed lock one pixel beyond the middle of one of the actor's edges.
pub fn touching_lock(actor: &Actor, grid: &TileGrid) -> Option<(usize, usize, LockTier)> {
    let (p, r) = (actor.position, actor.radius());
    let probes = [
        Vec2::new(p.x, p.y - r - 1.0),
        Vec2::new(p.x + r + 1.0, p.y),
        Vec2::new(p.x, p.y + r + 1.0),
        Vec2::new(p.x - r - 1.0, p.y),
    ];
    probes.into_iter().find_map(|probe| {
        let (col, row) = grid.cell_of(probe)?;
        let tier = grid.tile_at(col, row)?.closed_lock()?;
        Some((col, row, tier))
    })
}

// =============================================================================
// TESTS
// =============================================================================
