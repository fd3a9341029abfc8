//! Hostile Actors
//!
//! One pursuer behavior, parameterized by tier. The end-boss splits into
//! three fragments when it dies; each fragment is an ordinary pursuer of
//! its own tier.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::direction::Direction;
use crate::core::vec2::Vec2;
use crate::game::collision::attempt_move;
use crate::game::combat::{in_strike_zone, knockback, pursuit};
use crate::game::entity::{
    queue_drop, Actor, DropTable, Entity, EntityContext, EntityId, EntityKind, EntityTemplate,
    PendingSpawn,
};
use crate::game::events::GameEvent;
use crate::game::inventory::ItemKind;
use crate::game::tile::LockTier;

/// Where an end-boss's fragments appear, relative to the boss.
pub const SPLIT_OFFSETS: [Vec2; 3] = [
    Vec2::new(-20.0, 0.0),
    Vec2::new(0.0, -20.0),
    Vec2::new(20.0, 0.0),
];

/// Hostile tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HostileTier {
    /// Common enemy
    Basic = 0,
    /// Guards a key
    MidBoss = 1,
    /// Final boss; splits on death
    EndBoss = 2,
    /// Piece of a split end-boss
    Fragment = 3,
}

/// Per-tier numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuerStats {
    /// Pixels per step
    pub speed: f64,
    /// Starting hit points
    pub hp: i32,
    /// Diameter
    pub size: f64,
    /// Contact damage
    pub damage: i32,
    /// Distance at which pursuit starts
    pub aggro_radius: f64,
    /// Whether standing on a pit kills it
    pub falls_in_pits: bool,
    /// Whether the player's radius extends melee reach against it
    pub reach_includes_player: bool,
    /// Whether pursuit halts once the two bodies touch, rather than at
    /// the pursuer's own radius
    pub stops_at_contact: bool,
}

impl PursuerStats {
    /// Distance under which the pursuer stops closing in.
    pub fn stop_distance(&self, player_radius: f64) -> f64 {
        let own = self.size / 2.0;
        if self.stops_at_contact {
            own + player_radius
        } else {
            own
        }
    }
}

impl HostileTier {
    /// Stat block for this tier.
    pub fn stats(self) -> PursuerStats {
        match self {
            HostileTier::Basic => PursuerStats {
                speed: 2.0,
                hp: 100,
                size: 20.0,
                damage: 10,
                aggro_radius: 250.0,
                falls_in_pits: true,
                reach_includes_player: true,
                stops_at_contact: false,
            },
            HostileTier::MidBoss => PursuerStats {
                speed: 0.75,
                hp: 500,
                size: 60.0,
                damage: 20,
                aggro_radius: 250.0,
                falls_in_pits: false,
                reach_includes_player: false,
                stops_at_contact: true,
            },
            HostileTier::EndBoss => PursuerStats {
                speed: 0.75,
                hp: 600,
                size: 60.0,
                damage: 20,
                aggro_radius: 250.0,
                falls_in_pits: false,
                reach_includes_player: false,
                stops_at_contact: true,
            },
            HostileTier::Fragment => PursuerStats {
                speed: 1.0,
                hp: 400,
                size: 60.0,
                damage: 15,
                aggro_radius: 250.0,
                falls_in_pits: false,
                reach_includes_player: false,
                stops_at_contact: true,
            },
        }
    }

    /// What this tier leaves behind.
    pub fn drop_table(self) -> DropTable {
        match self {
            HostileTier::Basic => vec![
                Some(EntityTemplate::Money(10)),
                Some(EntityTemplate::Money(5)),
                Some(EntityTemplate::Money(5)),
                Some(EntityTemplate::Money(1)),
                Some(EntityTemplate::Money(1)),
                Some(EntityTemplate::Money(1)),
                None,
                None,
                None,
                None,
            ],
            HostileTier::MidBoss => vec![Some(EntityTemplate::Item {
                kind: ItemKind::Key(LockTier::I),
                cost: 0,
            })],
            HostileTier::EndBoss | HostileTier::Fragment => Vec::new(),
        }
    }

    /// Whether a live actor of this tier keeps the last zone from being won.
    pub fn counts_for_victory(self) -> bool {
        matches!(self, HostileTier::EndBoss | HostileTier::Fragment)
    }
}

/// Pursuer state on top of the shared actor record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pursuer {
    /// Tier
    pub tier: HostileTier,
    /// Sticky until the player dies
    pub pursuing: bool,
}

/// Create a hostile of the given tier.
pub fn spawn(id: EntityId, tier: HostileTier, position: Vec2) -> Entity {
    let stats = tier.stats();
    let actor = Actor::new(position)
        .with_stats(stats.hp, stats.damage, stats.speed, stats.size)
        .with_drops(tier.drop_table());
    Entity {
        id,
        actor,
        kind: EntityKind::Hostile(Pursuer { tier, pursuing: false }),
    }
}

/// One step of hostile behavior.
pub fn update(id: EntityId, actor: &mut Actor, pursuer: &mut Pursuer, ctx: &mut EntityContext<'_>) {
    let stats = pursuer.tier.stats();

    // 1. Death and drops
    if actor.check_vitals(ctx.grid, stats.falls_in_pits) {
        debug!(id = id.0, tier = ?pursuer.tier, "hostile died");
        ctx.events.push(GameEvent::entity_died(ctx.tick, id, actor.position));
    }
    if !actor.alive {
        if pursuer.tier == HostileTier::EndBoss {
            split(id, actor, ctx);
        } else {
            queue_drop(id, actor, ctx);
        }
        return;
    }

    let player = &*ctx.player;
    let to_player = player.actor.position;
    let distance = actor.position.distance(to_player);

    // 2. Aggro: sticky while the player lives
    if !player.actor.alive {
        pursuer.pursuing = false;
    } else if distance <= stats.aggro_radius {
        pursuer.pursuing = true;
    }

    // 3. Struck by the player's swing
    if let Some(attack) = player.attack {
        let mut reach = player.reach + actor.radius();
        if stats.reach_includes_player {
            reach += player.actor.radius();
        }
        if distance <= reach
            && actor.hits.can_be_hit(ctx.tick)
            && in_strike_zone(to_player, attack.dir, actor.position)
        {
            let amount = player.actor.damage;
            actor.take_hit(amount, ctx.tick);
            ctx.events.push(GameEvent::entity_damaged(ctx.tick, id, amount, actor.hp));
        }
    }

    // 4. Recoil, else chase
    if actor.hits.is_recoiling(ctx.tick) {
        let delta = knockback(actor.position, to_player, actor.speed);
        attempt_move(actor, delta, ctx.grid, ctx.obstacles, ctx.tick);
    } else if pursuer.pursuing && distance >= stats.stop_distance(player.actor.radius()) {
        let delta = pursuit(actor.position, to_player, actor.speed);
        actor.facing = Direction::dominant(delta);
        attempt_move(actor, delta, ctx.grid, ctx.obstacles, ctx.tick);
    }
}

/// Replace a dead end-boss with its fragments, once.
fn split(id: EntityId, actor: &mut Actor, ctx: &mut EntityContext<'_>) {
    if actor.dropped {
        return;
    }
    actor.dropped = true;
    for offset in SPLIT_OFFSETS {
        ctx.spawns.push(PendingSpawn {
            template: EntityTemplate::Hostile(HostileTier::Fragment),
            position: actor.position + offset,
        });
    }
    info!(id = id.0, at = %actor.position, "end boss split");
    ctx.events.push(GameEvent::boss_split(ctx.tick, id, actor.position));
}
