//! Environment Actors
//!
//! Pickups (currency and purchasable items) and destructible scenery.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::combat::in_strike_zone;
use crate::game::entity::{
    queue_drop, Actor, Entity, EntityContext, EntityId, EntityKind, EntityTemplate,
};
use crate::game::events::GameEvent;
use crate::game::inventory::ItemKind;

/// Hit points of destructible scenery.
pub const DESTRUCTIBLE_HP: i32 = 50;

/// Something lying on the ground for the player to collect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pickup {
    /// Currency
    Money {
        /// Amount added on pickup
        amount: u32,
    },
    /// Inventory item
    Item {
        /// What it is
        kind: ItemKind,
        /// Price in currency
        cost: u32,
    },
}

/// Breakable scenery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destructible {
    /// Art variant (1-3)
    pub variant: u8,
}

/// Currency pickup.
pub fn money(id: EntityId, position: Vec2, amount: u32) -> Entity {
    Entity {
        id,
        actor: Actor::new(position),
        kind: EntityKind::Pickup(Pickup::Money { amount }),
    }
}

/// Item pickup.
pub fn item(id: EntityId, position: Vec2, kind: ItemKind, cost: u32) -> Entity {
    Entity {
        id,
        actor: Actor::new(position),
        kind: EntityKind::Pickup(Pickup::Item { kind, cost }),
    }
}

/// Destructible scenery with its standard drops.
pub fn destructible(id: EntityId, position: Vec2, variant: u8) -> Entity {
    let actor = Actor::new(position)
        .with_stats(DESTRUCTIBLE_HP, 0, 0.0, crate::game::entity::DEFAULT_SIZE)
        .with_drops(vec![
            Some(EntityTemplate::Money(1)),
            Some(EntityTemplate::Money(5)),
            None,
        ]);
    Entity {
        id,
        actor,
        kind: EntityKind::Destructible(Destructible { variant }),
    }
}

/// Collect the pickup if the player is touching it (and can pay).
pub fn update_pickup(id: EntityId, actor: &mut Actor, pickup: &mut Pickup, ctx: &mut EntityContext<'_>) {
    let player = &mut *ctx.player;
    if !actor.alive || !player.actor.alive {
        return;
    }
    let touching = actor.position.distance(player.actor.position) < actor.radius() + player.actor.radius();
    if !touching {
        return;
    }

    match *pickup {
        Pickup::Money { amount } => {
            player.money += amount;
        }
        Pickup::Item { kind, cost } => {
            if player.money < cost || !player.inventory.pick_up(kind) {
                return;
            }
            player.money -= cost;
        }
    }

    actor.hp = 0;
    actor.alive = false;
    debug!(id = id.0, ?pickup, money = player.money, "picked up");
    ctx.events.push(GameEvent::picked_up(ctx.tick, id, *pickup, player.money));
}

/// Destructibles only react to the player's swing.
pub fn update_destructible(id: EntityId, actor: &mut Actor, ctx: &mut EntityContext<'_>) {
    if actor.check_vitals(ctx.grid, true) {
        ctx.events.push(GameEvent::entity_died(ctx.tick, id, actor.position));
    }
    if !actor.alive {
        queue_drop(id, actor, ctx);
        return;
    }

    let player = &*ctx.player;
    if let Some(attack) = player.attack {
        let reach = player.reach + actor.radius() + player.actor.radius();
        if actor.position.distance(player.actor.position) <= reach
            && actor.hits.can_be_hit(ctx.tick)
            && in_strike_zone(player.actor.position, attack.dir, actor.position)
        {
            let amount = player.actor.damage;
            actor.take_hit(amount, ctx.tick);
            ctx.events.push(GameEvent::entity_damaged(ctx.tick, id, amount, actor.hp));
        }
    }
}
