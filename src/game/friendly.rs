//! Friendly Actors
//!
//! Stationary characters that open a dialogue when the player is close,
//! either on their own or when the player interacts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::direction::Direction;
use crate::core::vec2::Vec2;
use crate::game::dialogue::Dialogue;
use crate::game::entity::{Actor, Entity, EntityContext, EntityId, EntityKind};
use crate::game::events::GameEvent;

/// How close the player must be to start a dialogue.
pub const SCENE_RADIUS: f64 = 25.0;

/// Friendly state on top of the shared actor record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendly {
    /// Identity (selects art)
    pub identity: u8,
    /// What it says, if anything
    pub dialogue: Option<Dialogue>,
    /// Starts talking without an interaction
    pub auto_trigger: bool,
    /// Auto-trigger armed; re-arms when the player walks away
    armed: bool,
}

impl Friendly {
    /// New friendly state.
    pub fn new(identity: u8, dialogue: Option<Dialogue>, auto_trigger: bool) -> Self {
        Self {
            identity,
            dialogue,
            auto_trigger,
            armed: true,
        }
    }
}

/// Create a friendly actor.
pub fn spawn(id: EntityId, position: Vec2, facing: Direction, friendly: Friendly) -> Entity {
    let mut actor = Actor::new(position);
    actor.facing = facing;
    Entity {
        id,
        actor,
        kind: EntityKind::Friendly(friendly),
    }
}

/// One step of friendly behavior.
pub fn update(id: EntityId, actor: &mut Actor, friendly: &mut Friendly, ctx: &mut EntityContext<'_>) {
    actor.check_vitals(ctx.grid, true);
    if !actor.alive {
        return;
    }
    let Some(dialogue) = friendly.dialogue.as_ref().filter(|d| !d.is_empty()) else {
        return;
    };

    let player = &*ctx.player;
    let delta = player.actor.position - actor.position;
    if !player.actor.alive || delta.length() > SCENE_RADIUS {
        friendly.armed = true;
        return;
    }

    let auto = friendly.auto_trigger && friendly.armed;
    if ctx.scene.is_none() && (auto || ctx.interact) {
        actor.facing = Direction::dominant(delta);
        friendly.armed = false;
        debug!(id = id.0, identity = friendly.identity, auto, "dialogue started");
        *ctx.scene = Some(dialogue.clone());
        ctx.events.push(GameEvent::dialogue_started(ctx.tick, id));
    }
}
