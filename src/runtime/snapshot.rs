//! Render Snapshots
//!
//! Read-only copy of what a renderer needs from the last completed step.
//! Built by the runtime after each batch of steps and shared through a
//! watch channel, so the renderer never touches live state.

use serde::{Deserialize, Serialize};

use crate::camera::{viewport, Viewport};
use crate::core::direction::Direction;
use crate::core::vec2::Vec2;
use crate::game::entity::{Entity, Stance};
use crate::game::player::Player;
use crate::game::world::{Phase, World};

/// One zone actor as drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    /// Zone-local id
    pub id: u32,
    /// Kind tag
    pub kind: u8,
    /// Centre
    pub position: Vec2,
    /// Facing
    pub facing: Direction,
    /// Hit points
    pub hp: i32,
    /// Diameter
    pub size: f64,
    /// Alive or lying dead
    pub alive: bool,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id.0,
            kind: entity.kind.tag(),
            position: entity.actor.position,
            facing: entity.actor.facing,
            hp: entity.actor.hp,
            size: entity.actor.size,
            alive: entity.actor.alive,
        }
    }
}

/// The player as drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Centre
    pub position: Vec2,
    /// Facing
    pub facing: Direction,
    /// Hit points
    pub hp: i32,
    /// Maximum hit points
    pub max_hp: i32,
    /// Respawns left
    pub lives: u32,
    /// Currency
    pub money: u32,
    /// Alive
    pub alive: bool,
    /// Mid-jump
    pub airborne: bool,
    /// Swing direction, while swinging
    pub swing: Option<Direction>,
    /// Inventory item ids, row-major (0 = empty)
    pub inventory: Vec<u8>,
    /// Selector `(row, col)`
    pub selector: (usize, usize),
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        let selector = player.inventory.selector();
        Self {
            position: player.actor.position,
            facing: player.actor.facing,
            hp: player.actor.hp,
            max_hp: player.actor.max_hp,
            lives: player.lives,
            money: player.money,
            alive: player.actor.alive,
            airborne: player.actor.stance == Stance::Airborne,
            swing: player.attack.map(|a| a.dir),
            inventory: player
                .inventory
                .slots()
                .map(|slot| slot.map_or(0, |item| item.id()))
                .collect(),
            selector: (selector.row, selector.col),
        }
    }
}

/// One drawable, as listed in [`RenderFrame::draw_order`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawRef {
    /// Index into [`RenderFrame::entities`]
    Entity(usize),
    /// The player
    Player,
}

/// Back-to-front layering: ascending y, with equal y kept in update order
/// and the player after the zone actors.
pub fn draw_order(entities: &[EntityView], player: &PlayerView) -> Vec<DrawRef> {
    let mut order: Vec<(f64, DrawRef)> = entities
        .iter()
        .enumerate()
        .map(|(i, e)| (e.position.y, DrawRef::Entity(i)))
        .chain(std::iter::once((player.position.y, DrawRef::Player)))
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0));
    order.into_iter().map(|(_, r)| r).collect()
}

/// Everything a renderer reads for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Phase
    pub phase: Phase,
    /// Update tick
    pub update_tick: u64,
    /// Animation tick
    pub animation_tick: u64,
    /// Active zone index
    pub zone: usize,
    /// Active zone width in tiles
    pub cols: usize,
    /// Active zone height in tiles
    pub rows: usize,
    /// Tile edge in pixels
    pub tile_size: u32,
    /// Tile kind tags, row-major
    pub tiles: Vec<u8>,
    /// Zone actors in update order
    pub entities: Vec<EntityView>,
    /// The player
    pub player: PlayerView,
    /// Entities and player, back to front
    pub draw_order: Vec<DrawRef>,
    /// Viewport offsets
    pub camera: Viewport,
    /// Dialogue page on screen
    pub dialogue: Option<String>,
}

impl RenderFrame {
    /// Snapshot `world` for a screen of `view` pixels.
    pub fn capture(world: &World, view: (f64, f64)) -> Self {
        let player = PlayerView::from(&world.player);
        let (zone, cols, rows, tile_size, tiles, entities, camera) = match world.current_zone() {
            Some(z) => (
                z.index,
                z.grid.cols(),
                z.grid.rows(),
                z.grid.tile_size(),
                z.grid.tiles().iter().map(|t| t.kind().tag()).collect(),
                z.entities.iter().map(EntityView::from).collect::<Vec<_>>(),
                viewport((z.grid.pixel_width(), z.grid.pixel_height()), view, player.position),
            ),
            None => (world.active_zone, 0, 0, 0, Vec::new(), Vec::new(), Viewport::default()),
        };

        let order = draw_order(&entities, &player);
        Self {
            phase: world.phase,
            update_tick: world.update_tick,
            animation_tick: world.animation_tick,
            zone,
            cols,
            rows,
            tile_size,
            tiles,
            entities,
            player,
            draw_order: order,
            camera,
            dialogue: world.scene.as_ref().and_then(|d| d.current()).map(str::to_owned),
        }
    }
}
