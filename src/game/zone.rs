//! Zones
//!
//! A zone is one map: a row-major tile grid, the entry points that
//! teleports resolve against, and the entities living in it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::hash::{StateHash, StateHasher};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::collision::Obstacle;
use crate::game::dialogue::Dialogue;
use crate::game::entity::{Entity, EntityContext, EntityId, EntityTemplate};
use crate::game::events::GameEvent;
use crate::game::player::Player;
use crate::game::tile::Tile;

/// Zone construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneError {
    /// Every zone needs a key-0 entry point
    #[error("zone {zone} has no default (key 0) spawn point")]
    MissingDefaultSpawn {
        /// Zone index
        zone: usize,
    },

    /// Layout had no pixels
    #[error("zone {zone} has an empty layout")]
    EmptyLayout {
        /// Zone index
        zone: usize,
    },
}

// =============================================================================
// TILE GRID
// =============================================================================

/// Row-major grid of tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    cols: usize,
    rows: usize,
    tile_size: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Build a grid. `tiles.len()` must equal `cols * rows`.
    pub fn new(cols: usize, rows: usize, tile_size: u32, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), cols * rows, "tile count does not match grid extents");
        Self {
            cols,
            rows,
            tile_size,
            tiles,
        }
    }

    /// Columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tile edge in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Width in pixels.
    pub fn pixel_width(&self) -> f64 {
        (self.cols as u64 * self.tile_size as u64) as f64
    }

    /// Height in pixels.
    pub fn pixel_height(&self) -> f64 {
        (self.rows as u64 * self.tile_size as u64) as f64
    }

    /// All tiles, row-major.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at a cell.
    pub fn tile_at(&self, col: usize, row: usize) -> Option<&Tile> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.tiles.get(row * self.cols + col)
    }

    /// Mutable tile at a cell.
    pub fn tile_mut(&mut self, col: usize, row: usize) -> Option<&mut Tile> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.tiles.get_mut(row * self.cols + col)
    }

    /// Cell containing a pixel point, if inside the grid.
    pub fn cell_of(&self, point: Vec2) -> Option<(usize, usize)> {
        let size = self.tile_size as f64;
        let col = (point.x / size).floor();
        let row = (point.y / size).floor();
        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    /// Tile containing a pixel point, if inside the grid.
    pub fn tile_at_point(&self, point: Vec2) -> Option<&Tile> {
        self.cell_of(point).and_then(|(col, row)| self.tile_at(col, row))
    }

    /// Tile under an actor's centre.
    ///
    /// Gameplay keeps actors inside the grid; a point outside it is a
    /// logic error and is clamped to the nearest edge cell.
    pub fn tile_under(&self, point: Vec2) -> &Tile {
        let cell = self.cell_of(point);
        debug_assert!(cell.is_some(), "tile lookup outside the grid at {point}");
        if let Some(tile) = cell.and_then(|(col, row)| self.tile_at(col, row)) {
            return tile;
        }
        warn!(%point, cols = self.cols, rows = self.rows, "tile lookup outside grid, clamping");

        let size = self.tile_size as f64;
        let clamp = |v: f64, n: usize| -> usize {
            let max = n.saturating_sub(1);
            if v.is_nan() || v < 0.0 {
                0
            } else {
                ((v / size).floor() as usize).min(max)
            }
        };
        let index = clamp(point.y, self.rows) * self.cols + clamp(point.x, self.cols);
        &self.tiles[index.min(self.tiles.len().saturating_sub(1))]
    }

    /// Centre of a cell in pixels.
    pub fn cell_centre(&self, col: usize, row: usize) -> Vec2 {
        let size = self.tile_size as f64;
        Vec2::new(col as f64 * size + size / 2.0, row as f64 * size + size / 2.0)
    }
}

// =============================================================================
// ZONE
// =============================================================================

/// Decorative layers drawn under and over the actors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneArt {
    /// Drawn beneath actors
    pub bottom: Option<String>,
    /// Drawn above actors
    pub top: Option<String>,
}

/// One map with its inhabitants.
#[derive(Clone, Debug)]
pub struct Zone {
    /// Position in the world's zone list
    pub index: usize,
    /// Terrain
    pub grid: TileGrid,
    /// Live actors, in spawn order
    pub entities: Vec<Entity>,
    /// Decorative layers
    pub art: ZoneArt,
    spawns: BTreeMap<usize, Vec2>,
    default_spawn: Vec2,
    next_id: u32,
}

impl Zone {
    /// Build a zone. Fails if there is no key-0 entry point.
    pub fn new(
        index: usize,
        grid: TileGrid,
        spawns: BTreeMap<usize, Vec2>,
        art: ZoneArt,
    ) -> Result<Self, ZoneError> {
        if grid.cols() == 0 || grid.rows() == 0 {
            return Err(ZoneError::EmptyLayout { zone: index });
        }
        let default_spawn = *spawns
            .get(&0)
            .ok_or(ZoneError::MissingDefaultSpawn { zone: index })?;
        Ok(Self {
            index,
            grid,
            entities: Vec::new(),
            art,
            spawns,
            default_spawn,
            next_id: 0,
        })
    }

    /// Entry points keyed by origin.
    pub fn spawns(&self) -> &BTreeMap<usize, Vec2> {
        &self.spawns
    }

    /// The key-0 entry point.
    pub fn default_spawn(&self) -> Vec2 {
        self.default_spawn
    }

    /// Where a player arriving from zone `origin` lands: the entry keyed
    /// `origin + 1` if there is one, else the default.
    pub fn resolve_spawn(&self, origin: usize) -> Vec2 {
        origin
            .checked_add(1)
            .and_then(|key| self.spawns.get(&key))
            .copied()
            .unwrap_or(self.default_spawn)
    }

    /// Append an entity built with the next free id.
    pub fn insert_with(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(build(id));
        id
    }

    /// Instantiate a template at `position`.
    pub fn spawn_entity(&mut self, template: EntityTemplate, position: Vec2) -> EntityId {
        self.insert_with(|id| Entity::from_template(id, template, position))
    }

    /// Update every entity once, in order.
    ///
    /// Entities spawned during the pass are appended straight away and
    /// update in the same pass. Collected pickups are pruned afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn update_entities(
        &mut self,
        tick: u64,
        player: &mut Player,
        rng: &mut DeterministicRng,
        interact: bool,
        events: &mut Vec<GameEvent>,
        scene: &mut Option<Dialogue>,
    ) {
        let mut spawns = Vec::new();
        let mut i = 0;
        while i < self.entities.len() {
            let obstacles: Vec<Obstacle> = self
                .entities
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .filter_map(|(_, e)| e.as_obstacle(tick))
                .chain(player.as_obstacle(tick))
                .collect();

            let mut ctx = EntityContext {
                tick,
                grid: &self.grid,
                obstacles: &obstacles,
                player: &mut *player,
                rng: &mut *rng,
                interact,
                events: &mut *events,
                spawns: &mut spawns,
                scene: &mut *scene,
            };
            self.entities[i].update(&mut ctx);

            for spawn in spawns.drain(..) {
                self.spawn_entity(spawn.template, spawn.position);
            }
            i += 1;
        }
        self.prune();
    }

    /// Drop collected pickups.
    pub fn prune(&mut self) {
        self.entities.retain(|e| !e.is_spent_pickup());
    }

    /// Whether an end-boss or one of its fragments is still alive.
    pub fn contains_live_bosses(&self) -> bool {
        self.entities.iter().any(Entity::is_live_boss)
    }

    /// Digest of the terrain and entry points.
    pub fn layout_digest(&self) -> StateHash {
        let mut hasher = StateHasher::for_zone_layout();
        hasher.update_u64(self.grid.cols() as u64);
        hasher.update_u64(self.grid.rows() as u64);
        hasher.update_u32(self.grid.tile_size());
        for tile in self.grid.tiles() {
            hasher.update_u8(tile.kind().tag());
            hasher.update_u8(tile.orientation() as u8);
            hasher.update_bool(tile.is_collidable());
            hasher.update_u64(tile.teleport_destination().map_or(u64::MAX, |d| d as u64));
        }
        for (key, point) in &self.spawns {
            hasher.update_u64(*key as u64);
            hasher.update_vec2(*point);
        }
        hasher.finalize()
    }

    /// Feed terrain collidability and entities into a world hasher.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u64(self.index as u64);
        for tile in self.grid.tiles() {
            hasher.update_bool(tile.is_collidable());
        }
        hasher.update_u32(self.next_id);
        for entity in &self.entities {
            entity.hash_into(hasher);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
