//! Zone Decoder
//!
//! Turns an encoded layout image into a [`Zone`]. Each pixel is one tile;
//! its colour selects the terrain and, optionally, an actor or entry point
//! placed at the tile centre. Rules are tried in a fixed order and the
//! first match wins.

use std::collections::BTreeMap;

use image::RgbImage;
use tracing::debug;

use crate::core::direction::Direction;
use crate::core::vec2::Vec2;
use crate::game::assets::{AssetSource, ZoneImages};
use crate::game::dialogue::Dialogue;
use crate::game::entity::EntityTemplate;
use crate::game::friendly::{self, Friendly};
use crate::game::hostile::HostileTier;
use crate::game::inventory::ItemKind;
use crate::game::tile::{LockTier, Tile, TileKind};
use crate::game::zone::{TileGrid, Zone, ZoneError};

/// What a pixel puts on top of its tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Entry point keyed by origin
    Spawn(usize),
    /// Friendly actor
    Friendly {
        /// Art identity
        id: u8,
        /// Initial facing
        facing: Direction,
    },
    /// Any other actor
    Entity(EntityTemplate),
}

/// Decoded pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Terrain
    pub tile: Tile,
    /// Occupant, if any
    pub placement: Option<Placement>,
}

impl Cell {
    fn terrain(kind: TileKind) -> Self {
        Self {
            tile: Tile::new(kind),
            placement: None,
        }
    }

    fn open_with(placement: Placement) -> Self {
        Self {
            tile: Tile::open(),
            placement: Some(placement),
        }
    }
}

/// Classify one pixel of zone `zone_index`.
///
/// `has_friendly` reports whether art exists for a friendly id; green
/// pixels naming a missing friendly fall through to later rules.
pub fn classify(rgb: [u8; 3], zone_index: usize, has_friendly: impl Fn(u8) -> bool) -> Cell {
    let [r, g, b] = rgb;
    match (r, g, b) {
        (0, 0, 0) => Cell::terrain(TileKind::Wall),
        (255, 0, 255) => Cell::terrain(TileKind::Pit),
        (0, g, 255) if g <= 254 => Cell::open_with(Placement::Spawn(g as usize)),
        (r, 255, b) if b <= 3 && has_friendly(r) => Cell::open_with(Placement::Friendly {
            id: r,
            facing: Direction::from_index(b).unwrap_or_default(),
        }),
        (255, 255, 0) => Cell::terrain(TileKind::Teleport {
            destination: zone_index + 1,
        }),
        (255, 255, b) if b < 255 => Cell::terrain(TileKind::Teleport {
            destination: (b - 1) as usize,
        }),
        (255, 0, 0) => Cell::open_with(Placement::Entity(EntityTemplate::Hostile(HostileTier::Basic))),
        (0, 255, 255) => Cell::open_with(Placement::Entity(EntityTemplate::Hostile(HostileTier::MidBoss))),
        (1, 255, 255) => Cell::open_with(Placement::Entity(EntityTemplate::Hostile(HostileTier::EndBoss))),
        (100, 150, b) if b <= 3 => {
            let amount = match b {
                1 => 1,
                2 => 5,
                3 => 10,
                _ => return Cell::terrain(TileKind::Open),
            };
            Cell::open_with(Placement::Entity(EntityTemplate::Money(amount)))
        }
        (r, 150, b) if r >= 100 => Cell::open_with(Placement::Entity(EntityTemplate::Item {
            kind: ItemKind::from_id(b),
            cost: (r as u32 - 100) * 5,
        })),
        (51..=54, 51..=53, 150) => {
            let facing = Direction::from_index(r - 51).unwrap_or_default();
            let tier = match g {
                51 => LockTier::I,
                52 => LockTier::II,
                _ => LockTier::III,
            };
            Cell {
                tile: Tile::oriented(TileKind::Lock(tier), facing),
                placement: None,
            }
        }
        (1..=3, 150, 0) => Cell::open_with(Placement::Entity(EntityTemplate::Destructible(r))),
        _ => Cell::terrain(TileKind::Open),
    }
}

/// Builds zones from layout images.
#[derive(Clone, Copy, Debug)]
pub struct ZoneDecoder {
    tile_size: u32,
}

impl ZoneDecoder {
    /// Decoder for tiles `tile_size` pixels wide.
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    /// Decode every pixel into terrain, entry points and placements.
    pub fn decode_layout(
        &self,
        layout: &RgbImage,
        zone_index: usize,
        assets: &dyn AssetSource,
    ) -> (TileGrid, BTreeMap<usize, Vec2>, Vec<(Vec2, Placement)>) {
        let (width, height) = layout.dimensions();
        let (cols, rows) = (width as usize, height as usize);
        let mut tiles = Vec::with_capacity(cols * rows);
        let mut marks = Vec::new();

        for (x, y, pixel) in layout.enumerate_pixels() {
            let cell = classify(pixel.0, zone_index, |id| assets.friendly_exists(id));
            tiles.push(cell.tile);
            if let Some(placement) = cell.placement {
                marks.push((x as usize, y as usize, placement));
            }
        }

        let grid = TileGrid::new(cols, rows, self.tile_size, tiles);
        let mut spawns = BTreeMap::new();
        let mut placements = Vec::new();
        for (col, row, placement) in marks {
            let centre = grid.cell_centre(col, row);
            match placement {
                Placement::Spawn(key) => {
                    spawns.insert(key, centre);
                }
                placement => placements.push((centre, placement)),
            }
        }

        (grid, spawns, placements)
    }

    /// Build zone `zone_index` from its images.
    pub fn decode(
        &self,
        zone_index: usize,
        images: &ZoneImages,
        assets: &dyn AssetSource,
    ) -> Result<Zone, ZoneError> {
        let (grid, spawns, placements) = self.decode_layout(&images.layout, zone_index, assets);
        let mut zone = Zone::new(zone_index, grid, spawns, images.art.clone())?;

        for (position, placement) in placements {
            match placement {
                Placement::Entity(template) => {
                    zone.spawn_entity(template, position);
                }
                Placement::Friendly { id, facing } => {
                    let dialogue = assets.friendly_dialogue(id).map(|text| Dialogue::parse(&text));
                    let state = Friendly::new(id, dialogue, false);
                    zone.insert_with(|eid| friendly::spawn(eid, position, facing, state));
                }
                Placement::Spawn(_) => {}
            }
        }

        debug!(
            zone = zone_index,
            cols = zone.grid.cols(),
            rows = zone.grid.rows(),
            spawns = ?zone.spawns().keys().collect::<Vec<_>>(),
            entities = zone.entities.len(),
            layout = %hex::encode(&zone.layout_digest()[..8]),
            "zone decoded"
        );
        Ok(zone)
    }
}

// =============================================================================
// TESTS
// =============================================================================
