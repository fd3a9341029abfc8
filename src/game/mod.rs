//! Game Logic Module
//!
//! Zones, actors and the rules that move them. Deterministic for a given
//! seed and input sequence.
//!
//! ## Module Structure
//!
//! - `tile`, `zone`: Terrain grid and zone container
//! - `decode`, `assets`: Building zones from layout images
//! - `entity`, `hostile`, `environment`, `friendly`: Zone actors
//! - `player`, `inventory`, `dialogue`: The player and what it carries
//! - `collision`, `combat`: Movement resolution and damage geometry
//! - `input`: Intent buffering and recording
//! - `events`: Step events for logs and renderers
//! - `world`: Global state and the simulation step

pub mod assets;
pub mod collision;
pub mod combat;
pub mod decode;
pub mod dialogue;
pub mod entity;
pub mod environment;
pub mod events;
pub mod friendly;
pub mod hostile;
pub mod input;
pub mod inventory;
pub mod player;
pub mod tile;
pub mod world;
pub mod zone;

// Re-export key types
pub use assets::{AssetSource, FsAssets, MemoryAssets};
pub use decode::ZoneDecoder;
pub use entity::{Entity, EntityId, EntityKind};
pub use events::{GameEvent, GameEventData};
pub use input::{InputRecording, Intent, IntentBuffer, IntentFrame};
pub use player::Player;
pub use tile::{Tile, TileKind};
pub use world::{Phase, StepResult, World, WorldError};
pub use zone::{TileGrid, Zone};
