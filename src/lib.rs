//! # Elemental Simulation Core
//!
//! Fixed-timestep simulation for a 2D tile-based action-adventure.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ELEMENTAL SIM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec2.rs     - Pixel-space vector                        │
//! │  ├── direction.rs- Cardinal directions                       │
//! │  ├── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Game rules (deterministic)                │
//! │  ├── decode.rs   - Layout image to zone                      │
//! │  ├── zone.rs     - Tile grid, entry points, actors           │
//! │  ├── collision.rs- Movement against tiles and actors         │
//! │  ├── player.rs   - The player                                │
//! │  ├── hostile.rs  - Pursuers and the splitting boss           │
//! │  └── world.rs    - Phases and the simulation step            │
//! │                                                              │
//! │  camera.rs       - Viewport offsets                          │
//! │  config.rs       - Rates, sizes, seed, asset root            │
//! │                                                              │
//! │  runtime/        - Wall-clock pacing (non-deterministic)     │
//! │  ├── scheduler.rs- Step accumulator                          │
//! │  ├── runner.rs   - Async loop and control flags              │
//! │  └── snapshot.rs - Render frames                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! `core/` and `game/` read no clocks and iterate in a fixed order. Drop
//! rolls come from a seeded PRNG. The same assets, seed and intent frames
//! give the same [`World::compute_hash`](game::World::compute_hash) on
//! every run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod camera;
pub mod config;
pub mod core;
pub mod game;
pub mod runtime;

// Re-export commonly used types
pub use camera::{viewport, Viewport};
pub use config::{ConfigError, SimConfig};
pub use core::rng::DeterministicRng;
pub use core::vec2::Vec2;
pub use game::input::{InputRecording, Intent, IntentBuffer, IntentFrame};
pub use game::world::{Phase, World, WorldError};
pub use runtime::{RenderFrame, Scheduler, SimControl};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation steps per second
pub const UPDATES_PER_SECOND: u32 = 30;

/// Animation ticks per second
pub const ANIMATION_FPS: u32 = 10;

/// Tile edge in pixels
pub const TILE_SIZE: u32 = 32;

/// Viewport width in tiles
pub const TILES_WIDE: u32 = 30;

/// Viewport height in tiles
pub const TILES_HIGH: u32 = 20;
