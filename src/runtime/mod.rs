//! Runtime
//!
//! Wall-clock pacing around the deterministic core. Nothing here changes
//! game rules; it decides when steps run and what the renderer sees.

pub mod runner;
pub mod scheduler;
pub mod snapshot;

pub use runner::{run, SimControl};
pub use scheduler::{Advance, Scheduler};
pub use snapshot::{draw_order, DrawRef, EntityView, PlayerView, RenderFrame};
