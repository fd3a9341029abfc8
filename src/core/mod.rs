//! Core primitives.
//!
//! Vectors, directions, the seeded RNG and state hashing. Nothing in here
//! knows about zones or actors.

pub mod vec2;
pub mod direction;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec2::Vec2;
pub use direction::Direction;
pub use rng::DeterministicRng;
pub use hash::{StateHash, StateHasher};
