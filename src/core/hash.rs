//! State Hashing
//!
//! SHA-256 digests of zone layouts and world state. Replays and decode
//! checks compare these instead of walking whole structures.

use sha2::{Digest, Sha256};

use super::vec2::Vec2;

/// 32-byte digest.
pub type StateHash = [u8; 32];

/// Incremental hasher. Callers feed fields in a fixed order; integers are
/// little-endian and floats go in by bit pattern.
pub struct StateHasher {
    inner: Sha256,
}

impl StateHasher {
    /// Hasher whose input starts with `domain`.
    pub fn new(domain: &[u8]) -> Self {
        Self {
            inner: Sha256::new_with_prefix(domain),
        }
    }

    /// Domain for decoded terrain and entry points.
    pub fn for_zone_layout() -> Self {
        Self::new(b"ELEMENTAL_ZONE_V1")
    }

    /// Domain for everything that changes during play.
    pub fn for_world_state() -> Self {
        Self::new(b"ELEMENTAL_WORLD_V1")
    }

    #[inline]
    fn bytes(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Feed a byte.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.bytes(&[value]);
    }

    /// Feed a `u32`.
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.bytes(&value.to_le_bytes());
    }

    /// Feed a `u64`.
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.bytes(&value.to_le_bytes());
    }

    /// Feed an `i32`.
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.bytes(&value.to_le_bytes());
    }

    /// Feed an `f64`. `0.0` and `-0.0` hash differently.
    #[inline]
    pub fn update_f64(&mut self, value: f64) {
        self.update_u64(value.to_bits());
    }

    /// Feed both components of a vector.
    #[inline]
    pub fn update_vec2(&mut self, value: Vec2) {
        self.update_f64(value.x);
        self.update_f64(value.y);
    }

    /// Feed a flag as one byte.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(u8::from(value));
    }

    /// Digest of everything fed so far.
    pub fn finalize(self) -> StateHash {
        self.inner.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(feed: impl FnOnce(&mut StateHasher)) -> StateHash {
        let mut h = StateHasher::for_world_state();
        feed(&mut h);
        h.finalize()
    }

    #[test]
    fn test_repeatable() {
        let feed = |h: &mut StateHasher| {
            h.update_u32(100);
            h.update_vec2(Vec2::new(1.0, 2.0));
            h.update_bool(true);
        };
        assert_eq!(digest(feed), digest(feed));
    }

    #[test]
    fn test_order_and_sign_matter() {
        assert_ne!(
            digest(|h| {
                h.update_u8(1);
                h.update_u8(2);
            }),
            digest(|h| {
                h.update_u8(2);
                h.update_u8(1);
            })
        );
        assert_ne!(digest(|h| h.update_f64(0.0)), digest(|h| h.update_f64(-0.0)));
    }

    #[test]
    fn test_domains_differ() {
        assert_ne!(
            StateHasher::for_zone_layout().finalize(),
            StateHasher::for_world_state().finalize()
        );
    }
}
