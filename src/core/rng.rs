//! Seeded Randomness
//!
//! Xorshift128+ seeded through SplitMix64. Drop rolls are the only
//! consumer; a world built from the same seed rolls the same loot.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Xorshift128+ generator.
///
/// ```
/// use elemental::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(42);
/// let mut b = DeterministicRng::new(42);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Generator for `seed`. Two SplitMix64 outputs fill the state.
    pub fn new(seed: u64) -> Self {
        let mut mix = seed;
        let state = [splitmix64(&mut mix), splitmix64(&mut mix)];
        // An all-zero state would only ever yield zeros.
        if state == [0, 0] {
            return Self { state: [1, 1] };
        }
        Self { state }
    }

    /// Generator for the named `stream` of a world seeded with `seed`.
    pub fn for_stream(seed: u64, stream: &[u8]) -> Self {
        Self::new(derive_seed(seed, stream))
    }

    /// Next raw output.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let [a, b] = self.state;
        let out = a.wrapping_add(b);
        let x = a ^ b;
        self.state = [a.rotate_left(24) ^ x ^ (x << 16), x.rotate_left(37)];
        out
    }

    /// Uniform-ish value in `0..max`; zero when `max` is zero.
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        match max {
            0 => 0,
            m => (self.next_u64() % u64::from(m)) as u32,
        }
    }

    /// Any one element of `items`.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_int(items.len() as u32) as usize;
        items.get(idx)
    }

    /// Internal state, for hashing.
    pub fn state(&self) -> [u64; 2] {
        self.state
    }
}

#[inline]
fn splitmix64(x: &mut u64) -> u64 {
    *x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for one named stream, independent of every other stream.
pub fn derive_seed(seed: u64, stream: &[u8]) -> u64 {
    let digest = Sha256::new()
        .chain_update(b"ELEMENTAL_SEED_V1")
        .chain_update(seed.to_le_bytes())
        .chain_update(stream)
        .finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}
