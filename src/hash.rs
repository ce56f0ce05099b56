//! DJB2 hashing and bucket indexing.
//!
//! The table never uses the standard library's randomized hasher: bucket
//! placement must be reproducible from one run to the next, so the default
//! strategy is a fixed DJB2 over the key's UTF-8 bytes.

use core::hash::{BuildHasher, Hasher};

/// Initial accumulator of the DJB2 hash.
pub const DJB2_SEED: u64 = 5381;

/// Streaming DJB2 hasher: `acc = acc * 33 + byte`, wrapping on overflow.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Djb2Hasher {
    hash: u64,
}

impl Djb2Hasher {
    pub const fn new() -> Self {
        Self { hash: DJB2_SEED }
    }
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Djb2Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash = (self.hash << 5)
                .wrapping_add(self.hash)
                .wrapping_add(u64::from(b));
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }
}

/// `BuildHasher` producing fresh [`Djb2Hasher`]s. Default hashing strategy of
/// [`HashTable`](crate::HashTable).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Djb2State;

impl BuildHasher for Djb2State {
    type Hasher = Djb2Hasher;

    fn build_hasher(&self) -> Self::Hasher {
        Djb2Hasher::new()
    }
}

/// DJB2 over a byte string.
pub fn djb2(bytes: &[u8]) -> u64 {
    let mut h = Djb2Hasher::new();
    h.write(bytes);
    h.finish()
}

/// Map a hash onto `[0, capacity)`.
///
/// The hash is unsigned, so plain remainder is already non-negative.
/// `capacity` must be non-zero; the table guarantees this at construction.
#[inline]
pub fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket_index on zero capacity");
    (hash % capacity as u64) as usize
}

/// Hash a string key with any `BuildHasher`, feeding only its bytes.
///
/// `str::hash` appends a terminator byte, which would make the default
/// strategy diverge from textbook DJB2; writing the bytes directly avoids it.
#[inline]
pub(crate) fn hash_key<S: BuildHasher>(state: &S, key: &str) -> u64 {
    let mut h = state.build_hasher();
    h.write(key.as_bytes());
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_seed() {
        assert_eq!(djb2(b""), DJB2_SEED);
    }

    #[test]
    fn reference_values() {
        // 5381 * 33 + 'a'
        assert_eq!(djb2(b"a"), 177_670);
        // 177670 * 33 + 'b'
        assert_eq!(djb2(b"ab"), 5_863_208);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut h = Djb2Hasher::new();
        h.write(b"line_");
        h.write(b"1");
        assert_eq!(h.finish(), djb2(b"line_1"));
    }

    #[test]
    fn long_input_wraps_instead_of_overflowing() {
        let long = vec![0xffu8; 4096];
        // Must not panic in debug builds; value is whatever the wrap yields.
        let a = djb2(&long);
        let b = djb2(&long);
        assert_eq!(a, b);
    }

    #[test]
    fn hash_key_uses_raw_bytes() {
        assert_eq!(hash_key(&Djb2State, "line_1"), djb2(b"line_1"));
        assert_eq!(hash_key(&Djb2State, ""), DJB2_SEED);
    }

    #[test]
    fn bucket_index_stays_in_range() {
        for cap in 1..=17usize {
            for h in [0u64, 1, 5381, u64::MAX, u64::MAX - 1, 1 << 63] {
                assert!(bucket_index(h, cap) < cap);
            }
        }
        assert_eq!(bucket_index(u64::MAX, 1), 0);
        assert_eq!(bucket_index(177_670, 4), 177_670 % 4);
    }
}
