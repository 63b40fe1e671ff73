//! Integer key hashing.
//!
//! Keys are sequential vertex ids more often than not, so the mixing function
//! has to avalanche well enough that `0, 1, 2, ...` do not land in adjacent
//! slots once masked down to the table size.

/// Strategy that maps a key to the hash used for slot indexing.
///
/// Tables only ever use the low bits (`hash & (capacity - 1)`), so an
/// implementation must spread entropy into them.
pub trait KeyHasher {
    fn hash_key(&self, key: u64) -> u64;
}

/// SplitMix64 finalizer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SplitMix64;

impl KeyHasher for SplitMix64 {
    #[inline]
    fn hash_key(&self, key: u64) -> u64 {
        let mut n = key.wrapping_add(0x9e37_79b9_7f4a_7c15);
        n = (n ^ (n >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        n = (n ^ (n >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        n ^ (n >> 31)
    }
}

/// Knuth multiplicative hash over a 32-bit word.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Knuth32;

impl KeyHasher for Knuth32 {
    #[inline]
    fn hash_key(&self, key: u64) -> u64 {
        // Fold the high half in so keys wider than the word still differ.
        let word = (key as u32) ^ ((key >> 32) as u32);
        u64::from(word.wrapping_mul(2_654_435_761))
    }
}

/// Default strategy for the target's word size.
#[cfg(target_pointer_width = "64")]
pub type WordHash = SplitMix64;

/// Default strategy for the target's word size.
#[cfg(not(target_pointer_width = "64"))]
pub type WordHash = Knuth32;
