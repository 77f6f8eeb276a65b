//! Compact bitset representation for sets of species.
//!
//! Each bit position corresponds to a row of the alignment. For an alignment
//! with species [A, B, C, D] the set {A, C} is `0b0101`.

/// A set of species indices stored in `u64` words.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Bitset(pub Vec<u64>);

impl Bitset {
    /// Number of words needed to hold `len` bits.
    pub fn words_for(len: usize) -> usize {
        len.div_ceil(64)
    }

    /// Creates a new bitset with all bits set to 0.
    pub fn zeros(words: usize) -> Self {
        Bitset(vec![0u64; words])
    }

    /// Sets the bit at the given index to 1.
    #[inline]
    pub fn set(&mut self, idx: usize) {
        let word = idx >> 6;
        let bit = idx & 63;
        self.0[word] |= 1u64 << bit;
    }

    /// Returns true if the bit at `idx` is set.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.0
            .get(idx >> 6)
            .is_some_and(|word| word & (1u64 << (idx & 63)) != 0)
    }

    /// Returns true if every member of `self` is also in `other`.
    #[inline]
    pub fn is_subset_of(&self, other: &Bitset) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a & !b == 0)
    }

    /// Counts the number of set bits.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no bit is set.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }
}
