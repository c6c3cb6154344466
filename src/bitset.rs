//! Compact bitset representation for taxon sets.
//!
//! # Overview
//! Every taxon of a matrix is given an index by sorting the taxon names.
//! A split side is then a bitset where bit `i` is set when taxon `i`
//! belongs to it. Because the index follows the sorted names, two splits
//! over the same taxa always produce the same bitset, which makes the
//! bitset a canonical key for aggregating support.
//!
//! # Example
//! For taxa [A, B, C, D] mapped to indices [0, 1, 2, 3]:
//! - Split {A, C} → bitset `0b0101` (bits 0 and 2 set)
//! - Split {B, C, D} → bitset `0b1110` (bits 1, 2, 3 set)

/// A compact bitset over taxon indices.
///
/// Internally stores bits in `Vec<u64>` words so matrices with more than 64
/// taxa are supported. Each u64 word holds 64 taxon indices.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Bitset(pub Vec<u64>);

impl Bitset {
    /// Creates a new bitset with all bits set to 0.
    ///
    /// # Parameters
    /// - `words`: Number of u64 words needed. Calculate as `ntaxa.div_ceil(64)`
    ///
    /// # Example
    /// ```
    /// # use lento_splits::bitset::Bitset;
    /// // 100 taxa need 2 words (128 bits)
    /// let bs = Bitset::zeros(2);
    /// assert_eq!(bs.0.len(), 2);
    /// ```
    pub fn zeros(words: usize) -> Self {
        Bitset(vec![0u64; words])
    }

    /// Builds a bitset from taxon indices.
    ///
    /// ```
    /// # use lento_splits::bitset::Bitset;
    /// let bs = Bitset::from_indices(1, [0, 2]);
    /// assert_eq!(bs.0[0], 0b101);
    /// ```
    pub fn from_indices<I: IntoIterator<Item = usize>>(words: usize, indices: I) -> Self {
        let mut bitset = Bitset::zeros(words);
        for idx in indices {
            bitset.set(idx);
        }
        bitset
    }

    /// Sets the bit at the given index to 1.
    ///
    /// Marks a taxon as a member of this split side.
    #[inline]
    pub fn set(&mut self, idx: usize) {
        let word = idx >> 6;     // Equivalent to idx / 64
        let bit = idx & 63;      // Equivalent to idx % 64
        self.0[word] |= 1u64 << bit;
    }

    /// Returns true when the taxon at `idx` is a member.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        let word = idx >> 6;
        let bit = idx & 63;
        self.0.get(word).is_some_and(|w| w & (1u64 << bit) != 0)
    }

    /// Performs bitwise OR with another bitset (union operation).
    ///
    /// Merges two taxon sets: `self` becomes `self ∪ other`
    ///
    /// # Example
    /// ```
    /// # use lento_splits::bitset::Bitset;
    /// let mut left = Bitset::zeros(1);
    /// left.set(0);   // {0}
    ///
    /// let mut right = Bitset::zeros(1);
    /// right.set(1);  // {1}
    ///
    /// left.or_assign(&right);  // {0} ∪ {1} = {0, 1}
    /// assert_eq!(left.0[0], 0b11);
    /// ```
    #[inline]
    pub fn or_assign(&mut self, other: &Bitset) {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a |= *b;
        }
    }

    /// Counts the number of set bits (population count).
    ///
    /// Returns how many taxa are on this side of the split.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// `self ⊆ other`
    #[inline]
    pub fn is_subset_of(&self, other: &Bitset) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a & !b == 0)
    }

    /// `self ∩ other = ∅`
    #[inline]
    pub fn is_disjoint(&self, other: &Bitset) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a & b == 0)
    }

    /// Split incompatibility on the informative sides.
    ///
    /// Two sides conflict when the smaller one partially overlaps the bigger
    /// one: neither nested nor disjoint.
    ///
    /// # Example
    /// ```
    /// # use lento_splits::bitset::Bitset;
    /// let ab = Bitset::from_indices(1, [0, 1]);
    /// let ac = Bitset::from_indices(1, [0, 2]);
    /// let abcd = Bitset::from_indices(1, [0, 1, 2, 3]);
    /// assert!(ab.conflicts_with(&ac));
    /// assert!(!ab.conflicts_with(&abcd));
    /// ```
    pub fn conflicts_with(&self, other: &Bitset) -> bool {
        let (smaller, bigger) = if self.count_ones() <= other.count_ones() {
            (self, other)
        } else {
            (other, self)
        };
        !(smaller.is_subset_of(bigger) || smaller.is_disjoint(bigger))
    }

    /// Iterates the indices of the set bits in ascending order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().flat_map(|(w, &word)| {
            (0..64).filter(move |bit| word & (1u64 << bit) != 0).map(move |bit| (w << 6) + bit)
        })
    }
}
