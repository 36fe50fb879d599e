// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-length bit-vector over the node-id space.
//!
//! Each worker owns private instances (sent-to, voted-to-halt) for the
//! duration of one superstep; the orchestrator OR-reduces them after the
//! join barrier. No instance is ever written by two threads.

const WORD_BITS: usize = u64::BITS as usize;

/// A bit-vector with one bit per node id in `[0, capacity)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitSet {
    words: Vec<u64>,
    capacity: usize,
}

impl BitSet {
    /// Creates an all-clear bit-vector covering `capacity` node ids.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            capacity,
        }
    }

    /// Number of addressable bits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if bit `index` is set. Out-of-range indices read as clear.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }
        self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Sets bit `index`, which must be below `capacity`.
    ///
    /// Callers pass node ids already checked against the node count; debug
    /// builds re-check.
    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.capacity, "bit {index} out of range");
        self.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
    }

    /// Clears bit `index`. Out-of-range indices are ignored.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        if index < self.capacity {
            self.words[index / WORD_BITS] &= !(1 << (index % WORD_BITS));
        }
    }

    /// Returns `true` when no bit is set.
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// In-place logical OR with `other`, which must have the same capacity.
    pub fn union_with(&mut self, other: &Self) {
        debug_assert_eq!(self.capacity, other.capacity, "bit-vector capacity mismatch");
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= *theirs;
        }
    }

    /// Iterates the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(w * WORD_BITS + tz)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bitset_is_clear() {
        let bits = BitSet::new(130);
        assert!(bits.is_clear());
        assert_eq!(bits.capacity(), 130);
        assert_eq!(bits.count_ones(), 0);
    }

    #[test]
    fn set_get_clear_across_word_boundaries() {
        let mut bits = BitSet::new(200);
        for i in [0, 63, 64, 127, 128, 199] {
            bits.set(i);
        }
        assert!(bits.get(63) && bits.get(64) && bits.get(199));
        assert!(!bits.get(1) && !bits.get(65));
        assert!(!bits.get(10_000), "out of range reads as clear");
        bits.clear(64);
        assert!(!bits.get(64));
        assert_eq!(bits.count_ones(), 5);
    }

    #[test]
    fn union_merges_private_vectors() {
        let mut a = BitSet::new(70);
        let mut b = BitSet::new(70);
        a.set(1);
        b.set(69);
        b.set(1);
        a.union_with(&b);
        assert_eq!(a.iter_ones().collect::<Vec<_>>(), vec![1, 69]);
    }

    #[test]
    fn iter_ones_is_ascending() {
        let mut bits = BitSet::new(300);
        for i in [299, 5, 64, 0, 128] {
            bits.set(i);
        }
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), vec![0, 5, 64, 128, 299]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn set_out_of_range_panics() {
        let mut bits = BitSet::new(8);
        bits.set(8);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "capacity mismatch")]
    fn union_of_mismatched_capacities_is_caught_in_debug() {
        let mut a = BitSet::new(8);
        a.union_with(&BitSet::new(9));
    }
}
