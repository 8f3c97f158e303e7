//! The active set used while merging the code tree.
//!
//! Holds one slot per byte value. Each live slot refers to the arena index
//! of a subtree root that has not been merged yet. Every merge clears
//! exactly one slot, so the live count shrinks by one per step until a
//! single survivor, the tree root, remains.

use crate::ALPHABET_SIZE;

/// Fixed-size set of unmerged subtree roots.
#[derive(Debug, Clone)]
pub struct ActiveSet {
    slots: [Option<usize>; ALPHABET_SIZE],
    live: usize,
}

/// A live slot together with the arena node it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub slot: usize,
    pub node: usize,
}

/// The two lowest-count entries found by [`ActiveSet::find_smallest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub smallest: Entry,
    pub next_smallest: Entry,
}

impl Pair {
    /// The entry at the numerically lower slot.
    pub fn low(&self) -> Entry {
        if self.smallest.slot < self.next_smallest.slot {
            self.smallest
        } else {
            self.next_smallest
        }
    }

    /// The entry at the numerically higher slot.
    pub fn high(&self) -> Entry {
        if self.smallest.slot < self.next_smallest.slot {
            self.next_smallest
        } else {
            self.smallest
        }
    }
}

impl ActiveSet {
    /// Start with slot `i` referring to arena node `i`, for every leaf.
    pub fn new() -> Self {
        let mut slots = [None; ALPHABET_SIZE];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = Some(i);
        }
        ActiveSet {
            slots,
            live: ALPHABET_SIZE,
        }
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.live
    }

    /// True once every slot has been cleared. Never happens during a build.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Arena index held by `slot`, if it is still live.
    pub fn get(&self, slot: usize) -> Option<usize> {
        self.slots[slot]
    }

    /// Locate the two live slots with the lowest counts.
    ///
    /// Slots are scanned in ascending order and comparisons are strict, so
    /// among equal counts the lowest slot is kept as `smallest`. Returns
    /// `None` when fewer than two slots are live.
    pub fn find_smallest(&self, count_of: impl Fn(usize) -> u64) -> Option<Pair> {
        let mut smallest: Option<(Entry, u64)> = None;
        let mut next: Option<(Entry, u64)> = None;

        for (slot, node) in self.slots.iter().enumerate() {
            let Some(node) = *node else { continue };
            let count = count_of(node);
            let entry = Entry { slot, node };

            if smallest.map_or(true, |(_, c)| count < c) {
                next = smallest;
                smallest = Some((entry, count));
            } else if next.map_or(true, |(_, c)| count < c) {
                next = Some((entry, count));
            }
        }

        match (smallest, next) {
            (Some((smallest, _)), Some((next_smallest, _))) => Some(Pair {
                smallest,
                next_smallest,
            }),
            _ => None,
        }
    }

    /// Replace the pair with their merged parent.
    ///
    /// The parent takes the lower slot and the higher slot is cleared, so no
    /// other entry moves.
    pub fn absorb(&mut self, pair: Pair, parent: usize) {
        let (low, high) = (pair.low().slot, pair.high().slot);
        debug_assert!(self.slots[low].is_some() && self.slots[high].is_some());
        self.slots[low] = Some(parent);
        self.slots[high] = None;
        self.live -= 1;
    }

    /// The last remaining subtree root, once exactly one slot is live.
    pub fn survivor(&self) -> Option<usize> {
        if self.live != 1 {
            return None;
        }
        self.slots.iter().flatten().copied().next()
    }
}

impl Default for ActiveSet {
    fn default() -> Self {
        Self::new()
    }
}
