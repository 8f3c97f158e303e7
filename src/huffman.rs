/// Huffman code tree: frequency accumulation, tree construction and code
/// generation over the full 256-symbol byte alphabet.
///
/// All nodes live in one arena. Slots 0..256 are the leaves (slot `b` is byte
/// value `b`) and merge nodes are appended after them, so a finished tree
/// always occupies exactly 511 slots. Links between nodes are arena indices.
///
/// Every leaf takes part in the merge, including bytes that never occur.
/// That makes the tree shape a pure function of the 256 counts, which is
/// what lets the decoder rebuild the encoder's tree from the header alone.
use std::fmt;

use bitvec::prelude::*;
use log::{debug, trace};

use crate::active::ActiveSet;
use crate::frequency::{FrequencyTable, Statistics};
use crate::{HuffError, HuffResult, ALPHABET_SIZE, NODE_COUNT};

/// A node in the code tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Occurrences of this byte, or the sum over the subtree.
    pub count: u64,
    /// `count / total`. Only set on leaves.
    pub probability: f64,
    /// Node one step closer to the root. `None` for the root and before the
    /// tree is built.
    pub parent: Option<usize>,
    /// Child with the smaller count (or lower active slot on a tie).
    pub less: Option<usize>,
    /// The other child.
    pub more: Option<usize>,
}

impl Node {
    fn leaf(count: u64) -> Self {
        Node {
            count,
            probability: 0.0,
            parent: None,
            less: None,
            more: None,
        }
    }

    /// Leaves have no children; merge nodes always have two.
    pub fn is_leaf(&self) -> bool {
        self.less.is_none() && self.more.is_none()
    }
}

/// The root-to-leaf path of one byte value, most significant bit first.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Code(BitVec<u8, Msb0>);

impl Code {
    /// Number of bits in the code.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True only for a leaf that is also the root.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The bits in emission order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().by_vals()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        &self.0
    }

    /// True if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(self.0.as_bitslice())
    }
}

#[cfg(test)]
impl From<&str> for Code {
    /// Parse a string of `'0'`/`'1'` digits. Panics on anything else.
    fn from(digits: &str) -> Self {
        Code(
            digits
                .chars()
                .map(|c| match c {
                    '0' => false,
                    '1' => true,
                    other => panic!("invalid code digit {other:?}"),
                })
                .collect(),
        )
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({self})")
    }
}

/// Byte statistics, merge tree and derived codes for one compression run.
#[derive(Debug, Clone)]
pub struct CodeTree {
    /// Leaves first, merge nodes appended in merge order.
    nodes: Vec<Node>,
    root: Option<usize>,
    /// Indexed by byte value. Empty until `build_codes`.
    codes: Vec<Code>,
}

impl CodeTree {
    /// Create a tree with all 256 counts at zero.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(NODE_COUNT);
        nodes.resize(ALPHABET_SIZE, Node::leaf(0));
        CodeTree {
            nodes,
            root: None,
            codes: Vec::new(),
        }
    }

    /// Rehydrate from persisted counts and run every build step.
    pub fn from_counts(counts: &[u64; ALPHABET_SIZE]) -> HuffResult<Self> {
        let mut tree = Self::new();
        for (value, &count) in counts.iter().enumerate() {
            tree.set_count(value as u8, count);
        }
        tree.finalize()?;
        Ok(tree)
    }

    /// Count the bytes of `input` and run every build step.
    pub fn from_data(input: &[u8]) -> HuffResult<Self> {
        let mut tree = Self::new();
        for &b in input {
            tree.increment(b);
        }
        tree.finalize()?;
        Ok(tree)
    }

    fn finalize(&mut self) -> HuffResult<Statistics> {
        let stats = self.compute_probabilities();
        self.build_tree()?;
        self.build_codes()?;
        Ok(stats)
    }

    /// Count one more occurrence of `byte`.
    ///
    /// Counts must be final before [`build_tree`](Self::build_tree).
    pub fn increment(&mut self, byte: u8) {
        let leaf = &mut self.nodes[byte as usize];
        leaf.count = leaf.count.saturating_add(1);
    }

    /// Set the count of `byte` outright, e.g. from a persisted header.
    pub fn set_count(&mut self, byte: u8, count: u64) {
        self.nodes[byte as usize].count = count;
    }

    pub fn get_count(&self, byte: u8) -> u64 {
        self.nodes[byte as usize].count
    }

    /// Sum of all 256 leaf counts, saturating at `u64::MAX`.
    pub fn get_count_total(&self) -> u64 {
        self.leaves()
            .iter()
            .fold(0u64, |acc, leaf| acc.saturating_add(leaf.count))
    }

    /// The 256 leaf counts in byte order, as written to the header.
    pub fn counts(&self) -> [u64; ALPHABET_SIZE] {
        let mut counts = [0u64; ALPHABET_SIZE];
        for (c, leaf) in counts.iter_mut().zip(self.leaves()) {
            *c = leaf.count;
        }
        counts
    }

    pub fn frequency_table(&self) -> FrequencyTable {
        FrequencyTable::from_counts(&self.counts())
    }

    /// Assign each leaf its probability and summarize the distribution.
    ///
    /// With a zero total every probability is 0.0.
    pub fn compute_probabilities(&mut self) -> Statistics {
        let stats = self.frequency_table().statistics();
        for (leaf, &p) in self.nodes[..ALPHABET_SIZE]
            .iter_mut()
            .zip(stats.probabilities.iter())
        {
            leaf.probability = p;
        }
        debug!(
            "computed probabilities: total={} used={} entropy={:.4}",
            stats.total, stats.used, stats.entropy
        );
        stats
    }

    /// Probability assigned to `byte` by [`compute_probabilities`](Self::compute_probabilities).
    pub fn probability(&self, byte: u8) -> f64 {
        self.nodes[byte as usize].probability
    }

    /// Merge the 256 leaves into a single tree.
    ///
    /// Repeatedly joins the two lowest-count active subtrees. When the two
    /// counts differ the smaller one becomes `less`. When they are equal the
    /// one found at the lower active slot becomes `less`. The parent then
    /// takes over the lower slot. Encoder and decoder must agree on this rule
    /// exactly or they build different trees from the same counts.
    pub fn build_tree(&mut self) -> HuffResult<()> {
        if self.root.is_some() {
            return Err(HuffError::TreeAlreadyBuilt);
        }
        // Every merge count is bounded by the total, so checking it once is
        // enough.
        self.leaves()
            .iter()
            .try_fold(0u64, |acc, leaf| acc.checked_add(leaf.count))
            .ok_or(HuffError::CountOverflow)?;

        let mut active = ActiveSet::new();
        while let Some(pair) = active.find_smallest(|node| self.nodes[node].count) {
            let small = pair.smallest.node;
            let next = pair.next_smallest.node;
            let small_count = self.nodes[small].count;
            let next_count = self.nodes[next].count;

            let (less, more) = if small_count != next_count {
                (small, next)
            } else {
                (pair.low().node, pair.high().node)
            };

            let parent = self.nodes.len();
            self.nodes.push(Node {
                count: small_count + next_count,
                probability: 0.0,
                parent: None,
                less: Some(less),
                more: Some(more),
            });
            self.nodes[small].parent = Some(parent);
            self.nodes[next].parent = Some(parent);
            active.absorb(pair, parent);

            trace!(
                "merge #{}: less={} more={} count={}",
                parent - ALPHABET_SIZE,
                less,
                more,
                self.nodes[parent].count
            );
        }

        let root = active.survivor().ok_or(HuffError::TreeNotBuilt)?;
        debug_assert_eq!(self.nodes.len(), NODE_COUNT);
        self.root = Some(root);
        debug!(
            "built code tree: {} nodes, root count {}",
            self.nodes.len(),
            self.nodes[root].count
        );
        Ok(())
    }

    /// Derive every leaf's code by walking parent links up to the root.
    ///
    /// Each step records 1 when leaving a `more` child and 0 when leaving a
    /// `less` child; the digits are then reversed into root-to-leaf order.
    pub fn build_codes(&mut self) -> HuffResult<()> {
        let root = self.root.ok_or(HuffError::TreeNotBuilt)?;

        let mut codes = Vec::with_capacity(ALPHABET_SIZE);
        for leaf in 0..ALPHABET_SIZE {
            let mut bits: BitVec<u8, Msb0> = BitVec::new();
            let mut current = leaf;
            while let Some(parent) = self.nodes[current].parent {
                bits.push(self.nodes[parent].more == Some(current));
                current = parent;
            }
            debug_assert_eq!(current, root);
            bits.reverse();
            codes.push(Code(bits));
        }
        self.codes = codes;

        debug!(
            "built codes: longest {} bits",
            self.codes.iter().map(Code::len).max().unwrap_or(0)
        );
        Ok(())
    }

    /// The code for `byte`, once [`build_codes`](Self::build_codes) has run.
    pub fn get_code(&self, byte: u8) -> Option<&Code> {
        self.codes.get(byte as usize)
    }

    /// True once `build_tree` has produced a root.
    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    pub fn codes_built(&self) -> bool {
        self.codes.len() == ALPHABET_SIZE
    }

    /// Arena index of the root.
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Count held by the root: the sum over all leaves.
    pub fn root_count(&self) -> Option<u64> {
        self.root.map(|r| self.nodes[r].count)
    }

    /// Arena node at `index`. Panics if the index is out of range.
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Number of arena slots in use: 256 before the build, 511 after.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn leaves(&self) -> &[Node] {
        &self.nodes[..ALPHABET_SIZE]
    }

    /// Total length of the encoded body in bits.
    pub fn encoded_bits(&self) -> Option<u64> {
        if !self.codes_built() {
            return None;
        }
        Some(
            self.codes
                .iter()
                .zip(self.leaves())
                .fold(0u64, |acc, (code, leaf)| {
                    acc.saturating_add(leaf.count.saturating_mul(code.len() as u64))
                }),
        )
    }

    /// Mean code length in bits per input byte.
    ///
    /// `None` before codes are built or when there is no input.
    pub fn average_code_length(&self) -> Option<f64> {
        let total = self.get_count_total();
        if total == 0 {
            return None;
        }
        self.encoded_bits().map(|bits| bits as f64 / total as f64)
    }
}

impl Default for CodeTree {
    fn default() -> Self {
        Self::new()
    }
}
