//! Bit-at-a-time decoding over a built [`CodeTree`].

use crate::huffman::CodeTree;
use crate::{HuffError, HuffResult};

/// Cursor that follows one code from the root down to a leaf.
///
/// Feed bits with [`process_bit`](Walker::process_bit) and poll
/// [`code_finished`](Walker::code_finished) after each one. The walker never
/// stops on its own; the caller stops after the expected number of bytes.
#[derive(Debug, Clone)]
pub struct Walker<'a> {
    tree: &'a CodeTree,
    root: usize,
    current: usize,
}

impl<'a> Walker<'a> {
    /// Start at the root of `tree`.
    pub fn new(tree: &'a CodeTree) -> HuffResult<Self> {
        let root = tree.root().ok_or(HuffError::TreeNotBuilt)?;
        Ok(Walker {
            tree,
            root,
            current: root,
        })
    }

    /// Step to the `less` child on 0 or the `more` child on 1.
    ///
    /// A bit received while sitting on a leaf leaves the cursor in place.
    pub fn process_bit(&mut self, bit: bool) {
        let node = self.tree.node(self.current);
        let next = if bit { node.more } else { node.less };
        if let Some(next) = next {
            self.current = next;
        }
    }

    /// The decoded byte once the cursor reaches a leaf, resetting to the root.
    pub fn code_finished(&mut self) -> Option<u8> {
        if !self.tree.node(self.current).is_leaf() {
            return None;
        }
        // Leaves occupy arena slots 0..256, one per byte value.
        let byte = self.current as u8;
        self.current = self.root;
        Some(byte)
    }

    /// `process_bit` followed by `code_finished`.
    pub fn feed(&mut self, bit: bool) -> Option<u8> {
        self.process_bit(bit);
        self.code_finished()
    }

    /// True while part of a code has been consumed.
    pub fn is_mid_code(&self) -> bool {
        self.current != self.root
    }
}
