//! # huff
//!
//! Order-0 Huffman compression over the fixed 256-symbol byte alphabet.
//!
//! The compressed format is a raw header of 256 little-endian `u64` byte
//! counts followed by the MSB-first bit stream of per-byte codes. Both sides
//! rebuild the same [`CodeTree`] from the counts, so the tree itself is never
//! stored.
//!
//! ```
//! let data = b"abracadabra";
//! let packed = huff::streaming::compress(data).unwrap();
//! let unpacked = huff::streaming::decompress(&packed).unwrap();
//! assert_eq!(unpacked, data);
//! ```

pub mod active;
pub mod bitio;
pub mod cli;
pub mod frequency;
pub mod huffman;
pub mod report;
pub mod streaming;
pub mod walker;

#[cfg(test)]
mod validation;

pub use huffman::{Code, CodeTree};
pub use walker::Walker;

/// Number of distinct symbols in the alphabet.
pub const ALPHABET_SIZE: usize = 256;

/// Arena slots needed for a full binary tree over the alphabet.
pub const NODE_COUNT: usize = 2 * ALPHABET_SIZE - 1;

/// Error types for tree construction and decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HuffError {
    /// `build_tree` was called on a tree that already has a root.
    #[error("code tree already built")]
    TreeAlreadyBuilt,
    /// An operation needs the merge tree but `build_tree` has not run.
    #[error("code tree not built")]
    TreeNotBuilt,
    /// Encoding was attempted before `build_codes`.
    #[error("codes not built")]
    CodesNotBuilt,
    /// The byte counts sum past `u64::MAX`.
    #[error("byte counts overflow a 64-bit total")]
    CountOverflow,
    /// The input ended inside the 2048-byte count header.
    #[error("truncated count header")]
    TruncatedHeader,
    /// The bit stream ran out before the header total was decoded.
    #[error("bit stream ended after {decoded} of {expected} bytes")]
    TruncatedBody { expected: u64, decoded: u64 },
}

pub type HuffResult<T> = Result<T, HuffError>;
