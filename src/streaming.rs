/// Two-pass streaming compression and single-pass decompression.
///
/// Compression reads its input twice: once to count bytes, once to emit codes.
/// The input therefore has to be seekable. Decompression reads the count
/// header, rebuilds the identical [`CodeTree`] and walks it bit by bit until
/// the header total has been produced.
///
/// Memory usage is bounded by one block buffer regardless of input size.
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::bitio::{BitReader, BitWriter, HEADER_SIZE};
use crate::frequency::Statistics;
use crate::huffman::{Code, CodeTree};
use crate::walker::Walker;
use crate::HuffError;

/// Bytes between progress callbacks, in both directions.
pub const PROGRESS_INTERVAL: u64 = 8 * 1024;

const BLOCK_SIZE: usize = PROGRESS_INTERVAL as usize;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Error type for streaming operations.
///
/// Kept separate from `HuffError` so that `HuffError` retains `Clone + PartialEq`.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Tree construction or decoding error.
    #[error(transparent)]
    Huff(#[from] HuffError),
    /// I/O error from `Read` or `Write` operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The input file could not be opened.
    #[error("can't open {} for input: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    /// The output file could not be created.
    #[error("can't create {} for output: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },
}

/// Result type for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Outcome of a full compression run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressSummary {
    /// Bytes read from the input.
    pub input_bytes: u64,
    /// Bytes written, header included.
    pub output_bytes: u64,
    /// Code bits in the body, padding excluded.
    pub encoded_bits: u64,
    /// Distribution figures from the counting pass.
    pub statistics: Statistics,
}

// ---------------------------------------------------------------------------
// Individual passes
// ---------------------------------------------------------------------------

/// Count every byte of `input` into `tree`.
///
/// `progress` receives the running byte count after each full block.
/// Returns the number of bytes read.
pub fn count_stream<R: Read>(
    mut input: R,
    tree: &mut CodeTree,
    mut progress: impl FnMut(u64),
) -> StreamResult<u64> {
    let mut buf = vec![0u8; BLOCK_SIZE];
    let mut total = 0u64;
    loop {
        let n = read_block(&mut input, &mut buf)?;
        for &b in &buf[..n] {
            tree.increment(b);
        }
        total += n as u64;
        if n < BLOCK_SIZE {
            break;
        }
        progress(total);
    }
    debug!("counted {} bytes", total);
    Ok(total)
}

/// Emit the code of every byte of `input` into `writer`.
///
/// The header must already have been written. Returns the number of bytes
/// encoded.
pub fn encode_stream<R: Read, W: Write>(
    mut input: R,
    writer: &mut BitWriter<W>,
    tree: &CodeTree,
    mut progress: impl FnMut(u64),
) -> StreamResult<u64> {
    let codes: Vec<&Code> = (0..=255u8)
        .map(|b| tree.get_code(b))
        .collect::<Option<_>>()
        .ok_or(HuffError::CodesNotBuilt)?;

    let mut buf = vec![0u8; BLOCK_SIZE];
    let mut total = 0u64;
    loop {
        let n = read_block(&mut input, &mut buf)?;
        for &b in &buf[..n] {
            writer.put_code(codes[b as usize])?;
        }
        total += n as u64;
        if n < BLOCK_SIZE {
            break;
        }
        progress(total);
    }
    debug!("encoded {} bytes into {} bits", total, writer.bits_written());
    Ok(total)
}

/// Decode exactly the tree's total byte count from `reader` into `output`.
///
/// Padding after the last code is never read. A bit stream that ends before
/// the total is reached is a [`HuffError::TruncatedBody`]; the bytes decoded
/// up to that point have already been written.
pub fn decode_stream<R: Read, W: Write>(
    reader: &mut BitReader<R>,
    mut output: W,
    tree: &CodeTree,
    mut progress: impl FnMut(u64),
) -> StreamResult<u64> {
    let expected = tree.root_count().ok_or(HuffError::TreeNotBuilt)?;
    let mut walker = Walker::new(tree)?;
    let mut buf = Vec::with_capacity(BLOCK_SIZE);
    let mut decoded = 0u64;

    while decoded < expected {
        let Some(bit) = reader.get_bit()? else {
            output.write_all(&buf)?;
            output.flush()?;
            warn!("bit stream ended after {} of {} bytes", decoded, expected);
            return Err(HuffError::TruncatedBody { expected, decoded }.into());
        };
        if let Some(byte) = walker.feed(bit) {
            buf.push(byte);
            decoded += 1;
            if buf.len() == BLOCK_SIZE {
                output.write_all(&buf)?;
                buf.clear();
                progress(decoded);
            }
        }
    }

    output.write_all(&buf)?;
    output.flush()?;
    debug!("decoded {} bytes", decoded);
    Ok(decoded)
}

// ---------------------------------------------------------------------------
// Whole-stream drivers
// ---------------------------------------------------------------------------

/// Compress `input` into `output`: header, then codes.
///
/// The input is rewound to its starting position between the counting and
/// encoding passes.
pub fn compress_stream<R: Read + Seek, W: Write>(
    mut input: R,
    output: W,
) -> StreamResult<CompressSummary> {
    let start = input.stream_position()?;
    let mut tree = CodeTree::new();
    let input_bytes = count_stream(&mut input, &mut tree, |_| {})?;

    let statistics = tree.compute_probabilities();
    tree.build_tree()?;
    tree.build_codes()?;

    input.seek(SeekFrom::Start(start))?;
    let mut writer = BitWriter::new(output);
    writer.write_header(&tree.counts())?;
    encode_stream(&mut input, &mut writer, &tree, |_| {})?;

    let encoded_bits = writer.bits_written();
    writer.finish()?;
    Ok(CompressSummary {
        input_bytes,
        output_bytes: HEADER_SIZE as u64 + encoded_bits.div_ceil(8),
        encoded_bits,
        statistics,
    })
}

/// Decompress `input` into `output`. Returns the number of bytes produced.
pub fn decompress_stream<R: Read, W: Write>(input: R, output: W) -> StreamResult<u64> {
    let mut reader = BitReader::new(BufReader::new(input));
    let counts = reader.read_header()?;
    let tree = CodeTree::from_counts(&counts)?;
    decode_stream(&mut reader, output, &tree, |_| {})
}

/// Compress an in-memory buffer.
pub fn compress(input: &[u8]) -> StreamResult<Vec<u8>> {
    let mut output = Vec::with_capacity(HEADER_SIZE + input.len());
    compress_stream(Cursor::new(input), &mut output)?;
    Ok(output)
}

/// Decompress an in-memory buffer.
pub fn decompress(input: &[u8]) -> StreamResult<Vec<u8>> {
    let mut output = Vec::new();
    decompress_stream(input, &mut output)?;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open `path` for buffered reading, reporting failures as [`StreamError::Open`].
pub fn open_input(path: &Path) -> StreamResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| StreamError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Create `path` for buffered writing, reporting failures as [`StreamError::Create`].
pub fn create_output(path: &Path) -> StreamResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| StreamError::Create {
            path: path.to_path_buf(),
            source,
        })
}

/// Fill `buf` from `reader` until it is full or the reader hits EOF.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> StreamResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break, // EOF
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StreamError::Io(e)),
        }
    }
    Ok(filled)
}
