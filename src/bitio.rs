//! Bit-level file I/O for the compressed format.
//!
//! A compressed stream is a raw header of 256 little-endian `u64` counts
//! followed by code bits packed MSB-first into bytes. The last byte is padded
//! with zero bits; readers rely on the header total, not on an end marker,
//! to know where the codes stop.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::huffman::Code;
use crate::streaming::{create_output, open_input, StreamError, StreamResult};
use crate::{HuffError, ALPHABET_SIZE};

/// Size of the count header in bytes.
pub const HEADER_SIZE: usize = ALPHABET_SIZE * 8;

/// Writes a count header and then individual bits.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    current: u8,
    filled: u8,
    bits_written: u64,
}

impl BitWriter<BufWriter<File>> {
    /// Create (or truncate) `path` for writing.
    pub fn create(path: impl AsRef<Path>) -> StreamResult<Self> {
        Ok(BitWriter::new(create_output(path.as_ref())?))
    }
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            current: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    /// Write the 256 counts as one raw block. Must come before any bits.
    pub fn write_header(&mut self, counts: &[u64; ALPHABET_SIZE]) -> io::Result<()> {
        if self.bits_written > 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "header written after code bits",
            ));
        }
        for &count in counts {
            self.inner.write_u64::<LittleEndian>(count)?;
        }
        Ok(())
    }

    /// Append one bit, MSB-first within the current byte.
    pub fn put_bit(&mut self, bit: bool) -> io::Result<()> {
        self.current = (self.current << 1) | bit as u8;
        self.filled += 1;
        self.bits_written += 1;
        if self.filled == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Append every bit of `code` in order.
    pub fn put_code(&mut self, code: &Code) -> io::Result<()> {
        for bit in code.bits() {
            self.put_bit(bit)?;
        }
        Ok(())
    }

    /// Number of code bits written so far (header excluded).
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pad the last partial byte with zeros, flush, and return the writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.filled > 0 {
            let byte = self.current << (8 - self.filled);
            self.inner.write_all(&[byte])?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Reads a count header and then individual bits.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    remaining: u8,
}

impl BitReader<BufReader<File>> {
    /// Open `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> StreamResult<Self> {
        Ok(BitReader::new(open_input(path.as_ref())?))
    }
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            current: 0,
            remaining: 0,
        }
    }

    /// Read the 256-entry count header.
    pub fn read_header(&mut self) -> StreamResult<[u64; ALPHABET_SIZE]> {
        let mut counts = [0u64; ALPHABET_SIZE];
        self.inner
            .read_u64_into::<LittleEndian>(&mut counts)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    StreamError::Huff(HuffError::TruncatedHeader)
                } else {
                    StreamError::Io(e)
                }
            })?;
        Ok(counts)
    }

    /// Next bit, or `None` once the underlying stream is exhausted.
    ///
    /// Padding bits in the final byte are returned like any other bit.
    pub fn get_bit(&mut self) -> io::Result<Option<bool>> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            loop {
                match self.inner.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
            self.current = byte[0];
            self.remaining = 8;
        }
        self.remaining -= 1;
        Ok(Some((self.current >> self.remaining) & 1 == 1))
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
