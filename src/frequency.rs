//! Frequency analysis for byte streams.
//!
//! Counts the occurrence of each byte value (0-255), derives per-byte
//! probabilities and the Shannon entropy of the distribution, and ranks
//! byte values by how often they occur.

use crate::ALPHABET_SIZE;

/// A frequency table that tracks byte occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Count of each byte value (index = byte value, value = count).
    pub byte: [u64; ALPHABET_SIZE],
    /// Sum of all counts.
    pub total: u64,
    /// Number of distinct byte values with nonzero count.
    pub used: u32,
}

impl FrequencyTable {
    /// Create a new, zeroed frequency table.
    pub fn new() -> Self {
        Self {
            byte: [0u64; ALPHABET_SIZE],
            total: 0,
            used: 0,
        }
    }

    /// Build a table from absolute counts, e.g. a persisted header.
    ///
    /// The total saturates at `u64::MAX`; tree construction reports the
    /// overflow separately.
    pub fn from_counts(counts: &[u64; ALPHABET_SIZE]) -> Self {
        let mut table = Self::new();
        for (value, &count) in counts.iter().enumerate() {
            table.set(value as u8, count);
        }
        table
    }

    /// Add the bytes of `input` to the running counts.
    pub fn count(&mut self, input: &[u8]) {
        for &b in input {
            self.increment(b);
        }
    }

    /// Count a single occurrence of `byte`.
    pub fn increment(&mut self, byte: u8) {
        let slot = &mut self.byte[byte as usize];
        if *slot == 0 {
            self.used += 1;
        }
        *slot += 1;
        self.total = self.total.saturating_add(1);
    }

    /// Overwrite the count for `byte`.
    pub fn set(&mut self, byte: u8, count: u64) {
        let slot = &mut self.byte[byte as usize];
        match (*slot > 0, count > 0) {
            (false, true) => self.used += 1,
            (true, false) => self.used -= 1,
            _ => {}
        }
        self.total = self.total.saturating_sub(*slot).saturating_add(count);
        *slot = count;
    }

    /// Get the count for a specific byte value.
    pub fn get(&self, byte: u8) -> u64 {
        self.byte[byte as usize]
    }

    /// Probability of each byte value, `count / total`.
    ///
    /// Every probability is 0.0 when the table is empty.
    pub fn probabilities(&self) -> [f64; ALPHABET_SIZE] {
        let mut probs = [0.0f64; ALPHABET_SIZE];
        if self.total == 0 {
            return probs;
        }
        let total = self.total as f64;
        for (p, &c) in probs.iter_mut().zip(self.byte.iter()) {
            *p = c as f64 / total;
        }
        probs
    }

    /// Compute the Shannon entropy of the distribution (in bits per symbol).
    ///
    /// Returns 0.0 if the table is empty.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.byte
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }

    /// Byte values ordered by descending count, ties by ascending value.
    pub fn ranked(&self) -> Vec<u8> {
        let mut order: Vec<u8> = (0..=255u8).collect();
        // Stable sort keeps ascending byte order among equal counts.
        order.sort_by(|&a, &b| self.get(b).cmp(&self.get(a)));
        order
    }

    /// Derive the informational figures printed during analysis.
    pub fn statistics(&self) -> Statistics {
        let entropy = self.entropy();
        Statistics {
            total: self.total,
            used: self.used,
            entropy,
            compression_ratio: (entropy > 0.0).then(|| 8.0 / entropy),
            estimated_size: (self.total as f64 * entropy / 8.0) as u64,
            ranking: self.ranked(),
            probabilities: self.probabilities(),
        }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function: compute a frequency table from input.
pub fn get_frequency(input: &[u8]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    table.count(input);
    table
}

/// Summary of a byte distribution.
///
/// None of these values affect the compressed output. They are reproducible
/// for a given set of counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Number of bytes counted.
    pub total: u64,
    /// Number of distinct byte values seen.
    pub used: u32,
    /// Shannon entropy in bits per byte.
    pub entropy: f64,
    /// `8 / entropy`, or `None` for a zero-entropy distribution.
    pub compression_ratio: Option<f64>,
    /// Ideal output size in bytes, `total * entropy / 8` rounded down.
    pub estimated_size: u64,
    /// Byte values by descending count.
    pub ranking: Vec<u8>,
    /// Per-byte probabilities.
    pub probabilities: [f64; ALPHABET_SIZE],
}

impl Statistics {
    /// Excess bits per byte over the entropy, `8 - entropy`.
    pub fn redundancy(&self) -> f64 {
        8.0 - self.entropy
    }

    /// Share of the input that is redundant, in percent.
    pub fn redundancy_percent(&self) -> f64 {
        (1.0 - self.entropy / 8.0) * 100.0
    }

    /// Number of byte values that never occurred.
    pub fn unused(&self) -> u32 {
        ALPHABET_SIZE as u32 - self.used
    }
}
