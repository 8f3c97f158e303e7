//! Human-readable summaries printed by the command-line drivers.

use std::fmt;

use crate::frequency::Statistics;
use crate::huffman::CodeTree;
use crate::{HuffError, HuffResult};

/// How many of the most frequent bytes the statistics report lists.
pub const TOP_BYTES: usize = 5;

/// Render a byte for display next to its hex value.
///
/// Control characters use caret notation (`^J`, `^?`). Bytes outside ASCII
/// are shown as `\xNN`.
pub fn display_byte(byte: u8) -> String {
    match byte {
        0x00..=0x1F => format!("^{}", (byte + 0x40) as char),
        0x7F => "^?".to_string(),
        0x20..=0x7E => (byte as char).to_string(),
        _ => format!("\\x{byte:02x}"),
    }
}

/// Distribution summary from the analysis phase.
pub struct StatisticsReport<'a>(pub &'a Statistics);

impl fmt::Display for StatisticsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(f, "Five most frequent bytes:")?;
        for (rank, &byte) in stats.ranking.iter().take(TOP_BYTES).enumerate() {
            let p = stats.probabilities[byte as usize];
            if p == 0.0 {
                break;
            }
            writeln!(
                f,
                "{}:  {:02X}h, {:5.2}%,  '{}'",
                rank + 1,
                byte,
                p * 100.0,
                display_byte(byte)
            )?;
        }
        writeln!(f, "Number of different bytes not used = {}", stats.unused())?;
        writeln!(f)?;
        writeln!(
            f,
            "Entropy           = {:4.2}  (Average bits/byte of information)",
            stats.entropy
        )?;
        writeln!(
            f,
            "Redundancy        = {:4.2}  (Average bits/byte of excess)",
            stats.redundancy()
        )?;
        writeln!(
            f,
            "Redundancy        = {:4.1}% (Percentage of file which is redundant)",
            stats.redundancy_percent()
        )?;
        match stats.compression_ratio {
            Some(ratio) => writeln!(
                f,
                "Compression Ratio = {ratio:4.2}  (If all redundancy removed)"
            )?,
            None => writeln!(f, "Compression Ratio = n/a   (Input carries no information)")?,
        }
        writeln!(
            f,
            "File Sizes (Assuming 100% compression efficiency and no overhead):"
        )?;
        writeln!(f, "  Before = {}", stats.total)?;
        write!(f, "  After  = {}", stats.estimated_size)
    }
}

/// Code table for every byte with a nonzero count.
pub struct CodeTable<'a>(&'a CodeTree);

impl<'a> CodeTable<'a> {
    /// Fails unless codes have been built for `tree`.
    pub fn new(tree: &'a CodeTree) -> HuffResult<Self> {
        if !tree.codes_built() {
            return Err(HuffError::CodesNotBuilt);
        }
        Ok(CodeTable(tree))
    }
}

impl fmt::Display for CodeTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.0;
        let mut first = true;
        for byte in 0..=255u8 {
            let count = tree.get_count(byte);
            let Some(code) = tree.get_code(byte).filter(|_| count > 0) else {
                continue;
            };
            if !first {
                writeln!(f)?;
            }
            first = false;
            if byte.is_ascii_graphic() {
                write!(f, "'{}' ", byte as char)?;
            } else {
                write!(f, "    ")?;
            }
            write!(f, "{byte:02X}: ({count:6}) {code}")?;
        }
        Ok(())
    }
}

pub fn format_statistics(stats: &Statistics) -> String {
    StatisticsReport(stats).to_string()
}

pub fn format_codes(tree: &CodeTree) -> HuffResult<String> {
    Ok(CodeTable::new(tree)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::get_frequency;

    #[test]
    fn test_display_byte() {
        assert_eq!(display_byte(b'A'), "A");
        assert_eq!(display_byte(b' '), " ");
        assert_eq!(display_byte(b'\n'), "^J");
        assert_eq!(display_byte(0), "^@");
        assert_eq!(display_byte(0x7F), "^?");
        assert_eq!(display_byte(0xE9), "\\xe9");
    }

    #[test]
    fn test_statistics_report() {
        let mut input = vec![b'a'; 50];
        input.extend(vec![b'\n'; 50]);
        let text = format_statistics(&get_frequency(&input).statistics());
        let expected = "\
Five most frequent bytes:
1:  0Ah, 50.00%,  '^J'
2:  61h, 50.00%,  'a'
Number of different bytes not used = 254

Entropy           = 1.00  (Average bits/byte of information)
Redundancy        = 7.00  (Average bits/byte of excess)
Redundancy        = 87.5% (Percentage of file which is redundant)
Compression Ratio = 8.00  (If all redundancy removed)
File Sizes (Assuming 100% compression efficiency and no overhead):
  Before = 100
  After  = 12";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_statistics_report_lists_at_most_five() {
        let text = format_statistics(&get_frequency(b"abcdefghij").statistics());
        assert!(text.contains("5:  65h"));
        assert!(!text.contains("6:"));
    }

    #[test]
    fn test_statistics_report_zero_entropy() {
        let text = format_statistics(&get_frequency(&[7u8; 10]).statistics());
        assert!(text.contains("1:  07h, 100.00%,  '^G'"));
        assert!(text.contains("Compression Ratio = n/a"));
    }

    #[test]
    fn test_code_table() {
        let tree = CodeTree::from_data(b"DDDDCCB ").unwrap();
        let text = format_codes(&tree).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "    20: (     1) 0001",
                "'B' 42: (     1) 001",
                "'C' 43: (     2) 01",
                "'D' 44: (     4) 1",
            ]
        );
    }

    #[test]
    fn test_code_table_needs_codes() {
        assert_eq!(
            format_codes(&CodeTree::new()).unwrap_err(),
            HuffError::CodesNotBuilt
        );
    }
}
