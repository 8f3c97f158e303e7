/// Validation tests across the whole crate.
///
/// These tests verify:
/// 1. **Round-trip correctness** through the in-memory, stream and file paths
/// 2. **Code properties** - prefix-freeness, determinism, entropy bounds
/// 3. **Format** - header layout and body length agree with the code tree
/// 4. **Edge cases** - empty input, one symbol, all 256 symbols, truncation
#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use proptest::prelude::*;

    use crate::bitio::{BitReader, BitWriter, HEADER_SIZE};
    use crate::frequency::get_frequency;
    use crate::streaming::{self, StreamError};
    use crate::{CodeTree, HuffError, Walker};

    // ---------------------------------------------------------------
    // Helper: generate diverse test vectors
    // ---------------------------------------------------------------

    /// Highly compressible: single byte repeated.
    fn data_all_zeros(n: usize) -> Vec<u8> {
        vec![0u8; n]
    }

    /// Incompressible: every byte value once (uniform distribution, 8 bits entropy).
    fn data_uniform() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// Skewed distribution: 90% one byte, 10% another.
    fn data_skewed(n: usize) -> Vec<u8> {
        (0..n).map(|i| if i % 10 == 0 { 1 } else { 0 }).collect()
    }

    /// Repetitive text with structure.
    fn data_repeating_text() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. ".repeat(100)
    }

    /// Geometric counts: byte k occurs 2^k times, giving the deepest codes.
    fn data_geometric() -> Vec<u8> {
        let mut v = Vec::new();
        for k in 0..12u8 {
            v.extend(std::iter::repeat(k).take(1 << k));
        }
        v
    }

    fn all_vectors() -> Vec<(&'static str, Vec<u8>)> {
        vec![
            ("empty", Vec::new()),
            ("single", vec![0x41]),
            ("zeros", data_all_zeros(5000)),
            ("uniform", data_uniform()),
            ("skewed", data_skewed(4000)),
            ("text", data_repeating_text()),
            ("geometric", data_geometric()),
        ]
    }

    fn round_trip(data: &[u8]) -> Vec<u8> {
        let packed = streaming::compress(data).unwrap();
        streaming::decompress(&packed).unwrap()
    }

    fn assert_prefix_free(tree: &CodeTree) {
        let used: Vec<u8> = (0..=255u8).filter(|&b| tree.get_count(b) > 0).collect();
        for &a in &used {
            for &b in &used {
                if a == b {
                    continue;
                }
                let (ca, cb) = (tree.get_code(a).unwrap(), tree.get_code(b).unwrap());
                assert!(
                    !ca.is_prefix_of(cb),
                    "code for {a:#04x} ({ca}) is a prefix of {b:#04x} ({cb})"
                );
            }
        }
    }

    // ---------------------------------------------------------------
    // Round trips
    // ---------------------------------------------------------------

    #[test]
    fn test_round_trip_all_vectors() {
        for (name, data) in all_vectors() {
            assert_eq!(round_trip(&data), data, "round trip failed for {name}");
        }
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        let packed = dir.path().join("plain.huf");
        let restored = dir.path().join("restored.txt");
        let data = data_repeating_text();
        fs::write(&plain, &data).unwrap();

        let input = streaming::open_input(&plain).unwrap();
        let output = streaming::create_output(&packed).unwrap();
        let summary = streaming::compress_stream(input, output).unwrap();
        assert_eq!(summary.input_bytes, data.len() as u64);
        assert_eq!(fs::metadata(&packed).unwrap().len(), summary.output_bytes);

        let input = streaming::open_input(&packed).unwrap();
        let output = streaming::create_output(&restored).unwrap();
        let n = streaming::decompress_stream(input, output).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(fs::read(&restored).unwrap(), data);
    }

    #[test]
    fn test_phase_by_phase_matches_one_shot() {
        let data = data_skewed(3000);

        let mut tree = CodeTree::new();
        streaming::count_stream(Cursor::new(&data), &mut tree, |_| {}).unwrap();
        tree.compute_probabilities();
        tree.build_tree().unwrap();
        tree.build_codes().unwrap();
        let mut writer = BitWriter::new(Vec::new());
        writer.write_header(&tree.counts()).unwrap();
        streaming::encode_stream(Cursor::new(&data), &mut writer, &tree, |_| {}).unwrap();
        let manual = writer.finish().unwrap();

        assert_eq!(manual, streaming::compress(&data).unwrap());
    }

    // ---------------------------------------------------------------
    // Format
    // ---------------------------------------------------------------

    #[test]
    fn test_header_holds_counts() {
        for (name, data) in all_vectors() {
            let packed = streaming::compress(&data).unwrap();
            let mut reader = BitReader::new(Cursor::new(&packed));
            let counts = reader.read_header().unwrap();
            assert_eq!(counts, get_frequency(&data).byte, "header mismatch for {name}");
        }
    }

    #[test]
    fn test_body_length_matches_code_lengths() {
        for (name, data) in all_vectors() {
            let tree = CodeTree::from_data(&data).unwrap();
            let bits = tree.encoded_bits().unwrap();
            let packed = streaming::compress(&data).unwrap();
            assert_eq!(
                packed.len() as u64,
                HEADER_SIZE as u64 + bits.div_ceil(8),
                "length mismatch for {name}"
            );
        }
    }

    #[test]
    fn test_decoder_never_reads_padding() {
        // Seven 1-bit codes leave one padding bit. Flipping it must not matter.
        let data = vec![b'z'; 7];
        let mut packed = streaming::compress(&data).unwrap();
        assert_eq!(packed.len(), HEADER_SIZE + 1);
        assert_eq!(packed[HEADER_SIZE], 0xFE);
        packed[HEADER_SIZE] |= 1;
        assert_eq!(streaming::decompress(&packed).unwrap(), data);
    }

    // ---------------------------------------------------------------
    // Algorithmic properties
    // ---------------------------------------------------------------

    #[test]
    fn test_prefix_free_all_vectors() {
        for (_, data) in all_vectors() {
            assert_prefix_free(&CodeTree::from_data(&data).unwrap());
        }
    }

    #[test]
    fn test_more_frequent_never_longer() {
        let data = data_geometric();
        let tree = CodeTree::from_data(&data).unwrap();
        for a in 0..12u8 {
            for b in 0..12u8 {
                if tree.get_count(a) > tree.get_count(b) {
                    assert!(tree.get_code(a).unwrap().len() <= tree.get_code(b).unwrap().len());
                }
            }
        }
    }

    #[test]
    fn test_skewed_beats_uniform() {
        let skewed = CodeTree::from_data(&data_skewed(4000)).unwrap();
        let uniform = CodeTree::from_data(&data_uniform()).unwrap();
        assert!(skewed.average_code_length().unwrap() < 2.0);
        assert!((uniform.average_code_length().unwrap() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_walker_follows_every_code() {
        let tree = CodeTree::from_data(&data_repeating_text()).unwrap();
        let mut walker = Walker::new(&tree).unwrap();
        for byte in 0..=255u8 {
            let mut decoded = None;
            for bit in tree.get_code(byte).unwrap().bits() {
                decoded = walker.feed(bit);
            }
            assert_eq!(decoded, Some(byte));
        }
    }

    // ---------------------------------------------------------------
    // Edge cases
    // ---------------------------------------------------------------

    #[test]
    fn test_truncated_inputs() {
        let packed = streaming::compress(&data_repeating_text()).unwrap();
        for cut in [0, 1, HEADER_SIZE - 1] {
            assert!(matches!(
                streaming::decompress(&packed[..cut]),
                Err(StreamError::Huff(HuffError::TruncatedHeader))
            ));
        }
        for cut in [HEADER_SIZE, HEADER_SIZE + 10, packed.len() - 1] {
            assert!(matches!(
                streaming::decompress(&packed[..cut]),
                Err(StreamError::Huff(HuffError::TruncatedBody { .. }))
            ));
        }
    }

    #[test]
    fn test_overflowing_header_rejected() {
        let mut packed = vec![0u8; HEADER_SIZE];
        packed[..8].copy_from_slice(&u64::MAX.to_le_bytes());
        packed[8..16].copy_from_slice(&1u64.to_le_bytes());
        assert!(matches!(
            streaming::decompress(&packed),
            Err(StreamError::Huff(HuffError::CountOverflow))
        ));
    }

    // ---------------------------------------------------------------
    // Property-based tests
    // ---------------------------------------------------------------

    proptest! {
        #[test]
        fn prop_round_trip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
            let packed = streaming::compress(&data).unwrap();
            prop_assert_eq!(streaming::decompress(&packed).unwrap(), data);
        }

        #[test]
        fn prop_narrow_alphabet_round_trip(
            data in prop::collection::vec(prop::sample::select(vec![0u8, 1, 2, 200]), 0..3000)
        ) {
            let packed = streaming::compress(&data).unwrap();
            prop_assert_eq!(streaming::decompress(&packed).unwrap(), data);
        }

        #[test]
        fn prop_codes_are_prefix_free(data in prop::collection::vec(any::<u8>(), 1..500)) {
            assert_prefix_free(&CodeTree::from_data(&data).unwrap());
        }

        #[test]
        fn prop_same_counts_same_codes(data in prop::collection::vec(any::<u8>(), 0..500)) {
            let a = CodeTree::from_data(&data).unwrap();
            let b = CodeTree::from_counts(&a.counts()).unwrap();
            for byte in 0..=255u8 {
                prop_assert_eq!(a.get_code(byte), b.get_code(byte));
            }
        }

        #[test]
        fn prop_total_conserved(data in prop::collection::vec(any::<u8>(), 0..500)) {
            let tree = CodeTree::from_data(&data).unwrap();
            prop_assert_eq!(tree.get_count_total(), data.len() as u64);
            prop_assert_eq!(tree.root_count(), Some(data.len() as u64));
        }

        #[test]
        fn prop_average_length_at_least_entropy(data in prop::collection::vec(any::<u8>(), 1..1000)) {
            let tree = CodeTree::from_data(&data).unwrap();
            let entropy = get_frequency(&data).entropy();
            let avg = tree.average_code_length().unwrap();
            prop_assert!(avg + 1e-9 >= entropy, "avg {} < entropy {}", avg, entropy);
            prop_assert!(avg < entropy + 2.0, "avg {} too far above entropy {}", avg, entropy);
        }
    }
}
