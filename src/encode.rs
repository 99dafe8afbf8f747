//! Nucleotide sequence encoding
//!
//! Maps raw nucleotide strings onto fixed-length integer vectors: A/C/G/T
//! become 0..=3 and every other character (ambiguity codes, gaps, garbage)
//! becomes [`UNKNOWN`]. Padding reuses the same code, so downstream layers
//! see a single "not a known base" symbol.

/// Code for any character outside {A, C, G, T}, and for padding.
pub const UNKNOWN: u8 = 4;

/// Encode a nucleotide string, case-insensitively.
///
/// Total over any input: unrecognized characters encode to [`UNKNOWN`]
/// rather than failing.
pub fn encode(sequence: &str) -> Vec<u8> {
    sequence
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'A' => 0,
            'C' => 1,
            'G' => 2,
            'T' => 3,
            _ => UNKNOWN,
        })
        .collect()
}

/// Force an encoded sequence to exactly `target_len` elements.
///
/// Shorter inputs are right-padded with [`UNKNOWN`]; longer inputs are
/// truncated to the first `target_len` elements.
pub fn pad_or_truncate(mut encoded: Vec<u8>, target_len: usize) -> Vec<u8> {
    if encoded.len() < target_len {
        encoded.resize(target_len, UNKNOWN);
    } else {
        encoded.truncate(target_len);
    }
    encoded
}

/// Encode a whole corpus against a shared target length.
///
/// The target length is the maximum raw-sequence length observed across
/// `raw` (a corpus-wide constant, not per-sample). Returns the encoded
/// sequences and that length; callers must retain the length for
/// inference-time consistency (the checkpoint manifest persists it).
pub fn preprocess(raw: &[String]) -> (Vec<Vec<u8>>, usize) {
    let target_len = raw.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    let encoded = raw
        .iter()
        .map(|s| pad_or_truncate(encode(s), target_len))
        .collect();
    (encoded, target_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_bases() {
        assert_eq!(encode("ACGT"), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_encode_case_insensitive() {
        assert_eq!(encode("acgt"), encode("ACGT"));
        assert_eq!(encode("aCgT"), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_encode_unknown_characters() {
        assert_eq!(encode("acgtx"), vec![0, 1, 2, 3, 4]);
        assert_eq!(encode("N-RY"), vec![4, 4, 4, 4]);
    }

    #[test]
    fn test_encode_empty() {
        assert!(encode("").is_empty());
    }

    #[test]
    fn test_pad_extends_with_unknown() {
        assert_eq!(pad_or_truncate(vec![0, 1], 5), vec![0, 1, 4, 4, 4]);
    }

    #[test]
    fn test_truncate_keeps_prefix() {
        assert_eq!(pad_or_truncate(vec![0, 1, 2, 3], 2), vec![0, 1]);
    }

    #[test]
    fn test_exact_length_unchanged() {
        assert_eq!(pad_or_truncate(vec![3, 2, 1], 3), vec![3, 2, 1]);
    }

    #[test]
    fn test_preprocess_uses_corpus_max() {
        let raw = vec!["ACG".to_string(), "ACGTA".to_string()];
        let (encoded, target_len) = preprocess(&raw);
        assert_eq!(target_len, 5);
        assert_eq!(encoded[0], vec![0, 1, 2, 4, 4]);
        assert_eq!(encoded[1], vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_preprocess_empty_corpus() {
        let (encoded, target_len) = preprocess(&[]);
        assert!(encoded.is_empty());
        assert_eq!(target_len, 0);
    }
}
