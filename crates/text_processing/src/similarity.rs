//! String similarity used by spelling correction and suggestions
//!
//! Both measures count chars, not bytes, so "cuña" and "cuna" are one edit
//! apart.

/// Levenshtein edit distance over chars
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Similarity in `[0, 1]`: `1 - distance / longest length`, 1.0 for two
/// empty strings
pub fn similarity(a: &str, b: &str) -> f32 {
    strsim::normalized_levenshtein(a, b) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("alquiler", "alquiler"), 0);
        assert_eq!(levenshtein_distance("alqiler", "alquiler"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("luces", "luces"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        let s = similarity("publisidad", "publicidad");
        assert!(s > 0.85 && s < 1.0);
    }

    #[test]
    fn test_similarity_counts_chars_not_bytes() {
        // "ñ" is two bytes but one char
        assert_eq!(levenshtein_distance("cuña", "cuna"), 1);
        assert!((similarity("cuña", "cuna") - 0.75).abs() < f32::EPSILON);
    }
}
