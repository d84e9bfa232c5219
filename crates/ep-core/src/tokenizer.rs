use std::collections::HashSet;

/// Tokenize text into lowercase whitespace-separated words.
/// No punctuation stripping and no stemming: a token is whatever sits
/// between two runs of whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Distinct lowercase tokens of `text`.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Bag-of-words Jaccard similarity: |A ∩ B| / |A ∪ B| over lowercase tokens.
/// Returns 0.0 when both sides are empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = token_set(a);
    let right = token_set(b);

    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = left.intersection(&right).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases() {
        assert_eq!(tokenize("Hello  WORLD\tagain"), vec!["hello", "world", "again"]);
    }

    #[test]
    fn test_tokenize_keeps_punctuation() {
        assert_eq!(tokenize("hello, world!"), vec!["hello,", "world!"]);
    }

    #[test]
    fn test_token_set_dedupes() {
        assert_eq!(token_set("a A a b").len(), 2);
    }

    #[test]
    fn test_similarity_identical() {
        assert_eq!(similarity("red sphere", "red sphere"), 1.0);
    }

    #[test]
    fn test_similarity_case_insensitive() {
        assert_eq!(similarity("Red Sphere", "red SPHERE"), 1.0);
    }

    #[test]
    fn test_similarity_disjoint() {
        assert_eq!(similarity("greeting", "hello world"), 0.0);
    }

    #[test]
    fn test_similarity_partial() {
        // {hello, world} vs {hello, there} → 1 / 3
        let s = similarity("hello world", "hello there");
        assert!((s - 1.0 / 3.0).abs() < 1e-10, "got {s}");
    }

    #[test]
    fn test_similarity_empty_union() {
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("   ", "\n"), 0.0);
    }

    #[test]
    fn test_similarity_one_side_empty() {
        assert_eq!(similarity("", "something"), 0.0);
    }

    #[test]
    fn test_similarity_symmetric() {
        let a = "the quick brown fox";
        let b = "the lazy brown dog";
        assert_eq!(similarity(a, b), similarity(b, a));
    }
}
