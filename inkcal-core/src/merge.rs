//! Combining event/occurrence streams from multiple sources.

/// Concatenate per-source batches into one stream.
///
/// Pure concatenation in source-list order; no deduplication. Two sources
/// carrying the same event keep both copies, matching what the upstream
/// feeds actually said.
pub fn merge<T>(batches: Vec<Vec<T>>) -> Vec<T> {
    batches.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_preserves_length_and_order() {
        let a = vec!["a1", "a2", "a3"];
        let b = vec!["b1", "b2"];

        let merged = merge(vec![a.clone(), b.clone()]);
        assert_eq!(merged.len(), a.len() + b.len());
        assert_eq!(merged, vec!["a1", "a2", "a3", "b1", "b2"]);
    }

    #[test]
    fn test_merge_keeps_duplicates() {
        let merged = merge(vec![vec![1, 2], vec![2, 1]]);
        assert_eq!(merged, vec![1, 2, 2, 1]);
    }

    #[test]
    fn test_merge_of_nothing_is_empty() {
        let merged: Vec<i32> = merge(vec![]);
        assert!(merged.is_empty());
    }
}
