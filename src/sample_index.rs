//! Sample numbers used in the `_S<n>` field of `bcl2fastq` filenames.
//!
//! `bcl2fastq` numbers samples in the order their `Sample_ID` first appears in
//! the sample sheet, starting at 1. A `Sample_ID` that reappears (typically the
//! same library on another lane) keeps the number it was first given.

use std::collections::HashMap;

/// Mapping from `Sample_ID` to its `S` number, built in one forward pass
/// over the sheet.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SampleIndex {
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl SampleIndex {
    pub fn from_ids<'a>(sample_ids: impl IntoIterator<Item = &'a str>) -> SampleIndex {
        let mut ids = Vec::new();
        let mut index = HashMap::new();
        for id in sample_ids {
            if !index.contains_key(id) {
                ids.push(id.to_string());
                index.insert(id.to_string(), ids.len());
            }
        }
        SampleIndex { ids, index }
    }

    /// The `S` number of `sample_id`, if it occurs in the sheet.
    pub fn get(&self, sample_id: &str) -> Option<usize> {
        self.index.get(sample_id).copied()
    }

    /// Number of distinct sample ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `(sample_id, number)` pairs in numbering order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.ids.iter().enumerate().map(|(i, id)| (id.as_str(), i + 1))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_first_occurrence_order() {
        let idx = SampleIndex::from_ids(vec!["zeta", "alpha", "zeta", "mid", "alpha"]);
        assert_eq!(idx.get("zeta"), Some(1));
        assert_eq!(idx.get("alpha"), Some(2));
        assert_eq!(idx.get("mid"), Some(3));
        assert_eq!(idx.get("other"), None);
        assert_eq!(
            idx.iter().collect::<Vec<_>>(),
            vec![("zeta", 1), ("alpha", 2), ("mid", 3)]
        );
    }

    #[test]
    fn test_empty() {
        let idx = SampleIndex::from_ids(Vec::<&str>::new());
        assert!(idx.is_empty());
        assert_eq!(idx.len(), 0);
    }

    proptest! {
        #[test]
        fn prop_test_dense_first_occurrence(
            ids in proptest::collection::vec("[a-d]{1,2}", 0..40)
        ) {
            let idx = SampleIndex::from_ids(ids.iter().map(String::as_str));

            let mut seen: Vec<&str> = Vec::new();
            for id in &ids {
                if !seen.contains(&id.as_str()) {
                    seen.push(id);
                }
            }
            prop_assert_eq!(idx.len(), seen.len());
            for (i, id) in seen.iter().enumerate() {
                prop_assert_eq!(idx.get(id), Some(i + 1));
            }
        }
    }
}
