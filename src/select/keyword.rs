use std::collections::{BTreeSet, HashSet};

use crate::index::RelationIndex;
use crate::types::DocId;

/// Every document tagged with at least one of `keywords`.
///
/// Matching is exact, as keywords appear in the index. No keywords selects
/// nothing.
pub fn select_by_keyword<S: AsRef<str>>(index: &RelationIndex, keywords: &[S]) -> BTreeSet<DocId> {
    if keywords.is_empty() {
        return BTreeSet::new();
    }
    let wanted: HashSet<&str> = keywords.iter().map(|keyword| keyword.as_ref()).collect();

    index
        .records()
        .filter(|record| {
            record
                .keywords
                .iter()
                .any(|keyword| wanted.contains(keyword.as_str()))
        })
        .map(|record| record.id.clone())
        .collect()
}
