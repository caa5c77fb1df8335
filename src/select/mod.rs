//! Selection engine: keyword selection and reference resolution.

mod keyword;
mod resolve;

use std::collections::BTreeSet;

pub use keyword::select_by_keyword;
pub use resolve::resolve;

use crate::index::RelationIndex;
use crate::types::{DocId, SelectionCriteria};

/// Documents to pack, in lexicographic id order.
///
/// With `include_all` set every indexed id is returned and the other criteria
/// are ignored. Otherwise explicit ids and keyword matches seed the resolver.
#[must_use]
pub fn select(index: &RelationIndex, criteria: &SelectionCriteria) -> Vec<DocId> {
    if criteria.include_all {
        if !criteria.ids.is_empty() || !criteria.keywords.is_empty() {
            tracing::info!(
                target = "rfcbook::select",
                "include-all set; explicit ids and keywords are ignored"
            );
        }
        return index.ids().cloned().collect();
    }

    let mut seeds: BTreeSet<DocId> = criteria.ids.iter().cloned().collect();
    let by_keyword = select_by_keyword(index, &criteria.keywords);
    tracing::debug!(
        target = "rfcbook::select",
        explicit = seeds.len(),
        by_keyword = by_keyword.len(),
        "seed set built"
    );
    seeds.extend(by_keyword);

    resolve(index, seeds, criteria.relations)
        .into_iter()
        .collect()
}
