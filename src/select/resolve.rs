use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::index::RelationIndex;
use crate::types::{DocId, RelationFlags};

/// Transitive closure of `seeds` over the enabled relation kinds.
///
/// Ids missing from the index are kept in the result but have no outgoing
/// edges. Each id is queued at most once, so cyclic and self-referencing
/// relations terminate.
pub fn resolve<I>(index: &RelationIndex, seeds: I, flags: RelationFlags) -> BTreeSet<DocId>
where
    I: IntoIterator<Item = DocId>,
{
    // `seen` covers both visited and pending ids.
    let mut seen: HashSet<DocId> = HashSet::new();
    let mut frontier: VecDeque<DocId> = VecDeque::new();
    for seed in seeds {
        if seen.insert(seed.clone()) {
            frontier.push_back(seed);
        }
    }

    let mut visited = BTreeSet::new();
    let mut dangling = 0usize;

    while let Some(current) = frontier.pop_front() {
        match index.get(&current) {
            Some(record) => {
                for kind in flags.enabled() {
                    for related in record.related(kind) {
                        if seen.insert(related.clone()) {
                            frontier.push_back(related.clone());
                        }
                    }
                }
            }
            None => dangling += 1,
        }
        visited.insert(current);
    }

    tracing::debug!(
        target = "rfcbook::select",
        closure = visited.len(),
        dangling,
        "resolved references"
    );
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentRecord;

    fn ids(set: &BTreeSet<DocId>) -> Vec<&str> {
        set.iter().map(DocId::as_str).collect()
    }

    fn seeds(ids: &[&str]) -> Vec<DocId> {
        ids.iter().copied().map(DocId::new).collect()
    }

    #[test]
    fn follows_update_chain() {
        let index = RelationIndex::from_records([
            DocumentRecord::new("A"),
            DocumentRecord::new("B").updating("A"),
            DocumentRecord::new("C").updating("B"),
        ]);
        let flags = RelationFlags {
            follow_updates: true,
            ..RelationFlags::NONE
        };
        let closure = resolve(&index, seeds(&["C"]), flags);
        assert_eq!(ids(&closure), vec!["A", "B", "C"]);
    }

    #[test]
    fn disabled_kinds_are_not_followed() {
        let index = RelationIndex::from_records([
            DocumentRecord::new("A").obsoleting("B").see_also("C"),
            DocumentRecord::new("B"),
            DocumentRecord::new("C"),
        ]);
        let flags = RelationFlags {
            follow_obsoletes: true,
            ..RelationFlags::NONE
        };
        assert_eq!(ids(&resolve(&index, seeds(&["A"]), flags)), vec!["A", "B"]);
    }

    #[test]
    fn cycles_and_self_references_terminate() {
        let index = RelationIndex::from_records([
            DocumentRecord::new("A").updating("B").updating("A"),
            DocumentRecord::new("B").updating("A"),
        ]);
        let closure = resolve(&index, seeds(&["A"]), RelationFlags::all());
        assert_eq!(ids(&closure), vec!["A", "B"]);
    }

    #[test]
    fn dangling_targets_are_leaves() {
        let index = RelationIndex::from_records([DocumentRecord::new("A").see_also("STD0003")]);
        let closure = resolve(&index, seeds(&["A", "UNKNOWN"]), RelationFlags::all());
        assert_eq!(ids(&closure), vec!["A", "STD0003", "UNKNOWN"]);
    }

    #[test]
    fn no_flags_is_identity() {
        let index = RelationIndex::from_records([DocumentRecord::new("A").updating("B")]);
        let closure = resolve(&index, seeds(&["A", "Z"]), RelationFlags::NONE);
        assert_eq!(ids(&closure), vec!["A", "Z"]);
    }

    #[test]
    fn duplicate_seeds_collapse() {
        let index = RelationIndex::new();
        let closure = resolve(&index, seeds(&["A", "A"]), RelationFlags::all());
        assert_eq!(closure.len(), 1);
    }
}
