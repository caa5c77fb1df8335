//! In-memory relation index: document id to relations and keywords.

mod xml;

use std::collections::BTreeMap;
use std::path::Path;

use crate::Result;
use crate::types::{DocId, DocumentRecord};

pub use xml::parse_index_xml;

/// Read-only mapping from document id to its record.
///
/// Built once per run and borrowed by the selector and the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationIndex {
    records: BTreeMap<DocId, DocumentRecord>,
}

impl RelationIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from records. A later record with the same id replaces
    /// an earlier one.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = DocumentRecord>,
    {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Parse an `rfc-index.xml` document.
    pub fn from_xml_str(xml: &str) -> Result<Self> {
        parse_index_xml(xml)
    }

    /// Load and parse an `rfc-index.xml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let xml = fs_err::read_to_string(path.as_ref())?;
        let index = parse_index_xml(&xml)?;
        tracing::info!(
            target = "rfcbook::index",
            path = %path.as_ref().display(),
            records = index.len(),
            "loaded document index"
        );
        Ok(index)
    }

    pub fn insert(&mut self, record: DocumentRecord) -> Option<DocumentRecord> {
        let previous = self.records.insert(record.id.clone(), record);
        if let Some(previous) = previous.as_ref() {
            tracing::warn!(
                target = "rfcbook::index",
                id = %previous.id,
                "duplicate index entry; keeping the later one"
            );
        }
        previous
    }

    #[must_use]
    pub fn get(&self, id: &DocId) -> Option<&DocumentRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &DocId) -> bool {
        self.records.contains_key(id)
    }

    /// Every indexed id, in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &DocId> {
        self.records.keys()
    }

    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<DocumentRecord> for RelationIndex {
    fn from_iter<T: IntoIterator<Item = DocumentRecord>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}
