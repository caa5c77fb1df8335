use std::collections::HashMap;

use super::DocumentSource;
use crate::Result;
use crate::types::DocId;

/// Documents held in memory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<DocId, Vec<u8>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<DocId>, bytes: Vec<u8>) {
        self.documents.insert(id.into(), bytes);
    }

    #[must_use]
    pub fn with_document(mut self, id: impl Into<DocId>, bytes: Vec<u8>) -> Self {
        self.insert(id, bytes);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn fetch(&self, id: &DocId) -> Result<Option<Vec<u8>>> {
        Ok(self.documents.get(id).cloned())
    }
}
