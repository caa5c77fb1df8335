//! Volumes produced by the packer.

use serde::{Deserialize, Serialize};

use super::record::DocId;

/// A document placed into a volume together with its page count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeEntry {
    pub id: DocId,
    pub pages: u32,
}

impl VolumeEntry {
    #[must_use]
    pub fn new(id: impl Into<DocId>, pages: u32) -> Self {
        Self {
            id: id.into(),
            pages,
        }
    }
}

/// An ordered run of whole documents that becomes one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    number: usize,
    entries: Vec<VolumeEntry>,
    total_pages: u64,
}

impl Volume {
    pub(crate) fn new(number: usize, entries: Vec<VolumeEntry>) -> Self {
        let total_pages = entries.iter().map(|entry| u64::from(entry.pages)).sum();
        Self {
            number,
            entries,
            total_pages,
        }
    }

    /// 1-based position of the volume in its plan.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    #[must_use]
    pub fn entries(&self) -> &[VolumeEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &DocId> {
        self.entries.iter().map(|entry| &entry.id)
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True for the one case the budget may be exceeded: a single document
    /// larger than the budget on its own.
    #[must_use]
    pub fn is_oversized(&self, max_pages: u32) -> bool {
        self.total_pages > u64::from(max_pages)
    }
}

/// Ordered sequence of volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingPlan {
    volumes: Vec<Volume>,
}

impl PackingPlan {
    pub(crate) fn push(&mut self, volume: Volume) {
        self.volumes.push(volume);
    }

    #[must_use]
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Volume> {
        self.volumes.iter()
    }

    /// Number of documents across all volumes.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.volumes.iter().map(Volume::len).sum()
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.volumes.iter().map(Volume::total_pages).sum()
    }
}

impl IntoIterator for PackingPlan {
    type Item = Volume;
    type IntoIter = std::vec::IntoIter<Volume>;

    fn into_iter(self) -> Self::IntoIter {
        self.volumes.into_iter()
    }
}

impl<'a> IntoIterator for &'a PackingPlan {
    type Item = &'a Volume;
    type IntoIter = std::slice::Iter<'a, Volume>;

    fn into_iter(self) -> Self::IntoIter {
        self.volumes.iter()
    }
}
