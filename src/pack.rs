//! Greedy, order-preserving packing of documents into page-bounded volumes.
//!
//! A volume is closed when it already holds at least one document and the
//! next document would push it over the budget. A document larger than the
//! budget on its own still gets placed; it ends up alone in its volume.

use crate::types::{PackingPlan, Volume, VolumeEntry};
use crate::{Result, RfcbookError};

/// Incremental packer that hands out each volume as soon as it closes.
#[derive(Debug)]
pub struct VolumePacker {
    max_pages: u32,
    current: Vec<VolumeEntry>,
    current_pages: u64,
    next_number: usize,
}

impl VolumePacker {
    /// Create a packer for the given budget; zero is rejected.
    pub fn new(max_pages: u32) -> Result<Self> {
        if max_pages == 0 {
            return Err(RfcbookError::invalid_config(
                "max_pages must be a positive number of pages",
            ));
        }
        Ok(Self {
            max_pages,
            current: Vec::new(),
            current_pages: 0,
            next_number: 1,
        })
    }

    #[must_use]
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Pages in the volume currently being filled.
    #[must_use]
    pub fn pending_pages(&self) -> u64 {
        self.current_pages
    }

    /// Place the next document. Returns the volume this placement closed, if
    /// any; the document itself always lands in the (possibly fresh) current
    /// volume.
    pub fn push(&mut self, entry: VolumeEntry) -> Result<Option<Volume>> {
        validate_entry(&entry)?;

        let pages = u64::from(entry.pages);
        let closed = if self.current_pages > 0
            && self.current_pages + pages > u64::from(self.max_pages)
        {
            Some(self.close())
        } else {
            None
        };

        self.current_pages += pages;
        self.current.push(entry);
        Ok(closed)
    }

    /// Close the final volume. It is returned even when empty.
    #[must_use]
    pub fn finish(mut self) -> Volume {
        self.close()
    }

    fn close(&mut self) -> Volume {
        let entries = std::mem::take(&mut self.current);
        self.current_pages = 0;
        let volume = Volume::new(self.next_number, entries);
        self.next_number += 1;
        volume
    }
}

fn validate_entry(entry: &VolumeEntry) -> Result<()> {
    if entry.pages == 0 {
        return Err(RfcbookError::InvalidDocument {
            id: entry.id.clone(),
            reason: "document has no pages".into(),
        });
    }
    Ok(())
}

/// Partition `entries` into volumes of at most `max_pages` pages each.
///
/// All input is validated before packing starts: a zero budget or a
/// zero-page document is an error and no plan is produced. The plan always
/// ends with a final volume, which is empty when there was no input.
pub fn pack<I>(entries: I, max_pages: u32) -> Result<PackingPlan>
where
    I: IntoIterator<Item = VolumeEntry>,
{
    let mut packer = VolumePacker::new(max_pages)?;
    let entries: Vec<VolumeEntry> = entries.into_iter().collect();
    for entry in &entries {
        validate_entry(entry)?;
    }

    let mut plan = PackingPlan::default();
    for entry in entries {
        if let Some(volume) = packer.push(entry)? {
            plan.push(volume);
        }
    }
    plan.push(packer.finish());
    Ok(plan)
}
