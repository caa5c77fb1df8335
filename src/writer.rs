//! Output side of the pipeline: turning a packed volume into a file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::constants::VOLUME_EXTENSION;
use crate::pdf::{PdfDocument, merge_documents, save_atomically};
use crate::types::{DocId, Volume};
use crate::{Result, RfcbookError};

/// Metadata about a volume that reached its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenVolume {
    pub number: usize,
    pub path: PathBuf,
    pub documents: Vec<DocId>,
    pub pages: u64,
}

/// Receives volumes as the pipeline closes them.
///
/// `documents` are the parsed PDFs of the volume's entries, in entry order.
/// Returns `None` when the writer chose not to emit the volume.
pub trait VolumeWriter {
    fn write_volume(
        &mut self,
        volume: &Volume,
        documents: Vec<PdfDocument>,
    ) -> Result<Option<WrittenVolume>>;
}

impl<W: VolumeWriter + ?Sized> VolumeWriter for &mut W {
    fn write_volume(
        &mut self,
        volume: &Volume,
        documents: Vec<PdfDocument>,
    ) -> Result<Option<WrittenVolume>> {
        (**self).write_volume(volume, documents)
    }
}

/// `{prefix}-{number}.pdf`
#[must_use]
pub fn volume_path(prefix: &Path, number: usize) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!("-{number}.{VOLUME_EXTENSION}"));
    PathBuf::from(name)
}

/// Writes each volume as a single concatenated PDF next to `prefix`.
#[derive(Debug, Clone)]
pub struct PdfVolumeWriter {
    prefix: PathBuf,
    skip_empty: bool,
}

impl PdfVolumeWriter {
    #[must_use]
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            skip_empty: false,
        }
    }

    /// Do not emit a file for a volume without documents.
    #[must_use]
    pub fn skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    #[must_use]
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }
}

impl VolumeWriter for PdfVolumeWriter {
    fn write_volume(
        &mut self,
        volume: &Volume,
        documents: Vec<PdfDocument>,
    ) -> Result<Option<WrittenVolume>> {
        if volume.is_empty() && self.skip_empty {
            tracing::info!(
                target = "rfcbook::writer",
                volume = volume.number(),
                "skipping empty volume"
            );
            return Ok(None);
        }

        let planned = volume.entries().iter().map(|entry| &entry.id);
        if !planned.eq(documents.iter().map(PdfDocument::id)) {
            return Err(RfcbookError::invalid_config(format!(
                "documents handed to volume {} do not match its entries",
                volume.number()
            )));
        }

        let path = volume_path(&self.prefix, volume.number());
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent)?;
        }

        let mut merged = merge_documents(documents.into_iter().map(PdfDocument::into_inner))?;
        save_atomically(&mut merged, &path)?;

        tracing::info!(
            target = "rfcbook::writer",
            volume = volume.number(),
            path = %path.display(),
            documents = volume.len(),
            pages = volume.total_pages(),
            "wrote volume"
        );
        Ok(Some(WrittenVolume {
            number: volume.number(),
            path,
            documents: volume.ids().cloned().collect(),
            pages: volume.total_pages(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{blank_pdf, page_labels};
    use crate::types::VolumeEntry;
    use tempfile::tempdir;

    fn document(id: &str, pages: u32) -> PdfDocument {
        let bytes = blank_pdf(id, pages).expect("pdf");
        PdfDocument::from_bytes(DocId::new(id), &bytes).expect("parse")
    }

    fn volume(number: usize, entries: &[(&str, u32)]) -> Volume {
        Volume::new(
            number,
            entries
                .iter()
                .map(|(id, pages)| VolumeEntry::new(*id, *pages))
                .collect(),
        )
    }

    #[test]
    fn volume_paths_append_number() {
        assert_eq!(
            volume_path(Path::new("out/rfcs"), 3),
            PathBuf::from("out/rfcs-3.pdf")
        );
        assert_eq!(volume_path(Path::new("book"), 1), PathBuf::from("book-1.pdf"));
    }

    #[test]
    fn writes_concatenated_volume() {
        let dir = tempdir().expect("tmp");
        let mut writer = PdfVolumeWriter::new(dir.path().join("nested").join("book"));
        let written = writer
            .write_volume(
                &volume(1, &[("RFC0001", 2), ("RFC0002", 1)]),
                vec![document("RFC0001", 2), document("RFC0002", 1)],
            )
            .expect("write")
            .expect("volume emitted");

        assert_eq!(written.path, dir.path().join("nested").join("book-1.pdf"));
        assert_eq!(written.pages, 3);
        assert_eq!(
            written.documents,
            vec![DocId::new("RFC0001"), DocId::new("RFC0002")]
        );

        let output = lopdf::Document::load(&written.path).expect("load");
        assert_eq!(
            page_labels(&output),
            vec!["RFC0001 page 1", "RFC0001 page 2", "RFC0002 page 1"]
        );
    }

    #[test]
    fn empty_volume_written_unless_skipped() {
        let dir = tempdir().expect("tmp");
        let mut writer = PdfVolumeWriter::new(dir.path().join("book"));
        let written = writer
            .write_volume(&volume(1, &[]), Vec::new())
            .expect("write");
        assert!(written.is_some());
        assert!(dir.path().join("book-1.pdf").exists());

        let mut skipping = PdfVolumeWriter::new(dir.path().join("other")).skip_empty(true);
        let written = skipping
            .write_volume(&volume(1, &[]), Vec::new())
            .expect("write");
        assert!(written.is_none());
        assert!(!dir.path().join("other-1.pdf").exists());
    }

    #[test]
    fn mismatched_documents_rejected() {
        let dir = tempdir().expect("tmp");
        let mut writer = PdfVolumeWriter::new(dir.path().join("book"));
        let err = writer
            .write_volume(&volume(1, &[("RFC0001", 2)]), vec![document("RFC0002", 2)])
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(!dir.path().join("book-1.pdf").exists());
    }
}
