//! PDF handling on top of `lopdf`: page counting, page concatenation and
//! atomic persistence.

use std::io::{BufWriter, Write};
use std::path::Path;

use atomic_write_file::AtomicWriteFile;
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use crate::types::DocId;
use crate::{Result, RfcbookError};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed, cyclic page trees.
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// A fetched document parsed into a PDF with a known page count.
#[derive(Debug)]
pub struct PdfDocument {
    id: DocId,
    document: Document,
    page_count: u32,
}

impl PdfDocument {
    /// Parse PDF bytes belonging to `id`.
    pub fn from_bytes(id: DocId, bytes: &[u8]) -> Result<Self> {
        let document = Document::load_mem(bytes)?;
        let page_count =
            u32::try_from(document.get_pages().len()).map_err(|_| RfcbookError::InvalidDocument {
                id: id.clone(),
                reason: "page count does not fit in 32 bits".into(),
            })?;
        Ok(Self {
            id,
            document,
            page_count,
        })
    }

    #[must_use]
    pub fn id(&self) -> &DocId {
        &self.id
    }

    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    #[must_use]
    pub fn into_inner(self) -> Document {
        self.document
    }
}

fn is_node_type(object: &Object, name: &[u8]) -> bool {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|value| value.as_name().ok())
        == Some(name)
}

/// Copy inheritable attributes from the page's ancestors onto the page so it
/// keeps its geometry and resources once re-parented.
fn inherit_page_attributes(document: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        if depth >= MAX_PAGE_TREE_DEPTH {
            break;
        }
        let Ok(node) = document.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE_ATTRIBUTES {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
}

/// Concatenate the pages of `documents`, in order, into one PDF.
///
/// Each input's pages keep their relative order and stay contiguous. Source
/// catalogs and page trees are replaced by a single flat page tree; outlines
/// are dropped.
pub fn merge_documents<I>(documents: I) -> Result<Document>
where
    I: IntoIterator<Item = Document>,
{
    let mut merged = Document::with_version("1.5");
    let pages_id = merged.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for mut document in documents {
        document.renumber_objects_with(merged.max_id + 1);

        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        let mut pages = Vec::with_capacity(page_ids.len());
        for page_id in page_ids {
            let mut page = document.get_dictionary(page_id)?.clone();
            inherit_page_attributes(&document, &mut page);
            page.set("Parent", pages_id);
            pages.push((page_id, page));
        }

        merged.max_id = merged.max_id.max(document.max_id);
        for (object_id, object) in std::mem::take(&mut document.objects) {
            if is_node_type(&object, b"Catalog") || is_node_type(&object, b"Pages") {
                continue;
            }
            merged.objects.insert(object_id, object);
        }
        for (page_id, page) in pages {
            merged.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    Ok(merged)
}

/// Write `document` to `path`; the file only appears once fully written.
pub fn save_atomically(document: &mut Document, path: &Path) -> Result<()> {
    let mut file = AtomicWriteFile::options().open(path)?;
    {
        let mut out = BufWriter::new(file.as_file_mut());
        document.save_to(&mut out)?;
        out.flush()?;
    }
    file.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{blank_pdf, page_labels};
    use tempfile::tempdir;

    fn parsed(id: &str, pages: u32) -> PdfDocument {
        let bytes = blank_pdf(id, pages).expect("pdf");
        PdfDocument::from_bytes(DocId::new(id), &bytes).expect("parse")
    }

    #[test]
    fn counts_pages() {
        assert_eq!(parsed("RFC0001", 3).page_count(), 3);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = PdfDocument::from_bytes(DocId::new("RFC0001"), b"not a pdf").unwrap_err();
        assert!(matches!(err, RfcbookError::Pdf(_)));
    }

    #[test]
    fn merge_keeps_document_and_page_order() {
        let merged = merge_documents([
            parsed("RFC0001", 2).into_inner(),
            parsed("RFC0002", 1).into_inner(),
            parsed("RFC0003", 3).into_inner(),
        ])
        .expect("merge");

        assert_eq!(merged.get_pages().len(), 6);
        assert_eq!(
            page_labels(&merged),
            vec![
                "RFC0001 page 1",
                "RFC0001 page 2",
                "RFC0002 page 1",
                "RFC0003 page 1",
                "RFC0003 page 2",
                "RFC0003 page 3",
            ]
        );
    }

    #[test]
    fn merged_pages_keep_inherited_media_box() {
        let merged = merge_documents([parsed("RFC0001", 1).into_inner()]).expect("merge");
        let (_, page_id) = merged.get_pages().into_iter().next().expect("page");
        let page = merged.get_dictionary(page_id).expect("page dict");
        assert!(page.has(b"MediaBox"));
    }

    #[test]
    fn saved_volume_reloads() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("volume-1.pdf");
        let mut merged = merge_documents([
            parsed("RFC0001", 2).into_inner(),
            parsed("RFC0002", 2).into_inner(),
        ])
        .expect("merge");
        save_atomically(&mut merged, &path).expect("save");

        let bytes = std::fs::read(&path).expect("read");
        let reloaded = PdfDocument::from_bytes(DocId::new("volume"), &bytes).expect("reload");
        assert_eq!(reloaded.page_count(), 4);
    }

    #[test]
    fn empty_merge_is_a_valid_document() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("empty.pdf");
        let mut merged = merge_documents(Vec::<Document>::new()).expect("merge");
        save_atomically(&mut merged, &path).expect("save");
        assert!(path.exists());
        assert_eq!(merged.get_pages().len(), 0);
    }
}
