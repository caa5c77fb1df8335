//! Fixtures shared by unit tests, integration tests and benchmarks.

use lopdf::{Document, Object, Stream, dictionary};

use crate::Result;
use crate::fetch::MemorySource;

/// Page-dictionary key carrying a fixture page's label.
const LABEL_KEY: &str = "RfcbookLabel";

/// Build a small PDF with `pages` pages labelled `"{label} page {n}"`.
///
/// Media box and resources live on the page tree node, so pages rely on
/// inheritance the way real-world PDFs often do.
pub fn blank_pdf(label: &str, pages: u32) -> Result<Vec<u8>> {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();
    let font_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = document.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for number in 1..=pages {
        let text = format!("{label} page {number}");
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let content_id = document.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            LABEL_KEY => Object::string_literal(text),
        });
        kids.push(page_id.into());
    }

    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => i64::from(pages),
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    document.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Labels of the fixture pages in `document`, in page order.
#[must_use]
pub fn page_labels(document: &Document) -> Vec<String> {
    document
        .get_pages()
        .into_values()
        .filter_map(|page_id| document.get_dictionary(page_id).ok())
        .filter_map(|page| page.get(LABEL_KEY.as_bytes()).and_then(Object::as_str).ok())
        .map(|label| String::from_utf8_lossy(label).into_owned())
        .collect()
}

/// In-memory source holding a fixture PDF per `(id, pages)` pair.
pub fn memory_source(documents: &[(&str, u32)]) -> Result<MemorySource> {
    let mut source = MemorySource::new();
    for (id, pages) in documents {
        source.insert(*id, blank_pdf(id, *pages)?);
    }
    Ok(source)
}
