//! Parser for the RFC Editor's `rfc-index.xml`.
//!
//! Only `<rfc-entry>` elements are read. From each entry the parser keeps:
//! - `doc-id`, `title` and `page-count`
//! - `keywords/kw`
//! - `updates/doc-id`, `obsoletes/doc-id` and `see-also/doc-id`
//!
//! Reverse relations (`updated-by`, `obsoleted-by`) and the BCP/STD/FYI
//! entries are ignored.

use quick_xml::Reader as XmlReader;
use quick_xml::events::{BytesStart, Event};

use super::RelationIndex;
use crate::constants::RFC_INDEX_NAMESPACE;
use crate::types::{DocId, DocumentRecord, RelationKind};
use crate::{Result, RfcbookError};

const ROOT: &[u8] = b"rfc-index";
const ENTRY: &[u8] = b"rfc-entry";

/// Fields collected while inside one `<rfc-entry>`.
#[derive(Debug, Default)]
struct PendingEntry {
    id: Option<DocId>,
    record: Option<DocumentRecord>,
}

impl PendingEntry {
    fn record(&mut self) -> &mut DocumentRecord {
        self.record
            .get_or_insert_with(|| DocumentRecord::new(DocId::new(String::new())))
    }

    fn finish(self) -> Option<DocumentRecord> {
        let id = self.id?;
        let mut record = self.record.unwrap_or_else(|| DocumentRecord::new(id.clone()));
        record.id = id;
        Some(record)
    }
}

fn relation_for(container: &[u8]) -> Option<RelationKind> {
    match container {
        b"updates" => Some(RelationKind::Updates),
        b"obsoletes" => Some(RelationKind::Obsoletes),
        b"see-also" => Some(RelationKind::SeeAlso),
        _ => None,
    }
}

fn check_namespace(root: &BytesStart<'_>) {
    for attr in root.attributes().flatten() {
        if attr.key.as_ref() == b"xmlns" {
            if let Ok(value) = attr.unescape_value() {
                if value != RFC_INDEX_NAMESPACE {
                    tracing::warn!(
                        target = "rfcbook::index",
                        namespace = %value,
                        "unexpected rfc-index namespace"
                    );
                }
            }
        }
    }
}

/// Parse an `rfc-index.xml` document into a [`RelationIndex`].
///
/// Entries without a `doc-id` are skipped with a warning; malformed XML or a
/// root element other than `rfc-index` is an error.
pub fn parse_index_xml(xml: &str) -> Result<RelationIndex> {
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut index = RelationIndex::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut text = String::new();
    let mut entry: Option<PendingEntry> = None;
    let mut skipped = 0usize;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name().as_ref().to_vec();
                if stack.is_empty() {
                    if name != ROOT {
                        return Err(RfcbookError::IndexParse {
                            reason: format!(
                                "expected <rfc-index> root, found <{}>",
                                String::from_utf8_lossy(&name)
                            )
                            .into(),
                        });
                    }
                    check_namespace(e);
                }
                if name == ENTRY && entry.is_none() {
                    entry = Some(PendingEntry::default());
                }
                stack.push(name);
                text.clear();
            }
            Ok(Event::Empty(ref e)) => {
                if stack.is_empty() && e.local_name().as_ref() != ROOT {
                    return Err(RfcbookError::IndexParse {
                        reason: "expected <rfc-index> root element".into(),
                    });
                }
            }
            Ok(Event::Text(ref t)) => {
                let value = t.unescape().map_err(|err| RfcbookError::IndexParse {
                    reason: format!("bad text near byte {}: {err}", reader.buffer_position())
                        .into(),
                })?;
                text.push_str(&value);
            }
            Ok(Event::CData(c)) => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(_)) => {
                let Some(name) = stack.pop() else {
                    continue;
                };
                let value = std::mem::take(&mut text);
                let value = value.trim();
                let parent = stack.last().map(Vec::as_slice);

                if name == ENTRY {
                    if let Some(pending) = entry.take() {
                        match pending.finish() {
                            Some(record) => {
                                index.insert(record);
                            }
                            None => {
                                skipped += 1;
                                tracing::warn!(
                                    target = "rfcbook::index",
                                    "skipping rfc-entry without a doc-id"
                                );
                            }
                        }
                    }
                    continue;
                }

                let Some(pending) = entry.as_mut() else {
                    continue;
                };
                if value.is_empty() {
                    continue;
                }
                match (name.as_slice(), parent) {
                    (b"doc-id", Some(ENTRY)) => pending.id = Some(DocId::new(value)),
                    (b"doc-id", Some(container)) => {
                        if let Some(kind) = relation_for(container) {
                            pending.record().related_mut(kind).insert(DocId::new(value));
                        }
                    }
                    (b"title", Some(ENTRY)) => pending.record().title = Some(value.to_string()),
                    (b"kw", Some(b"keywords")) => {
                        pending.record().keywords.insert(value.to_string());
                    }
                    (b"page-count", _) => match value.parse::<u32>() {
                        Ok(pages) => pending.record().page_count = Some(pages),
                        Err(_) => tracing::warn!(
                            target = "rfcbook::index",
                            page_count = value,
                            "ignoring unparsable page-count"
                        ),
                    },
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(RfcbookError::IndexParse {
                    reason: format!("near byte {}: {err}", reader.buffer_position()).into(),
                });
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(RfcbookError::IndexParse {
            reason: "unexpected end of document".into(),
        });
    }

    tracing::debug!(
        target = "rfcbook::index",
        records = index.len(),
        skipped,
        "parsed rfc-index"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rfc-index xmlns="http://www.rfc-editor.org/rfc-index">
  <bcp-entry>
    <doc-id>BCP0014</doc-id>
    <is-also><doc-id>RFC2119</doc-id></is-also>
  </bcp-entry>
  <rfc-entry>
    <doc-id>RFC0791</doc-id>
    <title>Internet Protocol</title>
    <format><file-format>ASCII</file-format></format>
    <page-count>51</page-count>
    <obsoletes><doc-id>RFC0760</doc-id></obsoletes>
    <updated-by><doc-id>RFC1349</doc-id></updated-by>
  </rfc-entry>
  <rfc-entry>
    <doc-id>RFC1349</doc-id>
    <title>Type of Service in the Internet Protocol Suite</title>
    <page-count>28</page-count>
    <keywords><kw>TOS</kw><kw>IP</kw></keywords>
    <updates><doc-id>RFC0791</doc-id><doc-id>RFC1248</doc-id></updates>
    <obsoleted-by><doc-id>RFC2474</doc-id></obsoleted-by>
    <see-also><doc-id>STD0003</doc-id></see-also>
  </rfc-entry>
  <rfc-entry>
    <doc-id>RFC2119</doc-id>
    <title>Key words for use in RFCs to Indicate Requirement Levels &amp; More</title>
    <keywords/>
  </rfc-entry>
</rfc-index>"#;

    #[test]
    fn parses_entries_and_relations() {
        let index = parse_index_xml(SAMPLE).expect("parse");
        assert_eq!(index.len(), 3);

        let ip = index.get(&DocId::new("RFC0791")).expect("RFC0791");
        assert_eq!(ip.title.as_deref(), Some("Internet Protocol"));
        assert_eq!(ip.page_count, Some(51));
        assert!(ip.obsoletes.contains(&DocId::new("RFC0760")));
        assert!(ip.updates.is_empty(), "updated-by is a reverse relation");

        let tos = index.get(&DocId::new("RFC1349")).expect("RFC1349");
        assert_eq!(tos.updates.len(), 2);
        assert!(tos.obsoletes.is_empty(), "obsoleted-by is a reverse relation");
        assert!(tos.see_also.contains(&DocId::new("STD0003")));
        assert!(tos.keywords.contains("TOS"));
        assert!(tos.keywords.contains("IP"));
    }

    #[test]
    fn non_rfc_entries_are_ignored_and_text_unescaped() {
        let index = parse_index_xml(SAMPLE).expect("parse");
        assert!(!index.contains(&DocId::new("BCP0014")));
        let levels = index.get(&DocId::new("RFC2119")).expect("RFC2119");
        assert!(levels.title.as_deref().unwrap_or_default().ends_with("& More"));
        assert!(levels.keywords.is_empty());
    }

    #[test]
    fn entry_without_id_is_skipped() {
        let xml = r#"<rfc-index>
            <rfc-entry><title>orphan</title></rfc-entry>
            <rfc-entry><doc-id>RFC0001</doc-id></rfc-entry>
        </rfc-index>"#;
        let index = parse_index_xml(xml).expect("parse");
        assert_eq!(index.len(), 1);
        assert!(index.contains(&DocId::new("RFC0001")));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = parse_index_xml("<html><body>Not Found</body></html>").unwrap_err();
        assert!(matches!(err, RfcbookError::IndexParse { .. }));
    }

    #[test]
    fn truncated_document_is_rejected() {
        let err = parse_index_xml("<rfc-index><rfc-entry><doc-id>RFC0001</doc-id>").unwrap_err();
        assert!(matches!(err, RfcbookError::IndexParse { .. }));
    }
}
