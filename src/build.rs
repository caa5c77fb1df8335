//! End-to-end pipeline: select, fetch, pack and write.
//!
//! Documents are fetched in selection order and streamed through a
//! [`VolumePacker`]; each closed volume goes to the writer right away, so
//! only the documents of the volume being filled are held in memory.

use std::fmt;

use serde::Serialize;

use crate::fetch::DocumentSource;
use crate::index::RelationIndex;
use crate::pack::{VolumePacker, pack};
use crate::pdf::PdfDocument;
use crate::select::select;
use crate::types::{BuildOptions, DocId, PackingPlan, Volume, VolumeEntry};
use crate::writer::{VolumeWriter, WrittenVolume};
use crate::Result;

/// Why a selected document did not make it into any volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    NotFound,
    FetchFailed(String),
    Unreadable(String),
    NoPages,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
            Self::FetchFailed(detail) => write!(f, "fetch failed: {detail}"),
            Self::Unreadable(detail) => write!(f, "unreadable PDF: {detail}"),
            Self::NoPages => f.write_str("document has no pages"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub id: DocId,
    pub reason: SkipReason,
}

/// Outcome of [`build_volumes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Documents chosen by selection, before fetching.
    pub selected: usize,
    pub volumes: Vec<WrittenVolume>,
    pub skipped: Vec<SkippedDocument>,
}

impl BuildReport {
    /// Documents that ended up in a written volume.
    #[must_use]
    pub fn packed_documents(&self) -> usize {
        self.volumes.iter().map(|volume| volume.documents.len()).sum()
    }

    #[must_use]
    pub fn written_pages(&self) -> u64 {
        self.volumes.iter().map(|volume| volume.pages).sum()
    }
}

/// Select documents from `index`, fetch them from `source` and hand packed
/// volumes to `writer`.
///
/// Options are validated before anything is fetched. A document that cannot
/// be fetched or parsed, or that has no pages, is skipped with a warning and
/// listed in the report. Errors from the writer abort the build.
pub fn build_volumes<S, W>(
    index: &RelationIndex,
    options: &BuildOptions,
    source: &S,
    writer: &mut W,
) -> Result<BuildReport>
where
    S: DocumentSource + ?Sized,
    W: VolumeWriter + ?Sized,
{
    options.validate()?;
    let ids = select(index, &options.criteria);
    tracing::info!(
        target = "rfcbook::build",
        selected = ids.len(),
        max_pages = options.max_pages,
        source = source.name(),
        "selected documents"
    );

    let mut report = BuildReport {
        selected: ids.len(),
        ..BuildReport::default()
    };
    let mut packer = VolumePacker::new(options.max_pages)?;
    let mut pending: Vec<PdfDocument> = Vec::new();
    let pool = FetchPool::new(options.fetch_workers);

    for window in ids.chunks(options.fetch_workers) {
        for (id, fetched) in window.iter().zip(pool.fetch(source, window)) {
            let document = match load_document(id, fetched) {
                Ok(document) => document,
                Err(reason) => {
                    tracing::warn!(
                        target = "rfcbook::build",
                        %id,
                        %reason,
                        "skipping document"
                    );
                    report.skipped.push(SkippedDocument {
                        id: id.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let entry = VolumeEntry::new(id.clone(), document.page_count());
            if let Some(closed) = packer.push(entry)? {
                emit(writer, &closed, std::mem::take(&mut pending), options, &mut report)?;
            }
            pending.push(document);
        }
    }

    let last = packer.finish();
    emit(writer, &last, pending, options, &mut report)?;

    tracing::info!(
        target = "rfcbook::build",
        volumes = report.volumes.len(),
        documents = report.packed_documents(),
        pages = report.written_pages(),
        skipped = report.skipped.len(),
        "build finished"
    );
    Ok(report)
}

fn emit<W: VolumeWriter + ?Sized>(
    writer: &mut W,
    volume: &Volume,
    documents: Vec<PdfDocument>,
    options: &BuildOptions,
    report: &mut BuildReport,
) -> Result<()> {
    if volume.is_oversized(options.max_pages) {
        tracing::warn!(
            target = "rfcbook::build",
            volume = volume.number(),
            pages = volume.total_pages(),
            max_pages = options.max_pages,
            "single document exceeds the page budget"
        );
    }
    if let Some(written) = writer.write_volume(volume, documents)? {
        report.volumes.push(written);
    }
    Ok(())
}

/// Raw result of one fetch; owned data only so it can cross threads.
enum Fetched {
    Found(Vec<u8>),
    NotFound,
    Failed(String),
}

fn fetch_one<S: DocumentSource + ?Sized>(source: &S, id: &DocId) -> Fetched {
    match source.fetch(id) {
        Ok(Some(bytes)) => Fetched::Found(bytes),
        Ok(None) => Fetched::NotFound,
        Err(err) => Fetched::Failed(err.to_string()),
    }
}

fn load_document(id: &DocId, fetched: Fetched) -> std::result::Result<PdfDocument, SkipReason> {
    let bytes = match fetched {
        Fetched::Found(bytes) => bytes,
        Fetched::NotFound => return Err(SkipReason::NotFound),
        Fetched::Failed(detail) => return Err(SkipReason::FetchFailed(detail)),
    };
    let document = PdfDocument::from_bytes(id.clone(), &bytes)
        .map_err(|err| SkipReason::Unreadable(err.to_string()))?;
    if document.page_count() == 0 {
        return Err(SkipReason::NoPages);
    }
    Ok(document)
}

/// Fetches a window of documents, in parallel when a pool is available.
/// Results always come back in the window's order.
struct FetchPool {
    #[cfg(feature = "parallel_fetch")]
    pool: Option<rayon::ThreadPool>,
}

impl FetchPool {
    fn new(workers: usize) -> Self {
        #[cfg(feature = "parallel_fetch")]
        {
            let pool = if workers > 1 {
                match rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("rfcbook-fetch-{i}"))
                    .build()
                {
                    Ok(pool) => Some(pool),
                    Err(err) => {
                        tracing::warn!(
                            target = "rfcbook::build",
                            error = %err,
                            "could not start fetch workers; fetching sequentially"
                        );
                        None
                    }
                }
            } else {
                None
            };
            Self { pool }
        }
        #[cfg(not(feature = "parallel_fetch"))]
        {
            if workers > 1 {
                tracing::debug!(
                    target = "rfcbook::build",
                    workers,
                    "built without parallel_fetch; fetching sequentially"
                );
            }
            Self {}
        }
    }

    fn fetch<S: DocumentSource + ?Sized>(&self, source: &S, ids: &[DocId]) -> Vec<Fetched> {
        #[cfg(feature = "parallel_fetch")]
        if let Some(pool) = &self.pool {
            use rayon::prelude::*;
            return pool.install(|| ids.par_iter().map(|id| fetch_one(source, id)).collect());
        }
        ids.iter().map(|id| fetch_one(source, id)).collect()
    }
}

/// A packing plan computed from index-declared page counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexPlan {
    pub plan: PackingPlan,
    /// Ids the index has no usable page count for; left out of `plan`.
    pub unplanned: Vec<DocId>,
}

/// Pack `ids` using the page counts the index declares, without fetching.
pub fn plan_from_index(
    index: &RelationIndex,
    ids: &[DocId],
    max_pages: u32,
) -> Result<IndexPlan> {
    let mut unplanned = Vec::new();
    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        match index
            .get(id)
            .and_then(|record| record.page_count)
            .filter(|&pages| pages > 0)
        {
            Some(pages) => entries.push(VolumeEntry::new(id.clone(), pages)),
            None => unplanned.push(id.clone()),
        }
    }
    let plan = pack(entries, max_pages)?;
    Ok(IndexPlan { plan, unplanned })
}
