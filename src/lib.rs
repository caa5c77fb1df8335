#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(
        clippy::useless_vec,
        clippy::uninlined_format_args,
        clippy::cast_possible_truncation
    )
)]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal helpers are self-describing; public entry
// points carry their own docs.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
#![allow(clippy::needless_pass_by_value)] // builders take owned values
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)] // relation flags and config toggles
#![allow(clippy::implicit_hasher)]

//! Select RFCs by id, keyword and relation closure, then bind their pages
//! into page-bounded PDF volumes.
//!
//! ```no_run
//! use rfcbook::{BuildOptions, DirectorySource, PdfVolumeWriter, RelationIndex, SelectionCriteria};
//!
//! # fn main() -> rfcbook::Result<()> {
//! let index = RelationIndex::load("rfc-index.xml")?;
//! let criteria = SelectionCriteria::builder()
//!     .id("RFC0791")
//!     .follow_updates(true)
//!     .build();
//! let source = DirectorySource::new("pdfs")?;
//! let mut writer = PdfVolumeWriter::new("out/ip");
//! let report = rfcbook::build_volumes(&index, &BuildOptions::new(criteria), &source, &mut writer)?;
//! println!("{} volumes", report.volumes.len());
//! # Ok(())
//! # }
//! ```

/// The rfcbook crate version (matches `Cargo.toml`).
pub const RFCBOOK_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod build;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod index;
pub mod pack;
pub mod pdf;
pub mod select;
#[doc(hidden)]
pub mod testing;
pub mod types;
pub mod writer;

pub use build::{
    BuildReport, IndexPlan, SkipReason, SkippedDocument, build_volumes, plan_from_index,
};
pub use config::BuildConfig;
pub use error::{Result, RfcbookError};
pub use fetch::{DirectorySource, DocumentSource, IdTemplate, MemorySource};
#[cfg(feature = "net")]
pub use fetch::{HttpSource, fetch_index};
pub use index::{RelationIndex, parse_index_xml};
pub use pack::{VolumePacker, pack};
pub use pdf::{PdfDocument, merge_documents};
pub use select::{resolve, select, select_by_keyword};
pub use types::{
    BuildOptions, DocId, DocumentRecord, PackingPlan, RelationFlags, RelationKind,
    SelectionCriteria, SelectionCriteriaBuilder, Volume, VolumeEntry,
};
pub use writer::{PdfVolumeWriter, VolumeWriter, WrittenVolume, volume_path};
