//! Document sources: where the PDF bytes of a document come from.

mod directory;
#[cfg(feature = "net")]
mod http;
mod memory;

pub use directory::DirectorySource;
#[cfg(feature = "net")]
pub use http::{HttpSource, fetch_index};
pub use memory::MemorySource;

use crate::types::DocId;
use crate::{Result, RfcbookError};

/// Trait implemented by anything that can return a document's content by id.
pub trait DocumentSource: Send + Sync {
    /// Human-readable name used in diagnostics (e.g. "http", "directory").
    fn name(&self) -> &'static str;

    /// Fetch the PDF bytes of `id`.
    ///
    /// `Ok(None)` means the source definitively has no such document.
    /// Errors are transport failures; the pipeline treats both as a skipped
    /// document.
    fn fetch(&self, id: &DocId) -> Result<Option<Vec<u8>>>;
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch(&self, id: &DocId) -> Result<Option<Vec<u8>>> {
        (**self).fetch(id)
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch(&self, id: &DocId) -> Result<Option<Vec<u8>>> {
        (**self).fetch(id)
    }
}

/// A URL or file-name pattern with `{number}` and `{id}` placeholders.
///
/// `{number}` is the unpadded RFC number (`791`) and only renders for `RFC`
/// ids; `{id}` is the lower-cased id (`rfc0791`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdTemplate {
    pattern: String,
}

impl IdTemplate {
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains("{number}") && !pattern.contains("{id}") {
            return Err(RfcbookError::invalid_config(format!(
                "template {pattern:?} has neither {{number}} nor {{id}}"
            )));
        }
        Ok(Self { pattern })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render for `id`, or `None` when the template needs a number the id
    /// does not have.
    #[must_use]
    pub fn render(&self, id: &DocId) -> Option<String> {
        let mut rendered = self
            .pattern
            .replace("{id}", &id.as_str().to_ascii_lowercase());
        if rendered.contains("{number}") {
            let number = id.number()?;
            rendered = rendered.replace("{number}", &number.to_string());
        }
        Some(rendered)
    }
}
