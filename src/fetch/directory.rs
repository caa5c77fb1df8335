use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{DocumentSource, IdTemplate};
use crate::Result;
use crate::constants::DEFAULT_DOCUMENT_FILE_TEMPLATE;
use crate::types::DocId;

/// Reads documents from a local directory, e.g. a mirror of the RFC PDFs.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    file_name: IdTemplate,
}

impl DirectorySource {
    /// Look documents up as `rfc{number}.txt.pdf` under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_template(root, DEFAULT_DOCUMENT_FILE_TEMPLATE)
    }

    pub fn with_template(root: impl Into<PathBuf>, file_name: &str) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            file_name: IdTemplate::new(file_name)?,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, id: &DocId) -> Option<PathBuf> {
        self.file_name.render(id).map(|name| self.root.join(name))
    }
}

impl DocumentSource for DirectorySource {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn fetch(&self, id: &DocId) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.path_for(id) else {
            return Ok(None);
        };
        match fs_err::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
