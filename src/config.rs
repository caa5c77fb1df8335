//! Run configuration, loadable from a JSON file.
//!
//! Every field has a default so a config file only needs the keys it
//! changes. The command-line front end overlays its flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DOCUMENT_FILE_TEMPLATE, DEFAULT_DOCUMENT_URL_TEMPLATE, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_INDEX_URL, DEFAULT_MAX_PAGES,
};
use crate::fetch::{DirectorySource, DocumentSource};
use crate::index::RelationIndex;
use crate::types::{BuildOptions, RelationFlags, SelectionCriteria, SelectionCriteriaBuilder};
use crate::writer::PdfVolumeWriter;
use crate::{Result, RfcbookError};

/// Upper bound for the default worker count; fetches are network bound.
const MAX_DEFAULT_FETCH_WORKERS: usize = 8;

fn default_fetch_workers() -> usize {
    #[cfg(feature = "parallel_fetch")]
    {
        num_cpus::get().clamp(1, MAX_DEFAULT_FETCH_WORKERS)
    }
    #[cfg(not(feature = "parallel_fetch"))]
    {
        1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Where to download `rfc-index.xml` from when `index_file` is unset.
    pub index_url: String,
    /// Local copy of `rfc-index.xml`; takes precedence over `index_url`.
    pub index_file: Option<PathBuf>,
    pub document_url_template: String,
    /// Read PDFs from this directory instead of downloading them.
    pub document_dir: Option<PathBuf>,
    pub document_file_template: String,
    pub timeout_secs: u64,
    pub fetch_workers: usize,
    pub max_pages: u32,
    pub skip_empty_volumes: bool,
    pub follow_updates: bool,
    pub follow_obsoletes: bool,
    pub follow_see_also: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            index_file: None,
            document_url_template: DEFAULT_DOCUMENT_URL_TEMPLATE.to_string(),
            document_dir: None,
            document_file_template: DEFAULT_DOCUMENT_FILE_TEMPLATE.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            fetch_workers: default_fetch_workers(),
            max_pages: DEFAULT_MAX_PAGES,
            skip_empty_volumes: false,
            follow_updates: false,
            follow_obsoletes: false,
            follow_see_also: false,
        }
    }
}

impl BuildConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs_err::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(
            target = "rfcbook::config",
            path = %path.as_ref().display(),
            "loaded config file"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(RfcbookError::invalid_config(
                "max_pages must be a positive number of pages",
            ));
        }
        if self.fetch_workers == 0 {
            return Err(RfcbookError::invalid_config(
                "fetch_workers must be at least 1",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(RfcbookError::invalid_config(
                "timeout_secs must be at least 1",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn relations(&self) -> RelationFlags {
        RelationFlags {
            follow_updates: self.follow_updates,
            follow_obsoletes: self.follow_obsoletes,
            follow_see_also: self.follow_see_also,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Criteria builder that starts from the configured relation flags.
    #[must_use]
    pub fn criteria_builder(&self) -> SelectionCriteriaBuilder {
        SelectionCriteria::builder().relations(self.relations())
    }

    /// Build options for `criteria` with the configured budget and workers.
    /// The criteria's relation flags are used as given.
    #[must_use]
    pub fn build_options(&self, criteria: SelectionCriteria) -> BuildOptions {
        BuildOptions::new(criteria)
            .with_max_pages(self.max_pages)
            .with_fetch_workers(self.fetch_workers)
    }

    /// Load the index from `index_file`, or download it from `index_url`.
    pub fn load_index(&self) -> Result<RelationIndex> {
        if let Some(path) = &self.index_file {
            return RelationIndex::load(path);
        }
        #[cfg(feature = "net")]
        {
            crate::fetch::fetch_index(&self.index_url, self.timeout())
        }
        #[cfg(not(feature = "net"))]
        {
            Err(RfcbookError::invalid_config(
                "index_file is required when built without the `net` feature",
            ))
        }
    }

    /// The configured document source: a directory when `document_dir` is
    /// set, HTTP otherwise.
    pub fn document_source(&self) -> Result<Box<dyn DocumentSource>> {
        if let Some(dir) = &self.document_dir {
            return Ok(Box::new(DirectorySource::with_template(
                dir,
                &self.document_file_template,
            )?));
        }
        #[cfg(feature = "net")]
        {
            Ok(Box::new(crate::fetch::HttpSource::with_template(
                &self.document_url_template,
                self.timeout(),
            )?))
        }
        #[cfg(not(feature = "net"))]
        {
            Err(RfcbookError::invalid_config(
                "document_dir is required when built without the `net` feature",
            ))
        }
    }

    #[must_use]
    pub fn volume_writer(&self, prefix: impl Into<PathBuf>) -> PdfVolumeWriter {
        PdfVolumeWriter::new(prefix).skip_empty(self.skip_empty_volumes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("rfcbook.json");
        std::fs::write(
            &path,
            r#"{"max_pages": 250, "follow_obsoletes": true, "document_dir": "/srv/rfc"}"#,
        )
        .expect("write");

        let config = BuildConfig::load(&path).expect("load");
        assert_eq!(config.max_pages, 250);
        assert!(config.follow_obsoletes);
        assert!(!config.follow_updates);
        assert_eq!(config.index_url, DEFAULT_INDEX_URL);
        assert_eq!(config.document_dir, Some(PathBuf::from("/srv/rfc")));
        assert!(config.fetch_workers >= 1);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("rfcbook.json");
        std::fs::write(&path, r#"{"maxpages": 10}"#).expect("write");
        let err = BuildConfig::load(&path).unwrap_err();
        assert!(matches!(err, RfcbookError::Json(_)));
    }

    #[test]
    fn zero_budget_is_rejected() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("rfcbook.json");
        std::fs::write(&path, r#"{"max_pages": 0}"#).expect("write");
        assert!(BuildConfig::load(&path).unwrap_err().is_config_error());
    }

    #[test]
    fn configured_relations_seed_criteria() {
        let config = BuildConfig {
            follow_see_also: true,
            max_pages: 300,
            ..BuildConfig::default()
        };
        let options = config.build_options(
            config
                .criteria_builder()
                .id("RFC0791")
                .follow_updates(true)
                .build(),
        );
        assert!(options.criteria.relations.follow_updates);
        assert!(options.criteria.relations.follow_see_also);
        assert!(!options.criteria.relations.follow_obsoletes);
        assert_eq!(options.max_pages, 300);
    }

    #[test]
    fn criteria_can_switch_off_configured_relations() {
        let config = BuildConfig {
            follow_updates: true,
            follow_see_also: true,
            ..BuildConfig::default()
        };
        let options = config.build_options(
            config
                .criteria_builder()
                .id("RFC0791")
                .follow_updates(false)
                .build(),
        );
        assert_eq!(
            options.criteria.relations,
            RelationFlags {
                follow_see_also: true,
                ..RelationFlags::NONE
            }
        );
    }

    #[test]
    fn directory_source_when_dir_configured() {
        let dir = tempdir().expect("tmp");
        let config = BuildConfig {
            document_dir: Some(dir.path().to_path_buf()),
            ..BuildConfig::default()
        };
        assert_eq!(config.document_source().expect("source").name(), "directory");
    }

    #[test]
    fn index_file_takes_precedence() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("rfc-index.xml");
        std::fs::write(
            &path,
            r#"<rfc-index xmlns="http://www.rfc-editor.org/rfc-index">
                 <rfc-entry><doc-id>RFC0001</doc-id></rfc-entry>
               </rfc-index>"#,
        )
        .expect("write");
        let config = BuildConfig {
            index_file: Some(path),
            index_url: "http://127.0.0.1:9/unreachable".to_string(),
            ..BuildConfig::default()
        };
        assert_eq!(config.load_index().expect("index").len(), 1);
    }
}
