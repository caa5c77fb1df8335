//! Builder-style options for selecting documents and building volumes.

use serde::{Deserialize, Serialize};

use super::record::{DocId, RelationFlags};
use crate::constants::DEFAULT_MAX_PAGES;
use crate::{Result, RfcbookError};

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_fetch_workers() -> usize {
    1
}

/// What to select from the index.
///
/// `include_all` overrides the other criteria: every indexed document is
/// selected and relations are not followed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    #[serde(default)]
    pub ids: Vec<DocId>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub relations: RelationFlags,
    #[serde(default)]
    pub include_all: bool,
}

impl SelectionCriteria {
    /// Start a fluent builder for `SelectionCriteria`.
    #[must_use]
    pub fn builder() -> SelectionCriteriaBuilder {
        SelectionCriteriaBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionCriteriaBuilder {
    inner: SelectionCriteria,
}

impl SelectionCriteriaBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DocId>) -> Self {
        self.inner.ids.push(id.into());
        self
    }

    #[must_use]
    pub fn ids<I, D>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DocId>,
    {
        self.inner.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.inner.keywords.push(keyword.into());
        self
    }

    #[must_use]
    pub fn follow_updates(mut self, follow: bool) -> Self {
        self.inner.relations.follow_updates = follow;
        self
    }

    #[must_use]
    pub fn follow_obsoletes(mut self, follow: bool) -> Self {
        self.inner.relations.follow_obsoletes = follow;
        self
    }

    #[must_use]
    pub fn follow_see_also(mut self, follow: bool) -> Self {
        self.inner.relations.follow_see_also = follow;
        self
    }

    #[must_use]
    pub fn relations(mut self, relations: RelationFlags) -> Self {
        self.inner.relations = relations;
        self
    }

    #[must_use]
    pub fn include_all(mut self, include_all: bool) -> Self {
        self.inner.include_all = include_all;
        self
    }

    #[must_use]
    pub fn build(self) -> SelectionCriteria {
        self.inner
    }
}

/// Options for a full build: selection plus packing and fetching knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    #[serde(default)]
    pub criteria: SelectionCriteria,
    /// Page budget per volume; must be positive.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Documents fetched concurrently. Values above 1 need the
    /// `parallel_fetch` feature; without it fetching is sequential.
    #[serde(default = "default_fetch_workers")]
    pub fetch_workers: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            criteria: SelectionCriteria::default(),
            max_pages: default_max_pages(),
            fetch_workers: default_fetch_workers(),
        }
    }
}

impl BuildOptions {
    #[must_use]
    pub fn new(criteria: SelectionCriteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn with_fetch_workers(mut self, workers: usize) -> Self {
        self.fetch_workers = workers;
        self
    }

    /// Reject settings that would make packing meaningless.
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
        Ok(())
    }
}
