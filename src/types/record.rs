//! Document identifiers and index records.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DOC_ID_DIGITS, RFC_ID_PREFIX};
use crate::{Result, RfcbookError};

/// Unique identifier of a corpus entry, e.g. `RFC0791`.
///
/// Ordering is lexicographic on the string, which is the order documents are
/// packed in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Wrap an id exactly as written (no normalisation).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Normalise an id typed by a user.
    ///
    /// `791`, `rfc791` and `RFC0791` all become `RFC0791`. Other alphabetic
    /// prefixes are upper-cased and keep their series (`bcp14` becomes
    /// `BCP0014`).
    pub fn parse_user_input(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (prefix, digits) = trimmed.split_at(split);

        let invalid = || RfcbookError::InvalidId {
            input: input.to_string(),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        let number: u32 = digits.parse().map_err(|_| invalid())?;
        let series = if prefix.is_empty() {
            RFC_ID_PREFIX.to_string()
        } else {
            prefix.to_ascii_uppercase()
        };
        Ok(Self(format!("{series}{number:0width$}", width = DOC_ID_DIGITS)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of an `RFC` id; `None` for other series.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        let digits = self.0.strip_prefix(RFC_ID_PREFIX)?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for DocId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The three directed edge kinds between documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Updates,
    Obsoletes,
    SeeAlso,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [Self::Updates, Self::Obsoletes, Self::SeeAlso];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Updates => "updates",
            Self::Obsoletes => "obsoletes",
            Self::SeeAlso => "see-also",
        }
    }
}

/// Which relation kinds take part in reference resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationFlags {
    #[serde(default)]
    pub follow_updates: bool,
    #[serde(default)]
    pub follow_obsoletes: bool,
    #[serde(default)]
    pub follow_see_also: bool,
}

impl RelationFlags {
    /// No relations followed; resolution is the identity.
    pub const NONE: Self = Self {
        follow_updates: false,
        follow_obsoletes: false,
        follow_see_also: false,
    };

    #[must_use]
    pub fn all() -> Self {
        Self {
            follow_updates: true,
            follow_obsoletes: true,
            follow_see_also: true,
        }
    }

    #[must_use]
    pub fn follows(self, kind: RelationKind) -> bool {
        match kind {
            RelationKind::Updates => self.follow_updates,
            RelationKind::Obsoletes => self.follow_obsoletes,
            RelationKind::SeeAlso => self.follow_see_also,
        }
    }

    /// Enabled kinds, in a fixed order.
    pub fn enabled(self) -> impl Iterator<Item = RelationKind> {
        RelationKind::ALL
            .into_iter()
            .filter(move |kind| self.follows(*kind))
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.enabled().next().is_none()
    }
}

/// One corpus entry as read from the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocId,
    #[serde(default)]
    pub title: Option<String>,
    /// Page count declared by the index; may differ from the fetched PDF.
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub updates: BTreeSet<DocId>,
    #[serde(default)]
    pub obsoletes: BTreeSet<DocId>,
    #[serde(default)]
    pub see_also: BTreeSet<DocId>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
}

impl DocumentRecord {
    #[must_use]
    pub fn new(id: impl Into<DocId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            page_count: None,
            updates: BTreeSet::new(),
            obsoletes: BTreeSet::new(),
            see_also: BTreeSet::new(),
            keywords: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn related(&self, kind: RelationKind) -> &BTreeSet<DocId> {
        match kind {
            RelationKind::Updates => &self.updates,
            RelationKind::Obsoletes => &self.obsoletes,
            RelationKind::SeeAlso => &self.see_also,
        }
    }

    pub(crate) fn related_mut(&mut self, kind: RelationKind) -> &mut BTreeSet<DocId> {
        match kind {
            RelationKind::Updates => &mut self.updates,
            RelationKind::Obsoletes => &mut self.obsoletes,
            RelationKind::SeeAlso => &mut self.see_also,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.page_count = Some(pages);
        self
    }

    #[must_use]
    pub fn with_relation(mut self, kind: RelationKind, target: impl Into<DocId>) -> Self {
        self.related_mut(kind).insert(target.into());
        self
    }

    #[must_use]
    pub fn updating(self, target: impl Into<DocId>) -> Self {
        self.with_relation(RelationKind::Updates, target)
    }

    #[must_use]
    pub fn obsoleting(self, target: impl Into<DocId>) -> Self {
        self.with_relation(RelationKind::Obsoletes, target)
    }

    #[must_use]
    pub fn see_also(self, target: impl Into<DocId>) -> Self {
        self.with_relation(RelationKind::SeeAlso, target)
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.insert(keyword.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_input_is_normalised() {
        assert_eq!(DocId::parse_user_input("791").unwrap().as_str(), "RFC0791");
        assert_eq!(DocId::parse_user_input("rfc791").unwrap().as_str(), "RFC0791");
        assert_eq!(DocId::parse_user_input(" RFC0791 ").unwrap().as_str(), "RFC0791");
        assert_eq!(DocId::parse_user_input("9000").unwrap().as_str(), "RFC9000");
        assert_eq!(DocId::parse_user_input("10001").unwrap().as_str(), "RFC10001");
        assert_eq!(DocId::parse_user_input("bcp14").unwrap().as_str(), "BCP0014");
    }

    #[test]
    fn malformed_input_is_rejected() {
        for input in ["", "rfc", "RFC-791", "79x1", "r f c 1"] {
            assert!(
                matches!(
                    DocId::parse_user_input(input),
                    Err(RfcbookError::InvalidId { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn number_only_for_rfc_series() {
        assert_eq!(DocId::new("RFC0791").number(), Some(791));
        assert_eq!(DocId::new("BCP0014").number(), None);
        assert_eq!(DocId::new("RFC").number(), None);
    }

    #[test]
    fn flags_enumerate_enabled_kinds() {
        let flags = RelationFlags {
            follow_updates: true,
            follow_see_also: true,
            ..RelationFlags::NONE
        };
        let kinds: Vec<_> = flags.enabled().collect();
        assert_eq!(kinds, vec![RelationKind::Updates, RelationKind::SeeAlso]);
        assert!(RelationFlags::NONE.is_empty());
        assert!(!RelationFlags::all().is_empty());
    }
}
