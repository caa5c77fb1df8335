//! Public types exposed by the `rfcbook` crate.

pub mod options;
pub mod record;
pub mod volume;

pub use options::{BuildOptions, SelectionCriteria, SelectionCriteriaBuilder};
pub use record::{DocId, DocumentRecord, RelationFlags, RelationKind};
pub use volume::{PackingPlan, Volume, VolumeEntry};
