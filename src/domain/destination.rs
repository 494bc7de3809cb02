//! Export destination

use super::ids::{StudyId, TableId};
use std::fmt;

/// A table a participant version row is appended to
///
/// `study_id` is `None` for the application-level table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    /// Owning study, or `None` for the application itself
    pub study_id: Option<StudyId>,

    /// Destination table
    pub table_id: TableId,
}

impl Destination {
    /// Application-level destination
    pub fn for_app(table_id: TableId) -> Self {
        Self {
            study_id: None,
            table_id,
        }
    }

    /// Study-level destination
    pub fn for_study(study_id: StudyId, table_id: TableId) -> Self {
        Self {
            study_id: Some(study_id),
            table_id,
        }
    }

    /// Whether this is the application-level destination
    pub fn is_app_level(&self) -> bool {
        self.study_id.is_none()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.study_id {
            Some(study_id) => write!(f, "study {study_id} table {}", self.table_id),
            None => write!(f, "app table {}", self.table_id),
        }
    }
}
