//! Versioned participant record
//!
//! A read-only snapshot of one participant version, fetched once per request
//! and shared by every row built for that request.

use super::ids::{AppId, HealthCode, StudyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// External-id placeholder for a membership with no external identifier
pub const NO_EXTERNAL_ID: &str = "<none>";

/// Snapshot of a participant record at a specific version
///
/// Study memberships are kept in a `BTreeMap`, so iterating them is
/// deterministic (ordered by study id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedRecord {
    /// Owning application
    pub app_id: AppId,

    /// Participant health code
    pub health_code: HealthCode,

    /// Record version number
    pub record_version: u32,

    /// When this participant was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,

    /// When this version was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,

    /// Data groups assigned to the participant
    #[serde(default)]
    pub data_groups: Vec<String>,

    /// Preferred languages
    #[serde(default)]
    pub languages: Vec<String>,

    /// Data sharing scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing_scope: Option<String>,

    /// Study id to external id (or [`NO_EXTERNAL_ID`])
    #[serde(default, deserialize_with = "deserialize_memberships")]
    pub study_memberships: BTreeMap<StudyId, String>,

    /// Participant time zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

// The metadata service sends `null` for participants without memberships.
fn deserialize_memberships<'de, D>(deserializer: D) -> Result<BTreeMap<StudyId, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<BTreeMap<StudyId, String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl VersionedRecord {
    /// Creates a record with no optional attributes set
    pub fn new(app_id: AppId, health_code: HealthCode, record_version: u32) -> Self {
        Self {
            app_id,
            health_code,
            record_version,
            created_on: None,
            modified_on: None,
            data_groups: Vec::new(),
            languages: Vec::new(),
            sharing_scope: None,
            study_memberships: BTreeMap::new(),
            time_zone: None,
        }
    }

    /// Adds a study membership
    pub fn with_membership(mut self, study_id: StudyId, external_id: impl Into<String>) -> Self {
        self.study_memberships.insert(study_id, external_id.into());
        self
    }

    /// Study ids this participant belongs to, in deterministic order
    pub fn study_ids(&self) -> impl Iterator<Item = &StudyId> {
        self.study_memberships.keys()
    }

    /// External id for a study, with the placeholder mapped to `None`
    pub fn external_id(&self, study_id: &StudyId) -> Option<&str> {
        self.study_memberships
            .get(study_id)
            .map(String::as_str)
            .filter(|ext| *ext != NO_EXTERNAL_ID && !ext.is_empty())
    }
}
