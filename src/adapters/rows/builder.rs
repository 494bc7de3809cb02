//! Participant version row construction

use crate::domain::record::NO_EXTERNAL_ID;
use crate::domain::{Result, StudyId, TableId, TableRow, VersionedRecord};

/// Column names of the participant version table
pub mod columns {
    pub const HEALTH_CODE: &str = "healthCode";
    pub const PARTICIPANT_VERSION: &str = "participantVersion";
    pub const CREATED_ON: &str = "createdOn";
    pub const MODIFIED_ON: &str = "modifiedOn";
    pub const DATA_GROUPS: &str = "dataGroups";
    pub const LANGUAGES: &str = "languages";
    pub const SHARING_SCOPE: &str = "sharingScope";
    pub const STUDY_MEMBERSHIPS: &str = "studyMemberships";
    pub const TIME_ZONE: &str = "timeZone";
}

/// Maps a versioned record onto a warehouse row
///
/// `study_id` is `None` when building the application-level row.
pub trait RowBuilder: Send + Sync {
    /// Builds one row for the given destination
    fn build_row(
        &self,
        study_id: Option<&StudyId>,
        table_id: &TableId,
        record: &VersionedRecord,
    ) -> Result<TableRow>;
}

/// Default row builder for participant version tables
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordRowBuilder;

impl RecordRowBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl RowBuilder for RecordRowBuilder {
    fn build_row(
        &self,
        study_id: Option<&StudyId>,
        table_id: &TableId,
        record: &VersionedRecord,
    ) -> Result<TableRow> {
        let mut row = TableRow::new();
        row.set(columns::HEALTH_CODE, record.health_code.as_str());
        row.set(columns::PARTICIPANT_VERSION, record.record_version);
        row.set_opt(columns::CREATED_ON, record.created_on.map(|t| t.timestamp_millis()));
        row.set_opt(columns::MODIFIED_ON, record.modified_on.map(|t| t.timestamp_millis()));
        row.set_opt(columns::DATA_GROUPS, join_list(&record.data_groups));
        row.set_opt(columns::LANGUAGES, join_list(&record.languages));
        row.set_opt(columns::SHARING_SCOPE, record.sharing_scope.clone());
        row.set_opt(
            columns::STUDY_MEMBERSHIPS,
            encode_memberships(record, study_id),
        );
        row.set_opt(columns::TIME_ZONE, record.time_zone.clone());

        tracing::trace!(
            table_id = %table_id,
            study_id = ?study_id.map(StudyId::as_str),
            columns = row.len(),
            "Built participant version row"
        );

        Ok(row)
    }
}

fn join_list(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

/// Encodes memberships as `|studyA=extA|studyB|`
///
/// A study-level row only carries its own study. The `<none>` placeholder is
/// written as a bare study id.
pub fn encode_memberships(record: &VersionedRecord, study_id: Option<&StudyId>) -> Option<String> {
    let entries: Vec<String> = record
        .study_memberships
        .iter()
        .filter(|(id, _)| study_id.map_or(true, |only| *id == only))
        .map(|(id, ext)| {
            if ext.is_empty() || ext == NO_EXTERNAL_ID {
                id.to_string()
            } else {
                format!("{id}={ext}")
            }
        })
        .collect();

    if entries.is_empty() {
        None
    } else {
        Some(format!("|{}|", entries.join("|")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppId, HealthCode};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn study(id: &str) -> StudyId {
        StudyId::new(id).unwrap()
    }

    fn record() -> VersionedRecord {
        let mut record = VersionedRecord::new(
            AppId::new("api").unwrap(),
            HealthCode::new("hc-1").unwrap(),
            7,
        )
        .with_membership(study("studyA"), "extA")
        .with_membership(study("studyB"), "extB")
        .with_membership(study("studyC"), NO_EXTERNAL_ID);
        record.created_on = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        record.data_groups = vec!["group1".to_string(), "group2".to_string()];
        record.time_zone = Some("America/Los_Angeles".to_string());
        record
    }

    #[test]
    fn test_app_row_has_all_memberships() {
        let table = TableId::new("syn-app").unwrap();
        let row = RecordRowBuilder::new()
            .build_row(None, &table, &record())
            .unwrap();

        assert_eq!(row.get(columns::HEALTH_CODE), Some(&Value::from("hc-1")));
        assert_eq!(row.get(columns::PARTICIPANT_VERSION), Some(&Value::from(7)));
        assert_eq!(
            row.get(columns::STUDY_MEMBERSHIPS),
            Some(&Value::from("|studyA=extA|studyB=extB|studyC|"))
        );
        assert_eq!(
            row.get(columns::DATA_GROUPS),
            Some(&Value::from("group1,group2"))
        );
        assert_eq!(
            row.get(columns::CREATED_ON),
            Some(&Value::from(1_709_251_200_000i64))
        );
    }

    #[test]
    fn test_study_row_has_only_its_membership() {
        let table = TableId::new("syn-a").unwrap();
        let row = RecordRowBuilder::new()
            .build_row(Some(&study("studyB")), &table, &record())
            .unwrap();

        assert_eq!(
            row.get(columns::STUDY_MEMBERSHIPS),
            Some(&Value::from("|studyB=extB|"))
        );
    }

    #[test]
    fn test_absent_values_are_omitted() {
        let bare = VersionedRecord::new(
            AppId::new("api").unwrap(),
            HealthCode::new("hc-1").unwrap(),
            1,
        );
        let row = RecordRowBuilder::new()
            .build_row(None, &TableId::new("syn-app").unwrap(), &bare)
            .unwrap();

        assert_eq!(row.len(), 2);
        assert!(row.get(columns::STUDY_MEMBERSHIPS).is_none());
        assert!(row.get(columns::LANGUAGES).is_none());
    }
}
