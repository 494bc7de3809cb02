//! Export settings for applications and studies
//!
//! Applications and studies carry the same export settings. An owner is
//! *enabled* when its export flag is `true`, and *configured* when it is
//! enabled and also names a non-empty destination table.

use super::ids::{AppId, StudyId, TableId};
use serde::{Deserialize, Serialize};

/// Export flag and destination table shared by apps and studies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Export flag; absent is treated the same as `false`
    #[serde(default)]
    pub export_enabled: Option<bool>,

    /// Destination table for participant version rows
    #[serde(default)]
    pub destination_table_id: Option<String>,
}

impl ExportSettings {
    /// Creates settings with the given flag and table
    pub fn new(export_enabled: Option<bool>, destination_table_id: Option<&str>) -> Self {
        Self {
            export_enabled,
            destination_table_id: destination_table_id.map(str::to_string),
        }
    }

    /// Whether export is switched on
    pub fn is_enabled(&self) -> bool {
        self.export_enabled == Some(true)
    }

    /// Destination table, if export is enabled and a non-empty table is set
    pub fn configured_table(&self) -> Option<TableId> {
        if !self.is_enabled() {
            return None;
        }
        self.destination_table_id
            .as_deref()
            .and_then(|id| TableId::new(id).ok())
    }

    /// Whether export is enabled and has a destination table
    pub fn is_configured(&self) -> bool {
        self.configured_table().is_some()
    }
}

/// Export configuration of an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application identifier
    pub app_id: AppId,

    /// Application-level export settings
    pub export: ExportSettings,
}

impl AppConfig {
    /// Creates an application configuration
    pub fn new(app_id: AppId, export: ExportSettings) -> Self {
        Self { app_id, export }
    }
}

/// Export configuration of a sub-study
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Study identifier
    pub study_id: StudyId,

    /// Study-level export settings
    pub export: ExportSettings,
}

impl StudyConfig {
    /// Creates a study configuration
    pub fn new(study_id: StudyId, export: ExportSettings) -> Self {
        Self { study_id, export }
    }
}
