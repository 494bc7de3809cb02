//! Metadata service API models
//!
//! Wire shapes returned by the metadata service. These stay separate from the
//! domain types; `into_*` methods do the conversion.

use crate::domain::ids::{AppId, StudyId};
use crate::domain::{AppConfig, ExportSettings, StudyConfig};
use serde::{Deserialize, Serialize};

/// Application or study as returned by the metadata service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOwnerResponse {
    /// Owner identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Export flag; `null` or missing means not enabled
    #[serde(default)]
    pub export_enabled: Option<bool>,

    /// Export destination settings
    #[serde(default)]
    pub export_configuration: Option<ExportConfigurationResponse>,
}

/// Export destination settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfigurationResponse {
    /// Table that receives participant version rows
    #[serde(default)]
    pub record_table_id: Option<String>,
}

impl ExportOwnerResponse {
    fn settings(&self) -> ExportSettings {
        let table = self
            .export_configuration
            .as_ref()
            .and_then(|c| c.record_table_id.as_deref());
        ExportSettings::new(self.export_enabled, table)
    }

    /// Converts to an application config for the requested id
    pub fn into_app_config(self, app_id: &AppId) -> AppConfig {
        AppConfig::new(app_id.clone(), self.settings())
    }

    /// Converts to a study config for the requested id
    pub fn into_study_config(self, study_id: &StudyId) -> StudyConfig {
        StudyConfig::new(study_id.clone(), self.settings())
    }
}
