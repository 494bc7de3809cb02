//! Inbound export request
//!
//! An [`ExportRequest`] is decoded once per queue event and never mutated.
//! Its identity tuple (app, health code, version) correlates every log line
//! emitted while the request is processed.

use super::errors::ProcessError;
use super::ids::{AppId, HealthCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request to export one version of a participant record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ExportRequestWire", rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(rename = "applicationId")]
    app_id: AppId,
    #[serde(rename = "subjectHealthCode")]
    health_code: HealthCode,
    record_version: u32,
}

/// Wire shape of the event body
///
/// Older publishers use the short field names, so both spellings are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportRequestWire {
    #[serde(alias = "appId")]
    application_id: String,
    #[serde(alias = "healthCode")]
    subject_health_code: String,
    #[serde(alias = "participantVersion")]
    record_version: i64,
}

impl TryFrom<ExportRequestWire> for ExportRequest {
    type Error = String;

    fn try_from(wire: ExportRequestWire) -> Result<Self, Self::Error> {
        let record_version = u32::try_from(wire.record_version)
            .ok()
            .filter(|v| *v >= 1)
            .ok_or_else(|| {
                format!(
                    "recordVersion must be a positive integer, got {}",
                    wire.record_version
                )
            })?;

        Ok(Self {
            app_id: AppId::new(wire.application_id)?,
            health_code: HealthCode::new(wire.subject_health_code)?,
            record_version,
        })
    }
}

impl ExportRequest {
    /// Creates a request from already-validated parts
    ///
    /// # Errors
    ///
    /// Returns an error if `record_version` is zero.
    pub fn new(app_id: AppId, health_code: HealthCode, record_version: u32) -> Result<Self, String> {
        if record_version == 0 {
            return Err("recordVersion must be a positive integer, got 0".to_string());
        }
        Ok(Self {
            app_id,
            health_code,
            record_version,
        })
    }

    /// Decodes a queue event body
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::BadRequest`] for any malformed payload. Such
    /// events are never retried.
    ///
    /// # Example
    ///
    /// ```
    /// use pvexport::domain::ExportRequest;
    ///
    /// let body = serde_json::json!({
    ///     "applicationId": "api",
    ///     "subjectHealthCode": "health-code",
    ///     "recordVersion": 42
    /// });
    /// let request = ExportRequest::from_json(&body).unwrap();
    /// assert_eq!(request.record_version(), 42);
    /// ```
    pub fn from_json(body: &serde_json::Value) -> Result<Self, ProcessError> {
        Self::deserialize(body)
            .map_err(|e| ProcessError::BadRequest(format!("Error parsing request: {e}")))
    }

    /// Decodes a raw message string
    pub fn from_json_str(body: &str) -> Result<Self, ProcessError> {
        serde_json::from_str(body)
            .map_err(|e| ProcessError::BadRequest(format!("Error parsing request: {e}")))
    }

    /// Owning application
    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    /// Participant health code
    pub fn health_code(&self) -> &HealthCode {
        &self.health_code
    }

    /// Version of the participant record to export
    pub fn record_version(&self) -> u32 {
        self.record_version
    }
}

impl fmt::Display for ExportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "app {} healthcode {} version {}",
            self.app_id, self.health_code, self.record_version
        )
    }
}
