//! Warehouse table service API models

use crate::domain::{TableId, TableRow};
use serde::{Deserialize, Serialize};

/// Service status reported by `GET /v1/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    /// Reads and writes accepted
    ReadWrite,
    /// Writes rejected
    ReadOnly,
    /// Service unavailable
    Down,
}

/// Status endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ServiceStatus,
}

impl StatusResponse {
    /// Whether rows can be appended right now
    pub fn is_writable(&self) -> bool {
        self.status == ServiceStatus::ReadWrite
    }
}

/// Row append request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendRowsRequest<'a> {
    pub table_id: &'a TableId,
    pub rows: &'a [TableRow],
}

/// Reference to a row the service created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowReference {
    pub row_id: i64,
    #[serde(default)]
    pub version_number: Option<i64>,
}

/// Row append response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppendRowsResponse {
    #[serde(default)]
    pub rows: Vec<RowReference>,
}
