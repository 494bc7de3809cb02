//! REST client for the warehouse table service

use super::models::{AppendRowsRequest, AppendRowsResponse, StatusResponse};
use super::traits::TableService;
use crate::adapters::http::HttpEndpoint;
use crate::config::ServiceConfig;
use crate::domain::{Result, TableId, TableRow, WarehouseError};
use async_trait::async_trait;
use reqwest::StatusCode;

/// Warehouse table service client over HTTP
pub struct RestTableClient {
    endpoint: HttpEndpoint,
}

impl RestTableClient {
    /// Create a new table client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            endpoint: HttpEndpoint::new(config)?,
        })
    }

    /// Base URL of the table service
    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }
}

#[async_trait]
impl TableService for RestTableClient {
    async fn is_writable(&self) -> Result<bool> {
        let url = self.endpoint.url(&["v1", "status"])?;

        let resp = self
            .endpoint
            .get(url)
            .send()
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(WarehouseError::ServerError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body: StatusResponse = resp
            .json()
            .await
            .map_err(|e| WarehouseError::InvalidResponse(e.to_string()))?;

        tracing::debug!(status = ?body.status, "Table service status");
        Ok(body.is_writable())
    }

    async fn append_rows(&self, table_id: &TableId, rows: Vec<TableRow>) -> Result<usize> {
        let url = self
            .endpoint
            .url(&["v1", "tables", table_id.as_str(), "rows"])?;

        tracing::debug!(table_id = %table_id, rows = rows.len(), "Appending rows");

        let resp = self
            .endpoint
            .post(url)
            .json(&AppendRowsRequest {
                table_id,
                rows: &rows,
            })
            .send()
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => {
                let body: AppendRowsResponse = resp
                    .json()
                    .await
                    .map_err(|e| WarehouseError::InvalidResponse(e.to_string()))?;
                Ok(body.rows.len())
            }
            StatusCode::NOT_FOUND => Err(WarehouseError::TableNotFound(table_id.to_string()).into()),
            s if s.is_server_error() => {
                let message = resp.text().await.unwrap_or_default();
                Err(WarehouseError::ServerError {
                    status: s.as_u16(),
                    message,
                }
                .into())
            }
            s => {
                let body = resp.text().await.unwrap_or_default();
                Err(WarehouseError::AppendFailed {
                    table_id: table_id.to_string(),
                    message: format!("status {s}: {body}"),
                }
                .into())
            }
        }
    }
}
