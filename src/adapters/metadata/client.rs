//! REST client for the metadata service

use super::models::ExportOwnerResponse;
use super::traits::MetadataService;
use crate::adapters::http::HttpEndpoint;
use crate::config::ServiceConfig;
use crate::domain::ids::{AppId, StudyId};
use crate::domain::{AppConfig, MetadataError, Result, StudyConfig, VersionedRecord};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

/// Metadata service client over HTTP
///
/// Calls are made once; failures are mapped to [`MetadataError`] and left to
/// the caller.
pub struct RestMetadataClient {
    endpoint: HttpEndpoint,
}

impl RestMetadataClient {
    /// Create a new metadata client from configuration
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

    /// Base URL of the metadata service
    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        tracing::debug!(url = %url, "Fetching {}", what);

        let resp = self
            .endpoint
            .get(url)
            .send()
            .await
            .map_err(|e| MetadataError::ConnectionFailed(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .map_err(|e| MetadataError::InvalidResponse(format!("{what}: {e}")).into());
        }

        let message = resp.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => MetadataError::NotFound(what.to_string()),
            s if s.is_client_error() => MetadataError::ClientError {
                status: s.as_u16(),
                message,
            },
            s if s.is_server_error() => MetadataError::ServerError {
                status: s.as_u16(),
                message,
            },
            s => MetadataError::InvalidResponse(format!("{what}: unexpected status {s}")),
        }
        .into())
    }
}

#[async_trait]
impl MetadataService for RestMetadataClient {
    async fn get_app(&self, app_id: &AppId) -> Result<AppConfig> {
        let url = self.endpoint.url(&["v1", "apps", app_id.as_str()])?;
        let response: ExportOwnerResponse = self.get_json(url, &format!("app {app_id}")).await?;
        Ok(response.into_app_config(app_id))
    }

    async fn get_study(&self, app_id: &AppId, study_id: &StudyId) -> Result<StudyConfig> {
        let url = self
            .endpoint
            .url(&["v1", "apps", app_id.as_str(), "studies", study_id.as_str()])?;
        let response: ExportOwnerResponse = self
            .get_json(url, &format!("study {study_id} in app {app_id}"))
            .await?;
        Ok(response.into_study_config(study_id))
    }

    async fn get_versioned_record(
        &self,
        app_id: &AppId,
        key: &str,
        record_version: u32,
    ) -> Result<VersionedRecord> {
        let version = record_version.to_string();
        let url = self.endpoint.url(&[
            "v1",
            "apps",
            app_id.as_str(),
            "participants",
            key,
            "versions",
            version.as_str(),
        ])?;
        self.get_json(
            url,
            &format!("participant version {version} of {key} in app {app_id}"),
        )
        .await
    }
}
