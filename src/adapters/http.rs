//! Shared HTTP plumbing for the REST adapters
//!
//! Both the metadata and warehouse clients are single-shot: one request per
//! call, no retry loop. Redelivery by the queue is the only retry mechanism.

use crate::config::{SecretString, ServiceConfig};
use crate::domain::{Result, WorkerError};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Base URL plus an authenticated HTTP client
pub(crate) struct HttpEndpoint {
    base_url: Url,
    client: Client,
    api_token: Option<SecretString>,
}

impl HttpEndpoint {
    /// Builds the HTTP client for a service section
    pub(crate) fn new(config: &ServiceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            WorkerError::Configuration(format!("Invalid base URL '{}': {e}", config.base_url))
        })?;

        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));

        if !config.tls_verify {
            tracing::warn!(base_url = %base_url, "TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| WorkerError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            api_token: config.api_token.clone(),
        })
    }

    /// Joins path segments onto the base URL, percent-encoding each one
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                WorkerError::Configuration(format!(
                    "Base URL cannot be used as a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.get(url))
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.post(url))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.header(
                reqwest::header::AUTHORIZATION,
                token.expose_secret().bearer(),
            ),
            None => request,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}
