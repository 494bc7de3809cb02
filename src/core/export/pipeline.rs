//! Participant version export pipeline
//!
//! Decodes one queue event and runs it through:
//!
//! 1. **Liveness check**: the table service must be writable, otherwise the
//!    request fails as retryable before any metadata is fetched
//! 2. **App fetch**: an app that is not export-enabled makes the request a no-op
//! 3. **Record fetch**: the participant version, looked up by `healthCode:<code>`
//! 4. **Study fetch**: one fetch per membership, even for studies that turn out
//!    unconfigured
//! 5. **Resolve**: see [`resolve_destinations`]
//! 6. **Export**: one row per destination, sequentially; the first failure
//!    aborts the rest and propagates
//!
//! Elapsed time and the request identity are logged when the request finishes,
//! whatever the outcome.

use super::executor::{ExportOutcome, RowExporter};
use super::resolver::resolve_destinations;
use crate::adapters::metadata::{MetadataService, RestMetadataClient};
use crate::adapters::rows::{RecordRowBuilder, RowBuilder};
use crate::adapters::warehouse::{RestTableClient, TableService};
use crate::config::WorkerConfig;
use crate::domain::{ExportRequest, ProcessError, Result, StudyConfig, StudyId};
use crate::log_request_complete;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// How far a request got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    LivenessChecked,
    AppFetched,
    RecordFetched,
    StudiesFetched,
    DestinationsResolved,
    /// Exporting to the destination at this index
    Exporting(usize),
    NoOp,
    Done,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::NoOp | Stage::Done)
    }
}

/// Result of a request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The app is not export-enabled; nothing was written
    ExportDisabled,
    /// Every resolved destination was written
    Exported {
        /// Number of destinations written
        destinations: usize,
        /// Appends that reported a row count other than 1
        anomalies: usize,
    },
}

/// Logs elapsed time and request identity when dropped
///
/// Held for the whole of [`ExportPipeline::process`], so early returns and
/// `?` propagation are covered too.
pub struct RequestTimer {
    app_id: String,
    health_code: String,
    record_version: u32,
    started: Instant,
    stage: Stage,
}

impl RequestTimer {
    pub fn start(request: &ExportRequest) -> Self {
        Self {
            app_id: request.app_id().to_string(),
            health_code: request.health_code().to_string(),
            record_version: request.record_version(),
            started: Instant::now(),
            stage: Stage::Received,
        }
    }

    pub fn advance(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        if !self.stage.is_terminal() {
            tracing::warn!(
                app_id = %self.app_id,
                health_code = %self.health_code,
                record_version = self.record_version,
                stage = ?self.stage,
                "Participant version export failed"
            );
        }
        log_request_complete!(self.app_id, self.health_code, self.record_version, elapsed);
    }
}

/// Export pipeline for participant version events
///
/// Collaborators are injected through [`ExportPipeline::new`]. Clones share
/// the collaborators but no per-request state, so each worker can own one.
#[derive(Clone)]
pub struct ExportPipeline {
    metadata: Arc<dyn MetadataService>,
    table_service: Arc<dyn TableService>,
    exporter: RowExporter,
}

impl ExportPipeline {
    pub fn new(
        metadata: Arc<dyn MetadataService>,
        row_builder: Arc<dyn RowBuilder>,
        table_service: Arc<dyn TableService>,
    ) -> Self {
        let exporter = RowExporter::new(row_builder, Arc::clone(&table_service));
        Self {
            metadata,
            table_service,
            exporter,
        }
    }

    /// Builds a pipeline backed by the REST clients named in the config
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either HTTP client cannot be built.
    pub fn from_config(config: &WorkerConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(RestMetadataClient::new(&config.metadata)?),
            Arc::new(RecordRowBuilder::new()),
            Arc::new(RestTableClient::new(&config.warehouse)?),
        ))
    }

    /// Decodes a raw queue event and processes it
    ///
    /// # Errors
    ///
    /// [`ProcessError::BadRequest`] if the body is not a valid request,
    /// otherwise whatever [`ExportPipeline::process`] returns.
    pub async fn accept(&self, body: &str) -> std::result::Result<ProcessOutcome, ProcessError> {
        let request = ExportRequest::from_json_str(body)?;
        self.process(&request).await
    }

    /// Decodes an already-parsed JSON event and processes it
    pub async fn accept_value(
        &self,
        body: &serde_json::Value,
    ) -> std::result::Result<ProcessOutcome, ProcessError> {
        let request = ExportRequest::from_json(body)?;
        self.process(&request).await
    }

    /// Processes one export request
    ///
    /// # Errors
    ///
    /// - [`ProcessError::Retryable`] when the table service is not writable
    /// - [`ProcessError::Propagated`] for any collaborator failure; rows
    ///   already appended for this request stay in place
    pub async fn process(
        &self,
        request: &ExportRequest,
    ) -> std::result::Result<ProcessOutcome, ProcessError> {
        let mut timer = RequestTimer::start(request);
        let app_id = request.app_id();

        if !self.table_service.is_writable().await? {
            return Err(ProcessError::Retryable(format!(
                "Table service is not writable, cannot export {request}"
            )));
        }
        timer.advance(Stage::LivenessChecked);

        let app = self.metadata.get_app(app_id).await?;
        timer.advance(Stage::AppFetched);
        if !app.export.is_enabled() {
            tracing::debug!(app_id = %app_id, "Export not enabled for app, skipping");
            timer.advance(Stage::NoOp);
            return Ok(ProcessOutcome::ExportDisabled);
        }

        let record = self
            .metadata
            .get_versioned_record(
                app_id,
                &request.health_code().lookup_key(),
                request.record_version(),
            )
            .await?;
        timer.advance(Stage::RecordFetched);

        let mut studies: HashMap<StudyId, StudyConfig> = HashMap::new();
        for study_id in record.study_ids() {
            let study = self.metadata.get_study(app_id, study_id).await?;
            studies.insert(study_id.clone(), study);
        }
        timer.advance(Stage::StudiesFetched);

        let destinations = resolve_destinations(&app, &studies, record.study_ids());
        timer.advance(Stage::DestinationsResolved);

        tracing::info!(
            app_id = %app_id,
            health_code = %request.health_code(),
            record_version = request.record_version(),
            destinations = destinations.len(),
            "Exporting participant version"
        );

        let mut anomalies = 0;
        for (index, destination) in destinations.iter().enumerate() {
            timer.advance(Stage::Exporting(index));
            if let ExportOutcome::Anomaly { .. } =
                self.exporter.export_row(destination, &record).await?
            {
                anomalies += 1;
            }
        }
        timer.advance(Stage::Done);

        Ok(ProcessOutcome::Exported {
            destinations: destinations.len(),
            anomalies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppId, HealthCode};

    #[test]
    fn test_timer_tracks_stage() {
        let request = ExportRequest::new(
            AppId::new("api").unwrap(),
            HealthCode::new("hc").unwrap(),
            2,
        )
        .unwrap();

        let mut timer = RequestTimer::start(&request);
        assert_eq!(timer.stage(), Stage::Received);
        timer.advance(Stage::Exporting(1));
        assert_eq!(timer.stage(), Stage::Exporting(1));
        assert!(!timer.stage().is_terminal());
        timer.advance(Stage::Done);
        assert!(timer.stage().is_terminal());
    }
}
