//! Recording fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use pvexport::adapters::metadata::MetadataService;
use pvexport::adapters::rows::{RecordRowBuilder, RowBuilder};
use pvexport::adapters::warehouse::TableService;
use pvexport::core::export::ExportPipeline;
use pvexport::domain::{
    AppConfig, AppId, ExportSettings, HealthCode, MetadataError, Result, StudyConfig, StudyId,
    TableId, TableRow, VersionedRecord, WarehouseError,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const APP: &str = "api";
pub const HEALTH_CODE: &str = "hc-1234";

/// Ordered log of every collaborator call
#[derive(Default)]
pub struct CallLog(Mutex<Vec<String>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

pub fn app_id() -> AppId {
    AppId::new(APP).unwrap()
}

pub fn study_id(id: &str) -> StudyId {
    StudyId::new(id).unwrap()
}

pub fn table_id(id: &str) -> TableId {
    TableId::new(id).unwrap()
}

pub fn app_config(enabled: Option<bool>, table: Option<&str>) -> AppConfig {
    AppConfig::new(app_id(), ExportSettings::new(enabled, table))
}

pub fn study_config(id: &str, enabled: Option<bool>, table: Option<&str>) -> StudyConfig {
    StudyConfig::new(study_id(id), ExportSettings::new(enabled, table))
}

pub fn record(version: u32, memberships: &[(&str, &str)]) -> VersionedRecord {
    memberships.iter().fold(
        VersionedRecord::new(app_id(), HealthCode::new(HEALTH_CODE).unwrap(), version),
        |record, (study, ext)| record.with_membership(study_id(study), *ext),
    )
}

pub fn event(version: u32) -> String {
    format!(
        r#"{{"applicationId":"{APP}","subjectHealthCode":"{HEALTH_CODE}","recordVersion":{version}}}"#
    )
}

/// Metadata service serving fixed configuration
///
/// Studies without an entry come back unconfigured.
pub struct FakeMetadata {
    pub log: Arc<CallLog>,
    pub app: AppConfig,
    pub studies: HashMap<StudyId, StudyConfig>,
    pub record: VersionedRecord,
    pub fail_record_fetch: bool,
}

impl FakeMetadata {
    pub fn new(log: Arc<CallLog>, app: AppConfig, record: VersionedRecord) -> Self {
        Self {
            log,
            app,
            studies: HashMap::new(),
            record,
            fail_record_fetch: false,
        }
    }

    pub fn with_study(mut self, study: StudyConfig) -> Self {
        self.studies.insert(study.study_id.clone(), study);
        self
    }
}

#[async_trait]
impl MetadataService for FakeMetadata {
    async fn get_app(&self, app_id: &AppId) -> Result<AppConfig> {
        self.log.push(format!("get_app:{app_id}"));
        Ok(self.app.clone())
    }

    async fn get_study(&self, _app_id: &AppId, study_id: &StudyId) -> Result<StudyConfig> {
        self.log.push(format!("get_study:{study_id}"));
        Ok(self
            .studies
            .get(study_id)
            .cloned()
            .unwrap_or_else(|| StudyConfig::new(study_id.clone(), ExportSettings::default())))
    }

    async fn get_versioned_record(
        &self,
        _app_id: &AppId,
        key: &str,
        record_version: u32,
    ) -> Result<VersionedRecord> {
        self.log.push(format!("get_record:{key}:{record_version}"));
        if self.fail_record_fetch {
            return Err(MetadataError::ServerError {
                status: 503,
                message: "unavailable".to_string(),
            }
            .into());
        }
        Ok(self.record.clone())
    }
}

/// Table service that records appends
///
/// Row counts come from `row_counts` in call order, defaulting to the number
/// of rows sent.
pub struct FakeTables {
    pub log: Arc<CallLog>,
    pub writable: bool,
    pub row_counts: Mutex<VecDeque<usize>>,
    pub fail_table: Option<TableId>,
    pub appends: Mutex<Vec<(TableId, Vec<TableRow>)>>,
}

impl FakeTables {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            writable: true,
            row_counts: Mutex::new(VecDeque::new()),
            fail_table: None,
            appends: Mutex::new(Vec::new()),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn with_row_counts(self, counts: &[usize]) -> Self {
        *self.row_counts.lock().unwrap() = counts.iter().copied().collect();
        self
    }

    pub fn failing_on(mut self, table: &str) -> Self {
        self.fail_table = Some(table_id(table));
        self
    }

    pub fn appended_tables(&self) -> Vec<String> {
        self.appends
            .lock()
            .unwrap()
            .iter()
            .map(|(table, _)| table.to_string())
            .collect()
    }
}

#[async_trait]
impl TableService for FakeTables {
    async fn is_writable(&self) -> Result<bool> {
        self.log.push("is_writable");
        Ok(self.writable)
    }

    async fn append_rows(&self, table_id: &TableId, rows: Vec<TableRow>) -> Result<usize> {
        self.log.push(format!("append:{table_id}"));
        if self.fail_table.as_ref() == Some(table_id) {
            return Err(WarehouseError::AppendFailed {
                table_id: table_id.to_string(),
                message: "quota exceeded".to_string(),
            }
            .into());
        }
        let sent = rows.len();
        self.appends.lock().unwrap().push((table_id.clone(), rows));
        Ok(self.row_counts.lock().unwrap().pop_front().unwrap_or(sent))
    }
}

/// Row builder that records every invocation and delegates to the real one
#[derive(Default)]
pub struct RecordingRowBuilder {
    pub calls: Mutex<Vec<(Option<StudyId>, TableId, VersionedRecord)>>,
}

impl RowBuilder for RecordingRowBuilder {
    fn build_row(
        &self,
        study_id: Option<&StudyId>,
        table_id: &TableId,
        record: &VersionedRecord,
    ) -> Result<TableRow> {
        self.calls
            .lock()
            .unwrap()
            .push((study_id.cloned(), table_id.clone(), record.clone()));
        RecordRowBuilder::new().build_row(study_id, table_id, record)
    }
}

/// Fakes wired into a pipeline, kept for assertions
pub struct Harness {
    pub log: Arc<CallLog>,
    pub metadata: Arc<FakeMetadata>,
    pub tables: Arc<FakeTables>,
    pub rows: Arc<RecordingRowBuilder>,
    pub pipeline: ExportPipeline,
}

impl Harness {
    pub fn new(
        log: Arc<CallLog>,
        metadata: FakeMetadata,
        tables: FakeTables,
    ) -> Self {
        let metadata = Arc::new(metadata);
        let tables = Arc::new(tables);
        let rows = Arc::new(RecordingRowBuilder::default());
        let pipeline = ExportPipeline::new(metadata.clone(), rows.clone(), tables.clone());
        Self {
            log,
            metadata,
            tables,
            rows,
            pipeline,
        }
    }
}

/// Plain-text log output captured by a thread-local subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Captures everything logged on this thread until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
