//! Row export executor
//!
//! Builds one row per destination and appends it as a single-row batch.

use crate::adapters::rows::RowBuilder;
use crate::adapters::warehouse::TableService;
use crate::domain::{Destination, Result, VersionedRecord};
use crate::log_row_count_anomaly;
use std::sync::Arc;

/// Result of exporting to one destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Exactly one row was created
    Appended,
    /// The append succeeded but reported a different row count
    Anomaly { row_count: usize },
}

impl ExportOutcome {
    pub fn is_anomaly(&self) -> bool {
        matches!(self, ExportOutcome::Anomaly { .. })
    }
}

/// Exports a participant version to a single destination table
#[derive(Clone)]
pub struct RowExporter {
    row_builder: Arc<dyn RowBuilder>,
    table_service: Arc<dyn TableService>,
}

impl RowExporter {
    pub fn new(row_builder: Arc<dyn RowBuilder>, table_service: Arc<dyn TableService>) -> Self {
        Self {
            row_builder,
            table_service,
        }
    }

    /// Builds and appends one row
    ///
    /// A row count other than 1 is logged and reported as
    /// [`ExportOutcome::Anomaly`], not as an error: the append call returning
    /// is what counts. Builder and append failures are returned unchanged.
    pub async fn export_row(
        &self,
        destination: &Destination,
        record: &VersionedRecord,
    ) -> Result<ExportOutcome> {
        let row = self.row_builder.build_row(
            destination.study_id.as_ref(),
            &destination.table_id,
            record,
        )?;

        let row_count = self
            .table_service
            .append_rows(&destination.table_id, vec![row])
            .await?;

        if row_count != 1 {
            log_row_count_anomaly!(
                destination.table_id,
                record.app_id,
                record.health_code,
                record.record_version,
                row_count
            );
            return Ok(ExportOutcome::Anomaly { row_count });
        }

        tracing::debug!(
            destination = %destination,
            app_id = %record.app_id,
            health_code = %record.health_code,
            record_version = record.record_version,
            "Appended participant version row"
        );

        Ok(ExportOutcome::Appended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppId, HealthCode, StudyId, TableId, TableRow, WarehouseError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingBuilder {
        calls: Mutex<Vec<Option<String>>>,
    }

    impl RowBuilder for CapturingBuilder {
        fn build_row(
            &self,
            study_id: Option<&StudyId>,
            _table_id: &TableId,
            _record: &VersionedRecord,
        ) -> Result<TableRow> {
            self.calls
                .lock()
                .unwrap()
                .push(study_id.map(|s| s.to_string()));
            let mut row = TableRow::new();
            row.set("healthCode", "hc");
            Ok(row)
        }
    }

    struct FixedCountTable {
        count: Option<usize>,
        batches: Mutex<Vec<(String, usize)>>,
    }

    impl FixedCountTable {
        fn new(count: Option<usize>) -> Self {
            Self {
                count,
                batches: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TableService for FixedCountTable {
        async fn is_writable(&self) -> Result<bool> {
            Ok(true)
        }

        async fn append_rows(&self, table_id: &TableId, rows: Vec<TableRow>) -> Result<usize> {
            self.batches
                .lock()
                .unwrap()
                .push((table_id.to_string(), rows.len()));
            self.count.ok_or_else(|| {
                WarehouseError::AppendFailed {
                    table_id: table_id.to_string(),
                    message: "rejected".to_string(),
                }
                .into()
            })
        }
    }

    fn record() -> VersionedRecord {
        VersionedRecord::new(
            AppId::new("api").unwrap(),
            HealthCode::new("hc").unwrap(),
            1,
        )
    }

    fn study_destination() -> Destination {
        Destination::for_study(
            StudyId::new("studyA").unwrap(),
            TableId::new("T_A").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_single_row_batch() {
        let builder = Arc::new(CapturingBuilder::default());
        let table = Arc::new(FixedCountTable::new(Some(1)));
        let exporter = RowExporter::new(builder.clone(), table.clone());

        let outcome = exporter
            .export_row(&study_destination(), &record())
            .await
            .unwrap();

        assert_eq!(outcome, ExportOutcome::Appended);
        assert_eq!(*builder.calls.lock().unwrap(), vec![Some("studyA".to_string())]);
        assert_eq!(
            *table.batches.lock().unwrap(),
            vec![("T_A".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_row_count_mismatch_is_anomaly() {
        for count in [0, 2] {
            let exporter = RowExporter::new(
                Arc::new(CapturingBuilder::default()),
                Arc::new(FixedCountTable::new(Some(count))),
            );
            let outcome = exporter
                .export_row(&study_destination(), &record())
                .await
                .unwrap();
            assert_eq!(outcome, ExportOutcome::Anomaly { row_count: count });
            assert!(outcome.is_anomaly());
        }
    }

    #[tokio::test]
    async fn test_append_failure_propagates() {
        let exporter = RowExporter::new(
            Arc::new(CapturingBuilder::default()),
            Arc::new(FixedCountTable::new(None)),
        );
        let err = exporter
            .export_row(&study_destination(), &record())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::domain::WorkerError::Warehouse(WarehouseError::AppendFailed { .. })
        ));
    }
}
