//! Table service trait definition

use crate::domain::{Result, TableId, TableRow};
use async_trait::async_trait;

/// Append access to warehouse tables
///
/// Each append is a single remote call. Repeating an append writes the rows
/// again; callers must tolerate duplicates on redelivery.
#[async_trait]
pub trait TableService: Send + Sync {
    /// Whether the service currently accepts writes
    async fn is_writable(&self) -> Result<bool>;

    /// Appends rows to a table and returns how many rows were created
    async fn append_rows(&self, table_id: &TableId, rows: Vec<TableRow>) -> Result<usize>;
}
