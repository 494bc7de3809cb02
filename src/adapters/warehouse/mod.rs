//! Warehouse table service adapter
//!
//! Liveness check and row appends against the data warehouse.

pub mod client;
pub mod models;
pub mod traits;

pub use client::RestTableClient;
pub use models::{AppendRowsResponse, RowReference, ServiceStatus, StatusResponse};
pub use traits::TableService;
