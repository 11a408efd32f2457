//! Out-of-core collaborators: the append-only transaction log and the
//! cumulative sales report. Both are best-effort sinks; their I/O failures
//! are logged and never surface into the purchase path.

mod audit_log;
mod sales_report;

pub use audit_log::AuditLog;
pub use sales_report::{SalesReport, SharedSalesReport};
