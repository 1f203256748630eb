//! Reportes de batch: agregación de ejecuciones a tablas comparables.

mod context;
mod table;

pub use context::{BatchReport, ReportContext, TaskExecutionRecord};
pub use table::Table;
