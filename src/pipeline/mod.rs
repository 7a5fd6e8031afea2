pub mod export;

pub use export::{export_assets, run_export_job, ExportOptions, ExportSummary};
