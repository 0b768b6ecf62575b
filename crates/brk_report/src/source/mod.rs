use brk_core::error::AppError;

use crate::model::{ReportRequest, ReportRows};

/// Anything that can answer a report request.
pub trait ReportSource {
    fn fetch(&self, request: &ReportRequest) -> Result<ReportRows, AppError>;
}

pub mod http;
pub mod local;

pub use http::HttpReportSource;
pub use local::{run_report, LocalReportSource};
