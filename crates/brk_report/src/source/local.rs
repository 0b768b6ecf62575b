use brk_core::error::AppError;
use brk_core::export::ExportFormat;
use time::Date;

use super::ReportSource;
use crate::model::{
    BreakCategory, ComparisonFilter, ComparisonRow, EodBundleFile, ReportRequest, ReportRows,
    TradeBreakFilter, TradeBreakRow,
};
use crate::summary::summarize;

/// Serves reports from an in-memory trade-break set.
#[derive(Debug, Clone)]
pub struct LocalReportSource {
    rows: Vec<TradeBreakRow>,
}

impl LocalReportSource {
    pub fn new(rows: Vec<TradeBreakRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TradeBreakRow] {
        &self.rows
    }
}

impl ReportSource for LocalReportSource {
    fn fetch(&self, request: &ReportRequest) -> Result<ReportRows, AppError> {
        let rows = run_report(&self.rows, request);
        tracing::info!(kind = ?request.kind(), rows = rows.len(), "served local report");
        Ok(rows)
    }
}

pub fn run_report(rows: &[TradeBreakRow], request: &ReportRequest) -> ReportRows {
    match request {
        ReportRequest::TradeBreak(filter) => ReportRows::TradeBreak(trade_breaks(rows, filter)),
        ReportRequest::EodBundle(filter) => {
            ReportRows::EodBundle(eod_bundle_contents(rows, filter.cob_date, filter.format))
        }
        ReportRequest::Comparison(filter) => ReportRows::Comparison(compare_dates(rows, filter)),
    }
}

fn trade_breaks(rows: &[TradeBreakRow], filter: &TradeBreakFilter) -> Vec<TradeBreakRow> {
    rows.iter().filter(|r| filter.matches(r)).cloned().collect()
}

pub(crate) fn rows_on(rows: &[TradeBreakRow], cob_date: Date) -> Vec<TradeBreakRow> {
    rows.iter()
        .filter(|r| r.business_date == cob_date)
        .cloned()
        .collect()
}

pub(crate) fn summary_file_name(format: ExportFormat) -> String {
    format!("summary.{}", format.extension())
}

pub(crate) fn breaks_file_name(format: ExportFormat) -> String {
    format!("breaks.{}", format.extension())
}

/// Files an end-of-day bundle for `cob_date` would contain.
pub fn eod_bundle_contents(rows: &[TradeBreakRow], cob_date: Date, format: ExportFormat) -> Vec<EodBundleFile> {
    let day = rows_on(rows, cob_date);
    vec![
        EodBundleFile {
            file_name: summary_file_name(format),
            row_count: summarize(&day).lines().len() as i64,
        },
        EodBundleFile {
            file_name: breaks_file_name(format),
            row_count: day.len() as i64,
        },
    ]
}

/// Break counts per category on two business dates. Every category is listed, even at zero.
pub fn compare_dates(rows: &[TradeBreakRow], filter: &ComparisonFilter) -> Vec<ComparisonRow> {
    let count = |date: Date, category: BreakCategory| {
        rows.iter()
            .filter(|r| r.business_date == date && r.break_category == category)
            .count() as i64
    };

    BreakCategory::ALL
        .into_iter()
        .map(|category| {
            let date1_count = count(filter.date1, category);
            let date2_count = count(filter.date2, category);
            ComparisonRow {
                break_category: category,
                date1_count,
                date2_count,
                delta: date2_count - date1_count,
            }
        })
        .collect()
}
