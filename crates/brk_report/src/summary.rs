use brk_core::export::{CellValue, TabularRow};
use brk_core::kpi::{rounded_percent, DEFAULT_AGED_THRESHOLD_DAYS};
use serde::{Deserialize, Serialize};

use crate::model::{TradeBreakRow, TradeStatus};

/// Headline tiles of the reporting screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportingSummary {
    pub total_breaks: i64,
    /// Open breaks older than five days.
    pub aged_breaks: i64,
    pub open: i64,
    pub closed: i64,
    pub commented: i64,
    pub resolved_percent: i64,
}

pub fn summarize(rows: &[TradeBreakRow]) -> ReportingSummary {
    let mut summary = ReportingSummary {
        total_breaks: rows.len() as i64,
        ..ReportingSummary::default()
    };

    for row in rows {
        match row.status {
            TradeStatus::Open => {
                summary.open += 1;
                if row.ageing_days > DEFAULT_AGED_THRESHOLD_DAYS {
                    summary.aged_breaks += 1;
                }
            }
            TradeStatus::Closed => summary.closed += 1,
        }
        if row.has_comment() {
            summary.commented += 1;
        }
    }

    summary.resolved_percent = rounded_percent(summary.closed, summary.open + summary.closed);
    summary
}

/// One metric of a summary rendered as a two-column sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryLine {
    pub metric: String,
    pub value: i64,
}

impl ReportingSummary {
    pub fn lines(&self) -> Vec<SummaryLine> {
        [
            ("Total Breaks", self.total_breaks),
            ("Aged Breaks", self.aged_breaks),
            ("Open", self.open),
            ("Closed", self.closed),
            ("Commented", self.commented),
            ("Resolved %", self.resolved_percent),
        ]
        .into_iter()
        .map(|(metric, value)| SummaryLine {
            metric: metric.to_string(),
            value,
        })
        .collect()
    }
}

impl TabularRow for SummaryLine {
    fn sheet_name() -> &'static str {
        "Summary"
    }

    fn headers() -> Vec<&'static str> {
        vec!["Metric", "Value"]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![self.metric.as_str().into(), CellValue::Integer(self.value)]
    }
}
