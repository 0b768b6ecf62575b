use brk_core::dates::format_calendar_date;
use brk_core::export::{CellValue, ExportFormat, TabularRow};
use brk_core::selection::DateRange;
use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Open,
    Closed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "Open",
            TradeStatus::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BreakCategory {
    Settlement,
    Valuation,
    MissingTrade,
}

impl BreakCategory {
    pub const ALL: [BreakCategory; 3] = [
        BreakCategory::Settlement,
        BreakCategory::Valuation,
        BreakCategory::MissingTrade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BreakCategory::Settlement => "Settlement",
            BreakCategory::Valuation => "Valuation",
            BreakCategory::MissingTrade => "Missing Trade",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceName {
    Oms,
    Custodian,
    InternalLedger,
}

impl SourceName {
    pub const ALL: [SourceName; 3] = [SourceName::Oms, SourceName::Custodian, SourceName::InternalLedger];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Oms => "OMS",
            SourceName::Custodian => "Custodian",
            SourceName::InternalLedger => "Internal Ledger",
        }
    }
}

/// One reconciliation break between a trade source and the books.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeBreakRow {
    pub break_id: String,
    #[serde(with = "brk_core::dates::ymd")]
    pub business_date: Date,
    pub status: TradeStatus,
    pub break_category: BreakCategory,
    pub source_name: SourceName,
    pub ageing_days: u32,
    #[serde(default)]
    pub comment: Option<String>,
}

impl TradeBreakRow {
    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// Empty lists mean "no restriction".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeBreakFilter {
    pub business_dates: DateRange,
    #[serde(default)]
    pub statuses: Vec<TradeStatus>,
    #[serde(default)]
    pub break_categories: Vec<BreakCategory>,
    #[serde(default)]
    pub source_names: Vec<SourceName>,
}

impl TradeBreakFilter {
    pub fn matches(&self, row: &TradeBreakRow) -> bool {
        fn allowed<T: PartialEq>(list: &[T], value: &T) -> bool {
            list.is_empty() || list.contains(value)
        }

        self.business_dates.contains(row.business_date)
            && allowed(&self.statuses, &row.status)
            && allowed(&self.break_categories, &row.break_category)
            && allowed(&self.source_names, &row.source_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EodBundleFilter {
    #[serde(with = "brk_core::dates::ymd")]
    pub cob_date: Date,
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparisonFilter {
    #[serde(with = "brk_core::dates::ymd")]
    pub date1: Date,
    #[serde(with = "brk_core::dates::ymd")]
    pub date2: Date,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    TradeBreak,
    EodBundle,
    Comparison,
}

impl ReportKind {
    /// Path segment under `/reports/`.
    pub fn path(&self) -> &'static str {
        match self {
            ReportKind::TradeBreak => "trade-break",
            ReportKind::EodBundle => "eod-bundle",
            ReportKind::Comparison => "comparison",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "filter", rename_all = "snake_case")]
pub enum ReportRequest {
    TradeBreak(TradeBreakFilter),
    EodBundle(EodBundleFilter),
    Comparison(ComparisonFilter),
}

impl ReportRequest {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRequest::TradeBreak(_) => ReportKind::TradeBreak,
            ReportRequest::EodBundle(_) => ReportKind::EodBundle,
            ReportRequest::Comparison(_) => ReportKind::Comparison,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EodBundleFile {
    pub file_name: String,
    pub row_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparisonRow {
    pub break_category: BreakCategory,
    pub date1_count: i64,
    pub date2_count: i64,
    /// `date2_count - date1_count`.
    pub delta: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "rows", rename_all = "snake_case")]
pub enum ReportRows {
    TradeBreak(Vec<TradeBreakRow>),
    EodBundle(Vec<EodBundleFile>),
    Comparison(Vec<ComparisonRow>),
}

impl ReportRows {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRows::TradeBreak(_) => ReportKind::TradeBreak,
            ReportRows::EodBundle(_) => ReportKind::EodBundle,
            ReportRows::Comparison(_) => ReportKind::Comparison,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportRows::TradeBreak(rows) => rows.len(),
            ReportRows::EodBundle(rows) => rows.len(),
            ReportRows::Comparison(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TabularRow for TradeBreakRow {
    fn sheet_name() -> &'static str {
        "Trade Breaks"
    }

    fn headers() -> Vec<&'static str> {
        vec![
            "Break ID",
            "Business Date",
            "Status",
            "Break Category",
            "Source",
            "Ageing (days)",
            "Comment",
        ]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.break_id.as_str().into(),
            format_calendar_date(self.business_date).into(),
            self.status.as_str().into(),
            self.break_category.as_str().into(),
            self.source_name.as_str().into(),
            CellValue::Integer(i64::from(self.ageing_days)),
            self.comment.clone().unwrap_or_default().into(),
        ]
    }
}

impl TabularRow for EodBundleFile {
    fn sheet_name() -> &'static str {
        "EOD Bundle"
    }

    fn headers() -> Vec<&'static str> {
        vec!["File", "Rows"]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![self.file_name.as_str().into(), CellValue::Integer(self.row_count)]
    }
}

impl TabularRow for ComparisonRow {
    fn sheet_name() -> &'static str {
        "Comparison"
    }

    fn headers() -> Vec<&'static str> {
        vec!["Break Category", "Date 1", "Date 2", "Delta"]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.break_category.as_str().into(),
            CellValue::Integer(self.date1_count),
            CellValue::Integer(self.date2_count),
            CellValue::Integer(self.delta),
        ]
    }
}
