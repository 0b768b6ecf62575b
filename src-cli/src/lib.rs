use std::fs;
use std::path::PathBuf;

use brk_core::analytics::breakdown_by_category;
use brk_core::dashboard::{build_dashboard, table_rows, DashboardPayload, DashboardQuery};
use brk_core::demo::generate_demo_breaks;
use brk_core::domain::BreakRecord;
use brk_core::error::AppError;
use brk_core::export::{write_export, ExportFileInfo, ExportFormat};
use brk_core::ingest::break_csv::{
    import_breaks_csv, preview_breaks_csv, BreakCsvMapping, BreakCsvPreview, BreakImportSummary,
};
use brk_core::range_selector::{RangeEvent, RangeSelector};
use brk_core::selection::{select_by_date_range, DateRange};
use brk_core::settings::DashboardSettings;
use brk_core::validate::{validate_all_records, RecordValidationReportItem};
use brk_report::bundle::{write_eod_bundle, EodBundleResult};
use brk_report::demo::generate_demo_trade_breaks;
use brk_report::model::{ReportRequest, ReportRows, TradeBreakFilter, TradeBreakRow};
use brk_report::source::{HttpReportSource, LocalReportSource, ReportSource};
use brk_report::summary::{summarize, ReportingSummary};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

pub mod config;
pub mod logging;

/// Business dates covered by the local demo report source.
pub const DEMO_REPORT_DAYS: u32 = 30;

pub const COMMANDS: [&str; 9] = [
    "dashboard",
    "range",
    "preview-csv",
    "import-csv",
    "validate",
    "export",
    "report",
    "report-summary",
    "eod-bundle",
];

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: DashboardSettings,
    pub report: config::ReportConfig,
    pub today: Date,
}

impl AppContext {
    pub fn new(settings: DashboardSettings, report: config::ReportConfig, today: Date) -> Self {
        Self {
            settings,
            report,
            today,
        }
    }

    pub fn from_config(cfg: &config::Config, today: Date) -> Self {
        Self::new(cfg.dashboard.clone(), cfg.report.clone(), today)
    }

    /// Break records from `csv_path` when given, otherwise the seeded demo set.
    fn load_records(&self, csv_path: Option<&str>) -> Result<Vec<BreakRecord>, AppError> {
        match csv_path {
            Some(path) => Ok(self.import_csv(path, &BreakCsvMapping::default())?.records),
            None => Ok(generate_demo_breaks(
                self.today,
                self.settings.variant,
                self.settings.demo_seed,
            )),
        }
    }

    fn import_csv(&self, path: &str, mapping: &BreakCsvMapping) -> Result<BreakImportSummary, AppError> {
        let text = read_text(path)?;
        import_breaks_csv(&text, mapping, self.settings.variant)
    }

    fn report_source(&self) -> Result<Box<dyn ReportSource>, AppError> {
        match &self.report.base_url {
            Some(base_url) => Ok(Box::new(HttpReportSource::new(
                base_url,
                self.report.timeout_ms,
            )?)),
            None => Ok(Box::new(LocalReportSource::new(generate_demo_trade_breaks(
                self.today,
                DEMO_REPORT_DAYS,
                self.settings.demo_seed,
            )))),
        }
    }

    fn trade_breaks(&self, filter: TradeBreakFilter) -> Result<Vec<TradeBreakRow>, AppError> {
        let request = ReportRequest::TradeBreak(filter);
        match self.report_source()?.fetch(&request)? {
            ReportRows::TradeBreak(rows) => Ok(rows),
            other => Err(AppError::new(
                "REPORT_KIND_MISMATCH",
                "Report response does not match the request",
            )
            .with_details(format!("received={:?}", other.kind()))),
        }
    }
}

fn read_text(path: &str) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| {
        AppError::new("CSV_READ_FAILED", "Failed to read CSV file")
            .with_details(format!("path={path}: {e}"))
    })
}

#[derive(Debug, Default, Deserialize)]
struct DashboardArgs {
    #[serde(default)]
    query: DashboardQuery,
    #[serde(default)]
    csv_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RangeArgs {
    #[serde(default)]
    events: Vec<RangeEvent>,
}

/// Selector state after replaying the events. A rejected event leaves the state as it was and
/// is reported in `notices`; later events still apply.
#[derive(Debug, Serialize)]
pub struct RangeResponse {
    #[serde(flatten)]
    pub selector: RangeSelector,
    pub notices: Vec<AppError>,
}

#[derive(Debug, Deserialize)]
struct PreviewCsvArgs {
    csv_path: String,
    #[serde(default = "default_preview_rows")]
    max_rows: usize,
}

fn default_preview_rows() -> usize {
    10
}

#[derive(Debug, Deserialize)]
struct ImportCsvArgs {
    csv_path: String,
    #[serde(default)]
    mapping: Option<BreakCsvMapping>,
}

#[derive(Debug, Serialize)]
pub struct ImportCsvResponse {
    pub summary: BreakImportSummary,
    pub validation: Vec<RecordValidationReportItem>,
}

#[derive(Debug, Default, Deserialize)]
struct ValidateArgs {
    #[serde(default)]
    csv_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ExportView {
    Breaks,
    Assignees,
    Categories,
}

#[derive(Debug, Deserialize)]
struct ExportArgs {
    view: ExportView,
    path: String,
    #[serde(default)]
    format: ExportFormat,
    #[serde(default)]
    query: DashboardQuery,
    #[serde(default)]
    csv_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExportTarget {
    path: String,
    #[serde(default)]
    format: ExportFormat,
}

#[derive(Debug, Deserialize)]
struct ReportArgs {
    request: ReportRequest,
    #[serde(default)]
    export: Option<ExportTarget>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub rows: ReportRows,
    pub export: Option<ExportFileInfo>,
}

#[derive(Debug, Deserialize)]
struct ReportSummaryArgs {
    filter: TradeBreakFilter,
}

#[derive(Debug, Deserialize)]
struct EodBundleArgs {
    #[serde(with = "brk_core::dates::ymd")]
    cob_date: Date,
    destination_dir: String,
    #[serde(default)]
    format: ExportFormat,
}

fn parse_args<T: DeserializeOwned>(command: &str, args: Value) -> Result<T, AppError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| {
        AppError::new("COMMAND_ARGS_INVALID", "Invalid command arguments")
            .with_details(format!("command={command}: {e}"))
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::wrap("COMMAND_ENCODE_FAILED", "Failed to encode command result", e))
}

fn dashboard(ctx: &AppContext, args: DashboardArgs) -> Result<DashboardPayload, AppError> {
    let records = ctx.load_records(args.csv_path.as_deref())?;
    Ok(build_dashboard(&records, &args.query, ctx.today, &ctx.settings))
}

fn range(ctx: &AppContext, args: RangeArgs) -> Result<RangeResponse, AppError> {
    let mut selector = RangeSelector::new(ctx.today);
    let mut notices = Vec::new();
    for event in &args.events {
        if let Err(err) = selector.handle(event, ctx.today) {
            tracing::warn!(code = %err.code, "range event rejected");
            notices.push(err);
        }
    }
    Ok(RangeResponse { selector, notices })
}

fn export(ctx: &AppContext, args: ExportArgs) -> Result<ExportFileInfo, AppError> {
    let records = ctx.load_records(args.csv_path.as_deref())?;
    let path = PathBuf::from(&args.path);

    match args.view {
        ExportView::Breaks => {
            let rows = table_rows(&records, &args.query, ctx.today);
            write_export(&rows, args.format, &path)
        }
        ExportView::Assignees => {
            let payload = build_dashboard(&records, &args.query, ctx.today, &ctx.settings);
            write_export(&payload.assignees, args.format, &path)
        }
        ExportView::Categories => {
            let range: DateRange = args.query.range.resolve(ctx.today);
            let in_range = select_by_date_range(&records, &range);
            write_export(&breakdown_by_category(&in_range), args.format, &path)
        }
    }
}

fn export_report_rows(rows: &ReportRows, target: &ExportTarget) -> Result<ExportFileInfo, AppError> {
    let path = PathBuf::from(&target.path);
    match rows {
        ReportRows::TradeBreak(r) => write_export(r, target.format, &path),
        ReportRows::EodBundle(r) => write_export(r, target.format, &path),
        ReportRows::Comparison(r) => write_export(r, target.format, &path),
    }
}

fn report(ctx: &AppContext, args: ReportArgs) -> Result<ReportResponse, AppError> {
    let rows = ctx.report_source()?.fetch(&args.request)?;
    let export = match &args.export {
        Some(target) => Some(export_report_rows(&rows, target)?),
        None => None,
    };
    Ok(ReportResponse { rows, export })
}

fn report_summary(ctx: &AppContext, args: ReportSummaryArgs) -> Result<ReportingSummary, AppError> {
    let rows = ctx.trade_breaks(args.filter)?;
    Ok(summarize(&rows))
}

fn eod_bundle(ctx: &AppContext, args: EodBundleArgs) -> Result<EodBundleResult, AppError> {
    let rows = ctx.trade_breaks(TradeBreakFilter {
        business_dates: DateRange::single_day(args.cob_date),
        statuses: Vec::new(),
        break_categories: Vec::new(),
        source_names: Vec::new(),
    })?;
    write_eod_bundle(
        &rows,
        args.cob_date,
        &PathBuf::from(&args.destination_dir),
        args.format,
    )
}

/// Dispatch one host command. `args` is the command's JSON argument object (`null` means none).
pub fn run_command(ctx: &AppContext, command: &str, args: Value) -> Result<Value, AppError> {
    tracing::debug!(command, "running command");
    match command {
        "dashboard" => to_json(&dashboard(ctx, parse_args(command, args)?)?),
        "range" => to_json(&range(ctx, parse_args(command, args)?)?),
        "preview-csv" => {
            let args: PreviewCsvArgs = parse_args(command, args)?;
            let preview: BreakCsvPreview = preview_breaks_csv(&read_text(&args.csv_path)?, args.max_rows)?;
            to_json(&preview)
        }
        "import-csv" => {
            let args: ImportCsvArgs = parse_args(command, args)?;
            let mapping = args.mapping.unwrap_or_default();
            let summary = ctx.import_csv(&args.csv_path, &mapping)?;
            let validation = validate_all_records(&summary.records, ctx.settings.variant);
            to_json(&ImportCsvResponse {
                summary,
                validation,
            })
        }
        "validate" => {
            let args: ValidateArgs = parse_args(command, args)?;
            let records = ctx.load_records(args.csv_path.as_deref())?;
            to_json(&validate_all_records(&records, ctx.settings.variant))
        }
        "export" => to_json(&export(ctx, parse_args(command, args)?)?),
        "report" => to_json(&report(ctx, parse_args(command, args)?)?),
        "report-summary" => to_json(&report_summary(ctx, parse_args(command, args)?)?),
        "eod-bundle" => to_json(&eod_bundle(ctx, parse_args(command, args)?)?),
        other => Err(AppError::new("COMMAND_UNKNOWN", "Unknown command")
            .with_details(format!("command={other}; known={}", COMMANDS.join(",")))),
    }
}
