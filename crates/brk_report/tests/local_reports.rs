use brk_core::export::ExportFormat;
use brk_core::selection::DateRange;
use brk_report::demo::generate_demo_trade_breaks;
use brk_report::model::{
    BreakCategory, ComparisonFilter, EodBundleFilter, ReportKind, ReportRequest, ReportRows,
    SourceName, TradeBreakFilter, TradeStatus,
};
use brk_report::source::{LocalReportSource, ReportSource};
use brk_report::summary::summarize;
use pretty_assertions::assert_eq;
use time::macros::date;

const TODAY: time::Date = date!(2024 - 06 - 28);

fn source() -> LocalReportSource {
    LocalReportSource::new(generate_demo_trade_breaks(TODAY, 10, 17))
}

#[test]
fn empty_trade_filter_returns_everything_in_range() {
    let source = source();
    let range = DateRange::new(date!(2024 - 06 - 25), TODAY).expect("range");
    let request = ReportRequest::TradeBreak(TradeBreakFilter {
        business_dates: range,
        statuses: Vec::new(),
        break_categories: Vec::new(),
        source_names: Vec::new(),
    });

    let ReportRows::TradeBreak(rows) = source.fetch(&request).expect("fetch") else {
        panic!("expected trade break rows");
    };
    let expected = source
        .rows()
        .iter()
        .filter(|r| range.contains(r.business_date))
        .count();
    assert_eq!(rows.len(), expected);
    assert!(!rows.is_empty());
}

#[test]
fn trade_filter_applies_every_list() {
    let source = source();
    let request = ReportRequest::TradeBreak(TradeBreakFilter {
        business_dates: DateRange::new(date!(2024 - 06 - 19), TODAY).expect("range"),
        statuses: vec![TradeStatus::Open],
        break_categories: vec![BreakCategory::Settlement, BreakCategory::MissingTrade],
        source_names: vec![SourceName::Custodian],
    });

    let ReportRows::TradeBreak(rows) = source.fetch(&request).expect("fetch") else {
        panic!("expected trade break rows");
    };
    assert!(rows.iter().all(|r| r.status == TradeStatus::Open
        && r.break_category != BreakCategory::Valuation
        && r.source_name == SourceName::Custodian));
}

#[test]
fn comparison_lists_all_categories_with_delta() {
    let source = source();
    let request = ReportRequest::Comparison(ComparisonFilter {
        date1: date!(2024 - 06 - 27),
        date2: TODAY,
    });

    let ReportRows::Comparison(rows) = source.fetch(&request).expect("fetch") else {
        panic!("expected comparison rows");
    };
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter().map(|r| r.break_category).collect::<Vec<_>>(),
        BreakCategory::ALL.to_vec()
    );

    let on_today = source.rows().iter().filter(|r| r.business_date == TODAY).count() as i64;
    assert_eq!(rows.iter().map(|r| r.date2_count).sum::<i64>(), on_today);
    for r in &rows {
        assert_eq!(r.delta, r.date2_count - r.date1_count);
    }
}

#[test]
fn eod_bundle_preview_lists_summary_and_breaks() {
    let source = source();
    let request = ReportRequest::EodBundle(EodBundleFilter {
        cob_date: TODAY,
        format: ExportFormat::Xlsx,
    });

    let rows = source.fetch(&request).expect("fetch");
    assert_eq!(rows.kind(), ReportKind::EodBundle);
    let ReportRows::EodBundle(files) = rows else {
        panic!("expected bundle files");
    };

    let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["summary.xlsx", "breaks.xlsx"]);
    let on_today = source.rows().iter().filter(|r| r.business_date == TODAY).count() as i64;
    assert_eq!(files[1].row_count, on_today);
}

#[test]
fn request_json_is_tagged_by_type() {
    let json = r#"{"type":"eod_bundle","filter":{"cob_date":"2024-06-28"}}"#;
    let request: ReportRequest = serde_json::from_str(json).expect("request");
    assert_eq!(
        request,
        ReportRequest::EodBundle(EodBundleFilter {
            cob_date: TODAY,
            format: ExportFormat::Csv,
        })
    );
    assert_eq!(request.kind().path(), "eod-bundle");
}

#[test]
fn demo_trade_breaks_are_seeded() {
    let a = generate_demo_trade_breaks(TODAY, 5, 1);
    let b = generate_demo_trade_breaks(TODAY, 5, 1);
    assert_eq!(a, b);
    assert_eq!(a[0].business_date, TODAY);

    let summary = summarize(&a);
    assert_eq!(summary.open + summary.closed, summary.total_breaks);
    assert!(summary.aged_breaks <= summary.open);
}
