use brk_core::analytics::breakdown_by_assignee;
use brk_core::demo::generate_demo_breaks;
use brk_core::domain::DashboardVariant;
use brk_core::export::{export_rows, sha256_hex, write_export, ExportFormat};
use brk_core::settings::default_assignee_colors;
use pretty_assertions::assert_eq;
use time::macros::date;

#[test]
fn assignee_csv_has_header_and_one_line_per_assignee() {
    let records = generate_demo_breaks(date!(2024 - 06 - 30), DashboardVariant::Extended, 1);
    let all: Vec<_> = records.iter().collect();
    let rows = breakdown_by_assignee(&all, &default_assignee_colors());

    let text = String::from_utf8(export_rows(&rows, ExportFormat::Csv).expect("csv")).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Assignee,Open Breaks,Resolved,In Progress,Total");
    assert_eq!(lines.len(), rows.len() + 1);
    let first = &rows[0];
    assert_eq!(
        lines[1],
        format!(
            "{},{},{},{},{}",
            first.name, first.open, first.resolved, first.in_progress, first.total
        )
    );
}

#[test]
fn xlsx_export_is_a_zip_container() {
    let records = generate_demo_breaks(date!(2024 - 06 - 30), DashboardVariant::Basic, 2);
    let bytes = export_rows(&records[..10], ExportFormat::Xlsx).expect("xlsx");
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn write_export_reports_hash_and_refuses_overwrite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("breaks.csv");
    let records = generate_demo_breaks(date!(2024 - 06 - 30), DashboardVariant::Extended, 3);

    let info = write_export(&records, ExportFormat::Csv, &path).expect("write");
    let on_disk = std::fs::read(&path).expect("read back");

    assert_eq!(info.bytes, on_disk.len() as u64);
    assert_eq!(info.sha256, sha256_hex(&on_disk));
    assert_eq!(info.row_count, records.len() as i64);

    let err = write_export(&records, ExportFormat::Csv, &path).unwrap_err();
    assert_eq!(err.code, "EXPORT_DEST_EXISTS");
    assert_eq!(std::fs::read(&path).expect("unchanged"), on_disk);
}

#[test]
fn export_format_extensions() {
    assert_eq!(ExportFormat::Csv.extension(), "csv");
    assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
    assert_eq!(
        serde_json::from_str::<ExportFormat>("\"xlsx\"").expect("format"),
        ExportFormat::Xlsx
    );
}
