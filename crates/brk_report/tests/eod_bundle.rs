use brk_core::export::{sha256_hex, ExportFormat};
use brk_report::bundle::{write_eod_bundle, EodBundleManifest, BUNDLE_MANIFEST_FILE};
use brk_report::demo::generate_demo_trade_breaks;
use pretty_assertions::assert_eq;
use time::macros::date;

#[test]
fn bundle_writes_files_and_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cob = date!(2024 - 06 - 28);
    let rows = generate_demo_trade_breaks(cob, 3, 8);

    let result = write_eod_bundle(&rows, cob, dir.path(), ExportFormat::Csv).expect("bundle");
    let bundle_dir = dir.path().join("EodBundle_2024-06-28");
    assert_eq!(result.bundle_dir, bundle_dir.to_string_lossy());

    let manifest_text = std::fs::read_to_string(bundle_dir.join(BUNDLE_MANIFEST_FILE)).expect("manifest");
    let manifest: EodBundleManifest = serde_json::from_str(&manifest_text).expect("manifest json");
    assert_eq!(manifest, result.manifest);
    assert_eq!(manifest.cob_date, "2024-06-28");

    let names: Vec<&str> = manifest.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["breaks.csv", "summary.csv"]);

    for file in &manifest.files {
        let bytes = std::fs::read(bundle_dir.join(&file.filename)).expect("file");
        assert_eq!(file.bytes, bytes.len() as u64);
        assert_eq!(file.sha256, sha256_hex(&bytes));
    }

    let on_cob = rows.iter().filter(|r| r.business_date == cob).count() as i64;
    assert_eq!(manifest.break_count, on_cob);
    let breaks_csv = std::fs::read_to_string(bundle_dir.join("breaks.csv")).expect("breaks");
    assert_eq!(breaks_csv.lines().count() as i64, on_cob + 1);
    assert_eq!(manifest.bundle_sha256.len(), 64);
}

#[test]
fn bundle_refuses_existing_folder() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cob = date!(2024 - 06 - 28);
    let rows = generate_demo_trade_breaks(cob, 1, 8);

    write_eod_bundle(&rows, cob, dir.path(), ExportFormat::Xlsx).expect("first");
    let err = write_eod_bundle(&rows, cob, dir.path(), ExportFormat::Xlsx).unwrap_err();
    assert_eq!(err.code, "REPORT_BUNDLE_DEST_EXISTS");
}

#[test]
fn bundle_requires_existing_destination() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    let err = write_eod_bundle(&[], date!(2024 - 06 - 28), &missing, ExportFormat::Csv).unwrap_err();
    assert_eq!(err.code, "REPORT_BUNDLE_DEST_NOT_DIR");
}
