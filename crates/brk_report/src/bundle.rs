use std::fs;
use std::path::{Path, PathBuf};

use brk_core::dates::format_calendar_date;
use brk_core::error::AppError;
use brk_core::export::{write_export, ExportFileInfo, ExportFormat};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::Date;

use crate::model::TradeBreakRow;
use crate::source::local::{breaks_file_name, rows_on, summary_file_name};
use crate::summary::summarize;

pub const BUNDLE_MANIFEST_VERSION: u32 = 1;
pub const BUNDLE_MANIFEST_FILE: &str = "bundle_manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleFileInfo {
    pub filename: String,
    pub bytes: u64,
    pub sha256: String,
    pub row_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EodBundleManifest {
    pub manifest_version: u32,
    pub cob_date: String,
    pub format: ExportFormat,
    pub break_count: i64,
    pub files: Vec<BundleFileInfo>,
    /// SHA-256 over `filename:sha256` lines of `files`, in order.
    pub bundle_sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EodBundleResult {
    pub bundle_dir: String,
    pub manifest: EodBundleManifest,
}

fn bundle_digest(files: &[BundleFileInfo]) -> String {
    let mut hasher = Sha256::new();
    for f in files {
        hasher.update(f.filename.as_bytes());
        hasher.update(b":");
        hasher.update(f.sha256.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

fn file_info(name: String, info: ExportFileInfo) -> BundleFileInfo {
    BundleFileInfo {
        filename: name,
        bytes: info.bytes,
        sha256: info.sha256,
        row_count: info.row_count,
    }
}

/// Write the end-of-day bundle for `cob_date` into a new `EodBundle_<date>` folder under
/// `destination_dir`.
pub fn write_eod_bundle(
    rows: &[TradeBreakRow],
    cob_date: Date,
    destination_dir: &Path,
    format: ExportFormat,
) -> Result<EodBundleResult, AppError> {
    if !destination_dir.is_dir() {
        return Err(AppError::new(
            "REPORT_BUNDLE_DEST_NOT_DIR",
            "Bundle destination must be an existing directory",
        )
        .with_details(destination_dir.display().to_string()));
    }

    let cob = format_calendar_date(cob_date);
    let bundle_dir: PathBuf = destination_dir.join(format!("EodBundle_{cob}"));
    if bundle_dir.exists() {
        return Err(AppError::new(
            "REPORT_BUNDLE_DEST_EXISTS",
            "Bundle destination folder already exists",
        )
        .with_details(bundle_dir.display().to_string()));
    }
    fs::create_dir_all(&bundle_dir).map_err(|e| {
        AppError::new(
            "REPORT_BUNDLE_MKDIR_FAILED",
            "Failed to create bundle directory",
        )
        .with_details(format!("path={}: {}", bundle_dir.display(), e))
    })?;

    let day = rows_on(rows, cob_date);
    let summary_lines = summarize(&day).lines();

    let summary_name = summary_file_name(format);
    let breaks_name = breaks_file_name(format);
    let summary_info = write_export(&summary_lines, format, &bundle_dir.join(&summary_name))?;
    let breaks_info = write_export(&day, format, &bundle_dir.join(&breaks_name))?;

    let mut files = vec![
        file_info(summary_name, summary_info),
        file_info(breaks_name, breaks_info),
    ];
    files.sort_by(|a, b| a.filename.cmp(&b.filename));

    let manifest = EodBundleManifest {
        manifest_version: BUNDLE_MANIFEST_VERSION,
        cob_date: cob,
        format,
        break_count: day.len() as i64,
        bundle_sha256: bundle_digest(&files),
        files,
    };

    let manifest_path = bundle_dir.join(BUNDLE_MANIFEST_FILE);
    let manifest_json = serde_json::to_string_pretty(&manifest).map_err(|e| {
        AppError::new("REPORT_BUNDLE_ENCODE_FAILED", "Failed to encode bundle manifest")
            .with_details(e.to_string())
    })?;
    fs::write(&manifest_path, manifest_json.as_bytes()).map_err(|e| {
        AppError::new("REPORT_BUNDLE_WRITE_FAILED", "Failed to write bundle manifest")
            .with_details(format!("path={}: {}", manifest_path.display(), e))
    })?;

    tracing::info!(
        dir = %bundle_dir.display(),
        breaks = manifest.break_count,
        "wrote EOD bundle"
    );

    Ok(EodBundleResult {
        bundle_dir: bundle_dir.to_string_lossy().to_string(),
        manifest,
    })
}
