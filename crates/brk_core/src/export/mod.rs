use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::analytics::{AssigneeBreakdown, CategoryCount};
use crate::dates::format_calendar_date;
use crate::domain::BreakRecord;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl CellValue {
    fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(v) => v.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// A row that can be materialized into a spreadsheet.
pub trait TabularRow {
    fn sheet_name() -> &'static str;
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<CellValue>;
}

impl<R: TabularRow> TabularRow for &R {
    fn sheet_name() -> &'static str {
        R::sheet_name()
    }

    fn headers() -> Vec<&'static str> {
        R::headers()
    }

    fn cells(&self) -> Vec<CellValue> {
        (**self).cells()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportFileInfo {
    pub path: String,
    pub bytes: u64,
    pub sha256: String,
    pub row_count: i64,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn to_csv<R: TabularRow>(rows: &[R]) -> Result<Vec<u8>, AppError> {
    let encode_err = |e: csv::Error| AppError::wrap("EXPORT_ENCODE_FAILED", "Failed to encode CSV", e);

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(R::headers()).map_err(encode_err)?;
    for row in rows {
        wtr.write_record(row.cells().iter().map(CellValue::to_text))
            .map_err(encode_err)?;
    }
    wtr.into_inner()
        .map_err(|e| AppError::wrap("EXPORT_ENCODE_FAILED", "Failed to flush CSV", e))
}

fn to_xlsx<R: TabularRow>(rows: &[R]) -> Result<Vec<u8>, AppError> {
    let encode_err =
        |e: rust_xlsxwriter::XlsxError| AppError::wrap("EXPORT_ENCODE_FAILED", "Failed to encode XLSX", e);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(R::sheet_name()).map_err(encode_err)?;
        for (col, header) in R::headers().into_iter().enumerate() {
            sheet.write_string(0, col as u16, header).map_err(encode_err)?;
        }
        for (idx, row) in rows.iter().enumerate() {
            let r = (idx + 1) as u32;
            for (col, cell) in row.cells().into_iter().enumerate() {
                let c = col as u16;
                match cell {
                    CellValue::Text(s) => sheet.write_string(r, c, s),
                    CellValue::Integer(v) => sheet.write_number(r, c, v as f64),
                    CellValue::Bool(b) => sheet.write_boolean(r, c, b),
                }
                .map_err(encode_err)?;
            }
        }
    }
    workbook.save_to_buffer().map_err(encode_err)
}

/// Materialize rows as a CSV or XLSX document.
pub fn export_rows<R: TabularRow>(rows: &[R], format: ExportFormat) -> Result<Vec<u8>, AppError> {
    match format {
        ExportFormat::Csv => to_csv(rows),
        ExportFormat::Xlsx => to_xlsx(rows),
    }
}

/// Write an export file. Refuses to overwrite an existing path.
pub fn write_export<R: TabularRow>(
    rows: &[R],
    format: ExportFormat,
    path: &Path,
) -> Result<ExportFileInfo, AppError> {
    if path.exists() {
        return Err(AppError::new(
            "EXPORT_DEST_EXISTS",
            "Export destination already exists",
        )
        .with_details(path.display().to_string()));
    }

    let bytes = export_rows(rows, format)?;
    fs::write(path, &bytes).map_err(|e| {
        AppError::new("EXPORT_WRITE_FAILED", "Failed to write export file")
            .with_details(format!("path={}: {}", path.display(), e))
    })?;

    tracing::info!(path = %path.display(), rows = rows.len(), ?format, "wrote export");

    Ok(ExportFileInfo {
        path: path.to_string_lossy().to_string(),
        bytes: bytes.len() as u64,
        sha256: sha256_hex(&bytes),
        row_count: rows.len() as i64,
    })
}

impl TabularRow for BreakRecord {
    fn sheet_name() -> &'static str {
        "Break Details"
    }

    fn headers() -> Vec<&'static str> {
        vec![
            "Break ID",
            "Date",
            "Category",
            "Sub-Category",
            "Assignee",
            "Responsible Team",
            "Status",
            "Age (days)",
            "Explanation",
            "Reoccurrence",
        ]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.id.as_str().into(),
            format_calendar_date(self.date).into(),
            self.category.as_str().into(),
            self.sub_category.as_str().into(),
            self.assignee.as_str().into(),
            self.responsible_team.as_str().into(),
            self.status.as_str().into(),
            CellValue::Integer(i64::from(self.ageing)),
            self.explanation.as_str().into(),
            CellValue::Bool(self.reoccurrence),
        ]
    }
}

impl TabularRow for AssigneeBreakdown {
    fn sheet_name() -> &'static str {
        "Assignee Health"
    }

    fn headers() -> Vec<&'static str> {
        vec!["Assignee", "Open Breaks", "Resolved", "In Progress", "Total"]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.name.as_str().into(),
            CellValue::Integer(self.open),
            CellValue::Integer(self.resolved),
            CellValue::Integer(self.in_progress),
            CellValue::Integer(self.total),
        ]
    }
}

impl TabularRow for CategoryCount {
    fn sheet_name() -> &'static str {
        "Breaks by Category"
    }

    fn headers() -> Vec<&'static str> {
        vec!["Category", "Breaks"]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![self.name.as_str().into(), CellValue::Integer(self.count)]
    }
}
