use serde::{Deserialize, Serialize};

use crate::dates::normalize_calendar_date;
use crate::domain::{BreakRecord, BreakStatus, DashboardVariant, ValidationWarning};
use crate::error::AppError;
use crate::validate::validate_record;

/// Maps break fields to CSV column headers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakCsvMapping {
    pub id: String,
    pub date: String,
    pub category: String,
    pub assignee: String,
    pub status: String,
    pub sub_category: Option<String>,
    pub responsible_team: Option<String>,
    /// When unmapped, ageing is 0 for every row.
    pub ageing: Option<String>,
    pub explanation: Option<String>,
    pub reoccurrence: Option<String>,
}

impl Default for BreakCsvMapping {
    /// Headers written by the break-details export, so exported previews import unchanged.
    fn default() -> Self {
        Self {
            id: "Break ID".to_string(),
            date: "Date".to_string(),
            category: "Category".to_string(),
            assignee: "Assignee".to_string(),
            status: "Status".to_string(),
            sub_category: Some("Sub-Category".to_string()),
            responsible_team: Some("Responsible Team".to_string()),
            ageing: Some("Age (days)".to_string()),
            explanation: Some("Explanation".to_string()),
            reoccurrence: Some("Reoccurrence".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakCsvPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakImportSummary {
    pub records: Vec<BreakRecord>,
    pub skipped: usize,
    pub warnings: Vec<ValidationWarning>,
}

fn get<'a>(
    row: &'a csv::StringRecord,
    headers: &'a csv::StringRecord,
    header_name: &str,
) -> Option<&'a str> {
    headers
        .iter()
        .position(|h| h.trim() == header_name)
        .and_then(|idx| row.get(idx))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn get_mapped<'a>(
    row: &'a csv::StringRecord,
    headers: &'a csv::StringRecord,
    header_name: Option<&str>,
) -> Option<&'a str> {
    header_name.and_then(|h| get(row, headers, h))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn read_headers(rdr: &mut csv::Reader<&[u8]>) -> Result<csv::StringRecord, AppError> {
    rdr.headers().cloned().map_err(|e| {
        AppError::wrap(
            "INGEST_CSV_HEADERS_FAILED",
            "Failed to read break CSV headers",
            e,
        )
    })
}

/// Preview and import read ragged rows the same way.
fn breaks_reader(csv_text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes())
}

pub fn preview_breaks_csv(csv_text: &str, max_rows: usize) -> Result<BreakCsvPreview, AppError> {
    let mut rdr = breaks_reader(csv_text);

    let headers = read_headers(&mut rdr)?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for result in rdr.records().take(max_rows) {
        let row = result
            .map_err(|e| AppError::wrap("INGEST_CSV_PARSE_FAILED", "Failed to parse break CSV row", e))?;
        rows.push(row.iter().map(|v| v.to_string()).collect::<Vec<_>>());
    }

    Ok(BreakCsvPreview { headers, rows })
}

fn skip(row_idx: usize, code: &str, message: String, warnings: &mut Vec<ValidationWarning>) {
    warnings.push(
        ValidationWarning::new(code, message).with_details(format!("row={row_idx}; skipped")),
    );
}

/// Import break records from CSV.
///
/// Rows missing a required field (id, date, category, assignee, status) or carrying an
/// unparseable date/status/ageing are skipped with a warning; nothing is defaulted silently.
/// Status values outside the variant's declared set are kept and flagged by validation.
pub fn import_breaks_csv(
    csv_text: &str,
    mapping: &BreakCsvMapping,
    variant: DashboardVariant,
) -> Result<BreakImportSummary, AppError> {
    let mut rdr = breaks_reader(csv_text);
    let headers = read_headers(&mut rdr)?;

    for required in [
        &mapping.id,
        &mapping.date,
        &mapping.category,
        &mapping.assignee,
        &mapping.status,
    ] {
        if !headers.iter().any(|h| h.trim() == required.as_str()) {
            return Err(AppError::new(
                "INGEST_CSV_MAPPING_INVALID",
                "Mapped column is missing from the CSV header",
            )
            .with_details(format!("column={required}")));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut warnings = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        // Row numbers are 1-based and exclude the header.
        let row_idx = idx + 1;
        let row = result
            .map_err(|e| AppError::wrap("INGEST_CSV_PARSE_FAILED", "Failed to parse break CSV row", e))?;

        let (Some(id), Some(category), Some(assignee)) = (
            get(&row, &headers, &mapping.id),
            get(&row, &headers, &mapping.category),
            get(&row, &headers, &mapping.assignee),
        ) else {
            skip(
                row_idx,
                "INGEST_REQUIRED_FIELD_MISSING",
                "Row is missing id, category or assignee".to_string(),
                &mut warnings,
            );
            skipped += 1;
            continue;
        };

        let date = get(&row, &headers, &mapping.date)
            .and_then(|raw| normalize_calendar_date(&mapping.date, raw, &mut warnings));
        let Some(date) = date else {
            skip(
                row_idx,
                "INGEST_DATE_MISSING",
                format!("Row {id} has no usable date"),
                &mut warnings,
            );
            skipped += 1;
            continue;
        };

        let raw_status = get(&row, &headers, &mapping.status).unwrap_or("");
        let Some(status) = BreakStatus::parse(raw_status) else {
            skip(
                row_idx,
                "INGEST_STATUS_UNKNOWN",
                format!("Row {id} has unknown status '{raw_status}'"),
                &mut warnings,
            );
            skipped += 1;
            continue;
        };

        let ageing = match get_mapped(&row, &headers, mapping.ageing.as_deref()) {
            None => 0,
            Some(raw) => match raw.parse::<u32>() {
                Ok(v) => v,
                Err(e) => {
                    skip(
                        row_idx,
                        "INGEST_AGEING_PARSE_FAILED",
                        format!("Row {id} has invalid ageing '{raw}': {e}"),
                        &mut warnings,
                    );
                    skipped += 1;
                    continue;
                }
            },
        };

        let reoccurrence = match get_mapped(&row, &headers, mapping.reoccurrence.as_deref()) {
            None => false,
            Some(raw) => parse_bool(raw).unwrap_or_else(|| {
                warnings.push(
                    ValidationWarning::new(
                        "INGEST_REOCCURRENCE_UNPARSEABLE",
                        "Reoccurrence flag not recognised; treated as false",
                    )
                    .with_details(format!("row={row_idx}; value={raw}")),
                );
                false
            }),
        };

        let text = |header: Option<&str>| {
            get_mapped(&row, &headers, header)
                .unwrap_or_default()
                .to_string()
        };

        let record = BreakRecord {
            id: id.to_string(),
            date,
            category: category.to_string(),
            sub_category: text(mapping.sub_category.as_deref()),
            assignee: assignee.to_string(),
            responsible_team: text(mapping.responsible_team.as_deref()),
            status,
            ageing,
            explanation: text(mapping.explanation.as_deref()),
            reoccurrence,
        };
        warnings.extend(validate_record(&record, variant));
        records.push(record);
    }

    tracing::info!(
        imported = records.len(),
        skipped,
        warnings = warnings.len(),
        "imported break CSV"
    );

    Ok(BreakImportSummary {
        records,
        skipped,
        warnings,
    })
}
