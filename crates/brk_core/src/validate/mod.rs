use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{BreakRecord, DashboardVariant, ValidationWarning};

/// Validate a record against the invariants of a dashboard variant.
///
/// `date` and `ageing` are enforced by their types; what remains is the status set and the
/// presence of the fields every aggregate groups on.
pub fn validate_record(record: &BreakRecord, variant: DashboardVariant) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if !variant.allows(record.status) {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_STATUS_NOT_IN_VARIANT",
                format!("Status {} is not declared for this dashboard", record.status),
            )
            .with_details(format!("id={}; variant={variant:?}", record.id)),
        );
    }

    for (field, value) in [
        ("id", &record.id),
        ("category", &record.category),
        ("assignee", &record.assignee),
    ] {
        if value.trim().is_empty() {
            warnings.push(
                ValidationWarning::new("VALIDATION_FIELD_MISSING", format!("{field} is empty"))
                    .with_details(format!("id={}", record.id)),
            );
        }
    }

    warnings
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordValidationReportItem {
    pub id: String,
    pub warnings: Vec<ValidationWarning>,
}

/// Validate a whole record set, including duplicate ids. Only records with warnings are
/// listed, ordered by id.
pub fn validate_all_records(
    records: &[BreakRecord],
    variant: DashboardVariant,
) -> Vec<RecordValidationReportItem> {
    let mut by_id: BTreeMap<String, Vec<ValidationWarning>> = BTreeMap::new();
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();

    for record in records {
        let mut warnings = validate_record(record, variant);
        let occurrences = seen.entry(record.id.as_str()).or_insert(0);
        *occurrences += 1;
        if *occurrences == 2 {
            warnings.push(
                ValidationWarning::new("VALIDATION_DUPLICATE_ID", "Record id is not unique")
                    .with_details(format!("id={}", record.id)),
            );
        }
        if !warnings.is_empty() {
            by_id.entry(record.id.clone()).or_default().extend(warnings);
        }
    }

    by_id
        .into_iter()
        .map(|(id, warnings)| RecordValidationReportItem { id, warnings })
        .collect()
}
