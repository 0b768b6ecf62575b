//! Date-range picker state machine.
//!
//! States are `Preset` and `Custom`. Selecting a preset resolves its window against `today`,
//! replaces any custom selection and closes the dropdown. The custom modal edits a draft that
//! only becomes the selection when applied with `start <= end`; a rejected apply leaves the
//! selection and the draft untouched.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::AppError;
use crate::selection::{custom_range_label, DateRange, RangeQuery};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangePreset {
    pub label: String,
    pub days: u32,
}

pub fn default_presets() -> Vec<RangePreset> {
    [("Last 7 Days", 7), ("Last 15 Days", 15), ("Last 30 Days", 30)]
        .into_iter()
        .map(|(label, days)| RangePreset {
            label: label.to_string(),
            days,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeSelection {
    Preset { label: String, range: DateRange },
    Custom { range: DateRange },
}

impl RangeSelection {
    pub fn range(&self) -> DateRange {
        match self {
            RangeSelection::Preset { range, .. } | RangeSelection::Custom { range } => *range,
        }
    }

    pub fn label(&self) -> String {
        match self {
            RangeSelection::Preset { label, .. } => label.clone(),
            RangeSelection::Custom { range } => custom_range_label(range),
        }
    }
}

/// Unconfirmed custom range being edited in the modal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomDraft {
    #[serde(with = "crate::dates::ymd")]
    pub start: Date,
    #[serde(with = "crate::dates::ymd")]
    pub end: Date,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RangeEvent {
    ToggleDropdown,
    SelectPreset {
        label: String,
    },
    OpenCustom,
    SetCustomStart {
        #[serde(with = "crate::dates::ymd")]
        date: Date,
    },
    SetCustomEnd {
        #[serde(with = "crate::dates::ymd")]
        date: Date,
    },
    ApplyCustom,
    CancelCustom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeSelector {
    selection: RangeSelection,
    presets: Vec<RangePreset>,
    dropdown_open: bool,
    custom_draft: Option<CustomDraft>,
}

impl RangeSelector {
    /// Starts on the first preset ("Last 7 Days" with the default presets).
    pub fn new(today: Date) -> Self {
        Self::with_presets(default_presets(), today)
    }

    pub fn with_presets(presets: Vec<RangePreset>, today: Date) -> Self {
        let selection = match presets.first() {
            Some(p) => RangeSelection::Preset {
                label: p.label.clone(),
                range: DateRange::last_days(today, p.days),
            },
            None => RangeSelection::Custom {
                range: DateRange::single_day(today),
            },
        };
        Self {
            selection,
            presets,
            dropdown_open: false,
            custom_draft: None,
        }
    }

    pub fn selection(&self) -> &RangeSelection {
        &self.selection
    }

    pub fn presets(&self) -> &[RangePreset] {
        &self.presets
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn custom_draft(&self) -> Option<&CustomDraft> {
        self.custom_draft.as_ref()
    }

    pub fn range(&self) -> DateRange {
        self.selection.range()
    }

    pub fn label(&self) -> String {
        self.selection.label()
    }

    /// The current selection as a query range.
    pub fn to_query(&self) -> RangeQuery {
        RangeQuery::Explicit(self.range())
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    pub fn select_preset(&mut self, label: &str, today: Date) -> Result<(), AppError> {
        let preset = self
            .presets
            .iter()
            .find(|p| p.label == label)
            .ok_or_else(|| {
                AppError::new("RANGE_PRESET_UNKNOWN", "Unknown date range preset")
                    .with_details(format!("label={label}"))
            })?;
        self.selection = RangeSelection::Preset {
            label: preset.label.clone(),
            range: DateRange::last_days(today, preset.days),
        };
        self.dropdown_open = false;
        Ok(())
    }

    /// Opens the modal with both draft dates on `today`. The selection is unchanged.
    pub fn open_custom(&mut self, today: Date) {
        self.dropdown_open = false;
        self.custom_draft = Some(CustomDraft {
            start: today,
            end: today,
        });
    }

    pub fn set_custom_start(&mut self, date: Date) -> Result<(), AppError> {
        self.draft_mut()?.start = date;
        Ok(())
    }

    pub fn set_custom_end(&mut self, date: Date) -> Result<(), AppError> {
        self.draft_mut()?.end = date;
        Ok(())
    }

    /// Commit the draft. On `start > end` the error is returned and nothing changes.
    pub fn apply_custom(&mut self) -> Result<DateRange, AppError> {
        let draft = *self.draft_mut()?;
        let range = DateRange::new(draft.start, draft.end).map_err(|e| {
            tracing::warn!(code = %e.code, details = ?e.details, "rejected custom date range");
            e
        })?;
        self.selection = RangeSelection::Custom { range };
        self.custom_draft = None;
        Ok(range)
    }

    pub fn cancel_custom(&mut self) {
        self.custom_draft = None;
    }

    pub fn handle(&mut self, event: &RangeEvent, today: Date) -> Result<(), AppError> {
        match event {
            RangeEvent::ToggleDropdown => self.toggle_dropdown(),
            RangeEvent::SelectPreset { label } => self.select_preset(label, today)?,
            RangeEvent::OpenCustom => self.open_custom(today),
            RangeEvent::SetCustomStart { date } => self.set_custom_start(*date)?,
            RangeEvent::SetCustomEnd { date } => self.set_custom_end(*date)?,
            RangeEvent::ApplyCustom => {
                self.apply_custom()?;
            }
            RangeEvent::CancelCustom => self.cancel_custom(),
        }
        Ok(())
    }

    fn draft_mut(&mut self) -> Result<&mut CustomDraft, AppError> {
        self.custom_draft.as_mut().ok_or_else(|| {
            AppError::new(
                "RANGE_CUSTOM_NOT_OPEN",
                "Custom date range modal is not open",
            )
        })
    }
}
