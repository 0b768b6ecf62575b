use std::fmt;

use serde::{Deserialize, Serialize};
use time::Date;

/// Workflow state of a break. Serialized with the display strings the dashboards show.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BreakStatus {
    Open,
    Resolved,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Pending User")]
    PendingUser,
}

impl BreakStatus {
    pub const ALL: [BreakStatus; 4] = [
        BreakStatus::Open,
        BreakStatus::Resolved,
        BreakStatus::InProgress,
        BreakStatus::PendingUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BreakStatus::Open => "Open",
            BreakStatus::Resolved => "Resolved",
            BreakStatus::InProgress => "In Progress",
            BreakStatus::PendingUser => "Pending User",
        }
    }

    /// Lenient parse for ingest: case-insensitive, accepts display strings and snake_case.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "open" => Some(BreakStatus::Open),
            "resolved" => Some(BreakStatus::Resolved),
            "in progress" => Some(BreakStatus::InProgress),
            "pending user" => Some(BreakStatus::PendingUser),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, BreakStatus::Resolved)
    }
}

impl fmt::Display for BreakStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two dashboard flavours differ in which statuses a record may carry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DashboardVariant {
    /// Open/Resolved only; ageing is derived from the record date.
    Basic,
    /// Full status set with a stored ageing field and per-record details.
    #[default]
    Extended,
}

impl DashboardVariant {
    pub fn statuses(&self) -> &'static [BreakStatus] {
        match self {
            DashboardVariant::Basic => &[BreakStatus::Open, BreakStatus::Resolved],
            DashboardVariant::Extended => &BreakStatus::ALL,
        }
    }

    pub fn allows(&self, status: BreakStatus) -> bool {
        self.statuses().contains(&status)
    }
}

/// A single operational break being tracked.
///
/// Records are immutable once produced by the demo generator or CSV ingest; every aggregate
/// borrows them and derives new values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakRecord {
    pub id: String,
    #[serde(with = "crate::dates::ymd")]
    pub date: Date,
    pub category: String,
    pub sub_category: String,
    pub assignee: String,
    pub responsible_team: String,
    pub status: BreakStatus,
    /// Days open. Independent of `date` in the extended dashboard.
    pub ageing: u32,
    pub explanation: String,
    pub reoccurrence: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
