use serde::{Deserialize, Serialize};
use time::Date;

use crate::dates::days_before;
use crate::domain::{BreakRecord, DashboardVariant};

pub const DEFAULT_AGED_THRESHOLD_DAYS: u32 = 5;

/// How an unresolved break is judged "aged".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgingPolicy {
    /// The record date is strictly before `today - threshold_days`.
    DateDerived { threshold_days: u32 },
    /// The stored `ageing` field exceeds `threshold_days`.
    StoredAgeing { threshold_days: u32 },
}

impl AgingPolicy {
    /// The basic dashboard has no trustworthy ageing field and ages by date; the extended one
    /// uses the stored field.
    pub fn default_for(variant: DashboardVariant) -> Self {
        match variant {
            DashboardVariant::Basic => AgingPolicy::DateDerived {
                threshold_days: DEFAULT_AGED_THRESHOLD_DAYS,
            },
            DashboardVariant::Extended => AgingPolicy::StoredAgeing {
                threshold_days: DEFAULT_AGED_THRESHOLD_DAYS,
            },
        }
    }

    pub fn threshold_days(&self) -> u32 {
        match self {
            AgingPolicy::DateDerived { threshold_days }
            | AgingPolicy::StoredAgeing { threshold_days } => *threshold_days,
        }
    }

    /// Age test only; callers combine it with the open-status check.
    pub fn is_aged(&self, record: &BreakRecord, today: Date) -> bool {
        match self {
            AgingPolicy::DateDerived { threshold_days } => {
                record.date < days_before(today, *threshold_days)
            }
            AgingPolicy::StoredAgeing { threshold_days } => record.ageing > *threshold_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Kpis {
    pub total_count: i64,
    pub todays_count: i64,
    pub aged_open_count: i64,
    pub open_count: i64,
    pub resolved_count: i64,
    /// `round(resolved / total * 100)`, 0 for an empty set.
    pub resolved_percent: i64,
}

/// Rounded integer percentage, half up. Zero when `total` is zero.
pub fn rounded_percent(part: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (part * 200 + total) / (total * 2)
}

/// Headline tiles over an already date-filtered set. "Open" means any status other than
/// Resolved.
pub fn compute_kpis(filtered: &[&BreakRecord], today: Date, policy: AgingPolicy) -> Kpis {
    let mut kpis = Kpis {
        total_count: filtered.len() as i64,
        todays_count: 0,
        aged_open_count: 0,
        open_count: 0,
        resolved_count: 0,
        resolved_percent: 0,
    };

    for record in filtered {
        if record.date == today {
            kpis.todays_count += 1;
        }
        if record.status.is_resolved() {
            kpis.resolved_count += 1;
        } else {
            kpis.open_count += 1;
            if policy.is_aged(record, today) {
                kpis.aged_open_count += 1;
            }
        }
    }

    kpis.resolved_percent = rounded_percent(kpis.resolved_count, kpis.total_count);
    kpis
}
