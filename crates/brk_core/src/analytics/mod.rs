use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::dates::{short_date_label, weekday_label};
use crate::domain::{BreakRecord, BreakStatus};

/// Built-in x-axis labelers for the trend series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BucketLabel {
    /// "Mon". Different weeks collapse into the same bucket.
    Weekday,
    /// "Jan 5".
    ShortDate,
}

impl BucketLabel {
    pub fn label(&self, date: Date) -> String {
        match self {
            BucketLabel::Weekday => weekday_label(date),
            BucketLabel::ShortDate => short_date_label(date),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBucket {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssigneeBreakdown {
    pub name: String,
    pub open: i64,
    pub resolved: i64,
    /// In Progress and Pending User.
    pub in_progress: i64,
    pub total: i64,
    /// `None` when the assignee has no palette entry.
    pub color: Option<String>,
}

/// Group records into labelled buckets, presented in ascending chronological order.
///
/// Records whose labels collide share one counter. A bucket is positioned by the latest date
/// that mapped into it, so a rolling Weekday series always ends on the newest day; ties keep
/// first-seen order.
pub fn bucket_time_series<F>(filtered: &[&BreakRecord], label_fn: F) -> Vec<TimeBucket>
where
    F: Fn(Date) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(Date, TimeBucket)> = Vec::new();

    for record in filtered {
        let label = label_fn(record.date);
        match index.get(&label) {
            Some(&i) => {
                let (latest, bucket) = &mut buckets[i];
                bucket.count += 1;
                if record.date > *latest {
                    *latest = record.date;
                }
            }
            None => {
                index.insert(label.clone(), buckets.len());
                buckets.push((record.date, TimeBucket { label, count: 1 }));
            }
        }
    }

    buckets.sort_by_key(|(latest, _)| *latest);
    buckets.into_iter().map(|(_, bucket)| bucket).collect()
}

/// Count per category, in first-seen order.
pub fn breakdown_by_category(filtered: &[&BreakRecord]) -> Vec<CategoryCount> {
    let mut out: Vec<CategoryCount> = Vec::new();
    for record in filtered {
        match out.iter_mut().find(|c| c.name == record.category) {
            Some(entry) => entry.count += 1,
            None => out.push(CategoryCount {
                name: record.category.clone(),
                count: 1,
            }),
        }
    }
    out
}

/// Open/resolved/in-progress split per assignee, in first-seen order.
pub fn breakdown_by_assignee(
    filtered: &[&BreakRecord],
    colors: &BTreeMap<String, String>,
) -> Vec<AssigneeBreakdown> {
    let mut out: Vec<AssigneeBreakdown> = Vec::new();
    for record in filtered {
        let idx = match out.iter().position(|a| a.name == record.assignee) {
            Some(idx) => idx,
            None => {
                out.push(AssigneeBreakdown {
                    name: record.assignee.clone(),
                    open: 0,
                    resolved: 0,
                    in_progress: 0,
                    total: 0,
                    color: colors.get(&record.assignee).cloned(),
                });
                out.len() - 1
            }
        };
        let entry = &mut out[idx];
        match record.status {
            BreakStatus::Open => entry.open += 1,
            BreakStatus::Resolved => entry.resolved += 1,
            BreakStatus::InProgress | BreakStatus::PendingUser => entry.in_progress += 1,
        }
        entry.total += 1;
    }
    out
}
