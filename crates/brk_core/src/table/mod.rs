use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::analytics::AssigneeBreakdown;
use crate::domain::BreakRecord;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// A row that can be ordered by one of its columns.
pub trait SortableRow {
    type Key: Copy + PartialEq;

    fn compare_by(&self, other: &Self, key: Self::Key) -> Ordering;
}

impl<R: SortableRow> SortableRow for &R {
    type Key = R::Key;

    fn compare_by(&self, other: &Self, key: Self::Key) -> Ordering {
        (**self).compare_by(*other, key)
    }
}

/// Current sort column and direction of a table header.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortState<K> {
    pub key: K,
    #[serde(default)]
    pub order: SortOrder,
}

impl<K: Copy + PartialEq> SortState<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            order: SortOrder::Asc,
        }
    }

    /// Header click: the same key flips the order, a new key starts ascending.
    pub fn click(&self, key: K) -> Self {
        if self.key == key {
            Self {
                key,
                order: self.order.toggled(),
            }
        } else {
            Self::new(key)
        }
    }
}

/// Stable sort: rows comparing equal keep their input order in both directions.
pub fn sort_rows<R: SortableRow>(mut rows: Vec<R>, key: R::Key, order: SortOrder) -> Vec<R> {
    rows.sort_by(|a, b| {
        let ord = a.compare_by(b, key);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    rows
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeSortKey {
    #[default]
    Name,
    Open,
    Resolved,
    Total,
}

impl SortableRow for AssigneeBreakdown {
    type Key = AssigneeSortKey;

    fn compare_by(&self, other: &Self, key: AssigneeSortKey) -> Ordering {
        match key {
            AssigneeSortKey::Name => self.name.cmp(&other.name),
            AssigneeSortKey::Open => self.open.cmp(&other.open),
            AssigneeSortKey::Resolved => self.resolved.cmp(&other.resolved),
            AssigneeSortKey::Total => self.total.cmp(&other.total),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BreakSortKey {
    Id,
    Date,
    Category,
    SubCategory,
    Assignee,
    Status,
    Ageing,
}

impl SortableRow for BreakRecord {
    type Key = BreakSortKey;

    fn compare_by(&self, other: &Self, key: BreakSortKey) -> Ordering {
        match key {
            BreakSortKey::Id => self.id.cmp(&other.id),
            BreakSortKey::Date => self.date.cmp(&other.date),
            BreakSortKey::Category => self.category.cmp(&other.category),
            BreakSortKey::SubCategory => self.sub_category.cmp(&other.sub_category),
            BreakSortKey::Assignee => self.assignee.cmp(&other.assignee),
            BreakSortKey::Status => self.status.as_str().cmp(other.status.as_str()),
            BreakSortKey::Ageing => self.ageing.cmp(&other.ageing),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

/// `ceil(count / page_size)`, never less than 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Caller-side clamp of a 1-based page number to `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice out 1-based `page`. No clamping happens here: an out-of-range page (including 0)
/// yields an empty slice, so callers clamp first with [`clamp_page`].
pub fn paginate<T: Clone>(rows: &[T], page_size: usize, page: usize) -> Page<T> {
    let pages = total_pages(rows.len(), page_size);
    let slice = if page == 0 || page_size == 0 {
        &rows[0..0]
    } else {
        let start = (page - 1).saturating_mul(page_size);
        if start >= rows.len() {
            &rows[0..0]
        } else {
            let end = start.saturating_add(page_size).min(rows.len());
            &rows[start..end]
        }
    };

    Page {
        rows: slice.to_vec(),
        page,
        page_size,
        total_pages: pages,
        total_rows: rows.len(),
    }
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_rows: self.total_rows,
        }
    }
}
