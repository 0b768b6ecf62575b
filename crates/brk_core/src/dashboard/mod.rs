use serde::{Deserialize, Serialize};
use time::Date;

use crate::analytics::{
    breakdown_by_assignee, breakdown_by_category, bucket_time_series, AssigneeBreakdown,
    TimeBucket,
};
use crate::domain::{BreakRecord, BreakStatus};
use crate::kpi::{compute_kpis, AgingPolicy, Kpis};
use crate::selection::{filter_by_status, select_by_date_range, DateRange, FilterState, RangeQuery};
use crate::settings::DashboardSettings;
use crate::table::{clamp_page, paginate, sort_rows, AssigneeSortKey, BreakSortKey, Page, SortState};

pub const DASHBOARD_PAYLOAD_VERSION: u32 = 1;

/// Everything the user has selected. Immutable: each interaction produces a new query and the
/// whole payload is recomputed from the full record set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardQuery {
    #[serde(default)]
    pub range: RangeQuery,
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default)]
    pub assignee_sort: SortState<AssigneeSortKey>,
    #[serde(default)]
    pub table_sort: Option<SortState<BreakSortKey>>,
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            range: RangeQuery::default(),
            filters: FilterState::default(),
            assignee_sort: SortState::default(),
            table_sort: None,
            page: first_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySlice {
    pub name: String,
    pub count: i64,
    /// False when another category is the active pie filter (rendered de-emphasised).
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardPayload {
    pub version: u32,
    pub range: DateRange,
    pub range_label: String,
    pub record_count: i64,
    pub aging_policy: AgingPolicy,
    pub kpis: Kpis,
    pub time_series: Vec<TimeBucket>,
    pub categories: Vec<CategorySlice>,
    pub active_category: Option<String>,
    pub assignee_status_filter: Option<BreakStatus>,
    pub table_status_filter: Option<BreakStatus>,
    pub assignees: Vec<AssigneeBreakdown>,
    pub assignee_sort: SortState<AssigneeSortKey>,
    pub table: Page<BreakRecord>,
    pub table_sort: Option<SortState<BreakSortKey>>,
}

/// Date-filtered, table-status-filtered and sorted break-details rows (all pages). This is the row
/// set the table paginates and the export writes.
pub fn table_rows<'a>(
    records: &'a [BreakRecord],
    query: &DashboardQuery,
    today: Date,
) -> Vec<&'a BreakRecord> {
    let range = query.range.resolve(today);
    let in_range = select_by_date_range(records, &range);
    let rows = filter_by_status(&in_range, query.filters.table_status);
    match query.table_sort {
        Some(sort) => sort_rows(rows, sort.key, sort.order),
        None => rows,
    }
}

/// Assemble every view of the dashboard.
///
/// The category filter only drives slice highlighting; KPIs, the trend series and the tables
/// ignore it. The assignee panel and the details table each apply their own status filter.
pub fn build_dashboard(
    records: &[BreakRecord],
    query: &DashboardQuery,
    today: Date,
    settings: &DashboardSettings,
) -> DashboardPayload {
    let range = query.range.resolve(today);
    let in_range = select_by_date_range(records, &range);
    let policy = settings.effective_aging_policy();
    let bucket_label = settings.effective_bucket_label();

    let kpis = compute_kpis(&in_range, today, policy);
    let time_series = bucket_time_series(&in_range, |d| bucket_label.label(d));

    let categories = breakdown_by_category(&in_range)
        .into_iter()
        .map(|c| CategorySlice {
            highlighted: query.filters.is_highlighted(&c.name),
            name: c.name,
            count: c.count,
        })
        .collect();

    let assignee_rows = filter_by_status(&in_range, query.filters.assignee_status);
    let assignees = sort_rows(
        breakdown_by_assignee(&assignee_rows, &settings.assignee_colors),
        query.assignee_sort.key,
        query.assignee_sort.order,
    );

    let rows = table_rows(records, query, today);
    let pages = crate::table::total_pages(rows.len(), settings.page_size);
    let page = clamp_page(query.page, pages);
    let table = paginate(&rows, settings.page_size, page).map(|r| r.clone());

    tracing::debug!(
        in_range = in_range.len(),
        table_rows = table.total_rows,
        page,
        "recomputed dashboard"
    );

    DashboardPayload {
        version: DASHBOARD_PAYLOAD_VERSION,
        range,
        range_label: query.range.label(),
        record_count: in_range.len() as i64,
        aging_policy: policy,
        kpis,
        time_series,
        categories,
        active_category: query.filters.category.clone(),
        assignee_status_filter: query.filters.assignee_status,
        table_status_filter: query.filters.table_status,
        assignees,
        assignee_sort: query.assignee_sort,
        table,
        table_sort: query.table_sort,
    }
}
