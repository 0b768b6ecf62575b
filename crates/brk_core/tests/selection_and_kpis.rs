use brk_core::analytics::{breakdown_by_category, CategoryCount};
use brk_core::domain::{BreakRecord, BreakStatus};
use brk_core::kpi::{compute_kpis, AgingPolicy, Kpis};
use brk_core::selection::{apply_pie_click_filter, select_by_date_range, DateRange, FilterState};
use pretty_assertions::assert_eq;
use time::macros::date;
use time::Date;

fn brk(id: &str, date: Date, status: BreakStatus, category: &str, assignee: &str, ageing: u32) -> BreakRecord {
    BreakRecord {
        id: id.to_string(),
        date,
        category: category.to_string(),
        sub_category: String::new(),
        assignee: assignee.to_string(),
        responsible_team: "Infra Team".to_string(),
        status,
        ageing,
        explanation: String::new(),
        reoccurrence: false,
    }
}

#[test]
fn two_breaks_on_one_day_split_open_and_resolved() {
    let day = date!(2024 - 01 - 01);
    let records = vec![
        brk("BRK-1", day, BreakStatus::Open, "Network", "Alex", 0),
        brk("BRK-2", day, BreakStatus::Resolved, "Network", "Ben", 0),
    ];

    let filtered = select_by_date_range(&records, &DateRange::single_day(day));
    let kpis = compute_kpis(&filtered, day, AgingPolicy::StoredAgeing { threshold_days: 5 });

    assert_eq!(
        kpis,
        Kpis {
            total_count: 2,
            todays_count: 2,
            aged_open_count: 0,
            open_count: 1,
            resolved_count: 1,
            resolved_percent: 50,
        }
    );
    assert_eq!(
        breakdown_by_category(&filtered),
        vec![CategoryCount {
            name: "Network".to_string(),
            count: 2
        }]
    );
}

#[test]
fn empty_selection_yields_zero_kpis() {
    let records = vec![brk("BRK-1", date!(2024 - 02 - 01), BreakStatus::Open, "Network", "Alex", 9)];
    let filtered = select_by_date_range(
        &records,
        &DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31)).expect("range"),
    );
    assert!(filtered.is_empty());

    let kpis = compute_kpis(&filtered, date!(2024 - 02 - 01), AgingPolicy::default_for(Default::default()));
    assert_eq!(kpis.total_count, 0);
    assert_eq!(kpis.resolved_percent, 0);
    assert!(breakdown_by_category(&filtered).is_empty());
}

#[test]
fn range_includes_both_end_days_and_nothing_outside() {
    let records = vec![
        brk("before", date!(2024 - 01 - 04), BreakStatus::Open, "Network", "Alex", 0),
        brk("start", date!(2024 - 01 - 05), BreakStatus::Open, "Network", "Alex", 0),
        brk("middle", date!(2024 - 01 - 07), BreakStatus::Open, "Network", "Alex", 0),
        brk("end", date!(2024 - 01 - 10), BreakStatus::Open, "Network", "Alex", 0),
        brk("after", date!(2024 - 01 - 11), BreakStatus::Open, "Network", "Alex", 0),
    ];
    let range = DateRange::new(date!(2024 - 01 - 05), date!(2024 - 01 - 10)).expect("range");

    let ids: Vec<&str> = select_by_date_range(&records, &range)
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(ids, vec!["start", "middle", "end"]);
}

#[test]
fn inverted_range_is_rejected_with_message() {
    let err = DateRange::new(date!(2024 - 01 - 10), date!(2024 - 01 - 05)).unwrap_err();
    assert_eq!(err.code, "RANGE_INVALID");
    assert_eq!(err.message, "End date must be after start date");
}

#[test]
fn date_derived_policy_ages_strictly_before_cutoff() {
    let today = date!(2024 - 01 - 10);
    let records = vec![
        brk("old", date!(2024 - 01 - 04), BreakStatus::Open, "Network", "Alex", 0),
        brk("boundary", date!(2024 - 01 - 05), BreakStatus::Open, "Network", "Alex", 0),
        brk("old-resolved", date!(2024 - 01 - 01), BreakStatus::Resolved, "Network", "Alex", 0),
    ];
    let all: Vec<&BreakRecord> = records.iter().collect();

    let kpis = compute_kpis(&all, today, AgingPolicy::DateDerived { threshold_days: 5 });
    assert_eq!(kpis.aged_open_count, 1);
    assert_eq!(kpis.open_count, 2);
    assert_eq!(kpis.todays_count, 0);
}

#[test]
fn stored_ageing_policy_counts_unresolved_over_threshold() {
    let today = date!(2024 - 01 - 10);
    let records = vec![
        brk("a", today, BreakStatus::Open, "Network", "Alex", 6),
        brk("b", today, BreakStatus::InProgress, "Network", "Alex", 12),
        brk("c", today, BreakStatus::PendingUser, "Network", "Alex", 5),
        brk("d", today, BreakStatus::Resolved, "Network", "Alex", 19),
    ];
    let all: Vec<&BreakRecord> = records.iter().collect();

    let kpis = compute_kpis(&all, today, AgingPolicy::StoredAgeing { threshold_days: 5 });
    assert_eq!(kpis.aged_open_count, 2);
    assert_eq!(kpis.open_count, 3);
    assert_eq!(kpis.resolved_percent, 25);
}

#[test]
fn pie_click_twice_restores_original_filter() {
    assert_eq!(apply_pie_click_filter(None, "Network"), Some("Network".to_string()));
    assert_eq!(apply_pie_click_filter(Some("Network"), "Network"), None);
    assert_eq!(
        apply_pie_click_filter(Some("Network"), "Hardware"),
        Some("Hardware".to_string())
    );

    for start in [None, Some("Hardware".to_string()), Some("Network".to_string())] {
        let state = FilterState {
            category: start.clone(),
            assignee_status: Some(BreakStatus::Open),
            table_status: Some(BreakStatus::Resolved),
        };
        let twice = state.with_pie_click("Network").with_pie_click("Network");
        if start.as_deref() == Some("Hardware") {
            // A different active category is replaced, not restored.
            assert_eq!(twice.category, None);
        } else {
            assert_eq!(twice, state);
        }
    }
}

#[test]
fn highlight_follows_active_category() {
    let none = FilterState::default();
    assert!(none.is_highlighted("Network"));

    let active = none.with_pie_click("Software");
    assert!(active.is_highlighted("Software"));
    assert!(!active.is_highlighted("Network"));
}
