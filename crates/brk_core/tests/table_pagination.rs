use brk_core::analytics::AssigneeBreakdown;
use brk_core::table::{
    clamp_page, paginate, sort_rows, total_pages, AssigneeSortKey, SortOrder, SortState,
};
use pretty_assertions::assert_eq;

fn assignee(name: &str, open: i64, resolved: i64) -> AssigneeBreakdown {
    AssigneeBreakdown {
        name: name.to_string(),
        open,
        resolved,
        in_progress: 0,
        total: open + resolved,
        color: None,
    }
}

#[test]
fn twelve_rows_paginate_as_five_five_two() {
    let rows: Vec<u32> = (1..=12).collect();
    assert_eq!(total_pages(rows.len(), 5), 3);

    assert_eq!(paginate(&rows, 5, 1).rows, vec![1, 2, 3, 4, 5]);
    assert_eq!(paginate(&rows, 5, 2).rows, vec![6, 7, 8, 9, 10]);
    let last = paginate(&rows, 5, 3);
    assert_eq!(last.rows, vec![11, 12]);
    assert_eq!(last.total_pages, 3);
    assert_eq!(last.total_rows, 12);
}

#[test]
fn out_of_range_pages_are_empty_until_clamped() {
    let rows: Vec<u32> = (1..=12).collect();
    assert!(paginate(&rows, 5, 0).rows.is_empty());
    assert!(paginate(&rows, 5, 4).rows.is_empty());

    assert_eq!(clamp_page(0, 3), 1);
    assert_eq!(clamp_page(4, 3), 3);
    assert_eq!(clamp_page(2, 3), 2);
}

#[test]
fn empty_table_still_has_one_page() {
    let rows: Vec<u32> = Vec::new();
    let page = paginate(&rows, 5, 1);
    assert!(page.rows.is_empty());
    assert_eq!(page.total_pages, 1);
    assert_eq!(clamp_page(7, page.total_pages), 1);
}

#[test]
fn header_click_toggles_then_resets_order() {
    let state = SortState::new(AssigneeSortKey::Name);
    assert_eq!(state.order, SortOrder::Asc);

    let again = state.click(AssigneeSortKey::Name);
    assert_eq!(again.order, SortOrder::Desc);
    assert_eq!(again.click(AssigneeSortKey::Name).order, SortOrder::Asc);

    let other = again.click(AssigneeSortKey::Open);
    assert_eq!(other, SortState::new(AssigneeSortKey::Open));
}

#[test]
fn descending_sort_keeps_ties_in_input_order() {
    let rows = vec![
        assignee("Eva", 2, 1),
        assignee("Alex", 3, 0),
        assignee("Ben", 2, 5),
        assignee("Chris", 1, 1),
    ];

    let names = |rows: Vec<AssigneeBreakdown>| rows.into_iter().map(|r| r.name).collect::<Vec<_>>();

    assert_eq!(
        names(sort_rows(rows.clone(), AssigneeSortKey::Open, SortOrder::Desc)),
        vec!["Alex", "Eva", "Ben", "Chris"]
    );
    assert_eq!(
        names(sort_rows(rows.clone(), AssigneeSortKey::Open, SortOrder::Asc)),
        vec!["Chris", "Eva", "Ben", "Alex"]
    );
    assert_eq!(
        names(sort_rows(rows, AssigneeSortKey::Name, SortOrder::Asc)),
        vec!["Alex", "Ben", "Chris", "Eva"]
    );
}
