//! Integration tests for selection across pages and action board membership

use testresult::TestResult;

use repricer::{
    board::{BoardMembership, MutationState},
    filters::{FilterCriteria, FilterField},
    fixtures::Fixture,
    products::ProductId,
    selection::{GlobalTogglePolicy, SelectionSnapshot, SelectionStore},
};

#[test]
fn selection_survives_paging() -> TestResult {
    let fixture = Fixture::from_set("catalog")?;
    let ids = fixture.ids();
    let (page_one, page_two) = ids.split_at(2);
    let mut selection = SelectionStore::default();

    selection.toggle_select_all_page(page_one);
    selection.toggle_item(page_two.first().ok_or("empty page")?);

    assert_eq!(selection.count(), 3);
    assert!(selection.is_page_selected(page_one));
    assert!(!selection.is_page_selected(page_two));

    Ok(())
}

#[test]
fn global_selection_carries_filter_scope() -> TestResult {
    let mut filters = FilterCriteria::for_products();
    filters.toggle_value(FilterField::Category, "Pantry");

    let mut selection = SelectionStore::default();
    selection.set_select_all_global(true, &filters);

    filters.toggle_value(FilterField::Category, "Services");

    let SelectionSnapshot::AllMatching {
        filters: scope,
        excluded,
    } = selection.snapshot()
    else {
        return Err("expected a global scope".into());
    };

    assert_eq!(scope.category, vec!["Pantry".to_string()]);
    assert!(excluded.is_empty());

    Ok(())
}

#[test]
fn exclusion_policy_keeps_global_scope_after_deselect() {
    let mut selection = SelectionStore::new(GlobalTogglePolicy::TrackExclusions);
    let rice = ProductId::from("rice-5kg");

    selection.set_select_all_global(true, &FilterCriteria::for_products());
    selection.toggle_item(&rice);

    assert!(selection.is_all_selected());
    assert!(!selection.is_selected(&rice));
    assert!(selection.is_selected(&ProductId::from("olive-oil-1l")));
}

#[test]
fn failed_board_add_leaves_no_residue() -> TestResult {
    let fixture = Fixture::from_set("catalog")?;
    let mut board = BoardMembership::from_ids(fixture.ids().into_iter().take(1));
    let before = board.clone();

    let mut mutation = board.begin_add(&[ProductId::from("p1")]);
    assert!(board.contains(&ProductId::from("p1")));

    board.rollback(&mut mutation)?;

    assert_eq!(board, before);
    assert_eq!(mutation.state(), MutationState::RolledBack);

    Ok(())
}
