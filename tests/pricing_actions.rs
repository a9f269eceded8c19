//! Integration tests for queuing and submitting pricing actions

use rust_decimal::Decimal;
use testresult::TestResult;

use repricer::{
    actions::{ActionQueue, SubmissionError},
    fixtures::Fixture,
    pricing::{PricingStrategy, calculate_new_price, derived_display_price},
    products::ProductId,
};

#[test]
fn match_scenario_preserves_display_markup() -> TestResult {
    let fixture = Fixture::from_set("catalog")?;
    let rice = fixture.product("rice-5kg")?;

    let new_price = calculate_new_price(rice, PricingStrategy::Match, "");

    assert_eq!(new_price, Some(Decimal::from(45)));
    assert_eq!(
        derived_display_price(rice, new_price),
        Some(Decimal::from(54))
    );

    Ok(())
}

#[test]
fn zero_percent_reduction_round_trips_every_product() -> TestResult {
    let fixture = Fixture::from_set("catalog")?;

    for product in fixture.products() {
        let new_price = calculate_new_price(&product, PricingStrategy::Reduce, "0");

        if product.standard_price() > Decimal::ZERO {
            assert_eq!(
                derived_display_price(&product, new_price),
                product.display_price,
                "round trip failed for {}",
                product.product_id
            );
        }
    }

    Ok(())
}

#[test]
fn bulk_match_only_queues_products_with_an_anchor() -> TestResult {
    let fixture = Fixture::from_set("catalog")?;
    let loaded = fixture.products();
    let mut queue = ActionQueue::new();

    let applied = queue.apply_bulk(&loaded, &fixture.ids(), PricingStrategy::Match, "");

    // sea salt has no competitor, the gift card a zero anchor
    assert_eq!(applied, 3);
    assert!(queue.get(&ProductId::from("sea-salt-500g")).is_none());
    assert!(queue.get(&ProductId::from("gift-card")).is_none());

    let request = queue.build_submission(&[], &loaded)?;

    assert_eq!(
        request.product_ids(),
        vec![
            ProductId::from("oat-milk-1l"),
            ProductId::from("olive-oil-1l"),
            ProductId::from("rice-5kg"),
        ]
    );

    Ok(())
}

#[test]
fn invalid_parameter_blocks_submission() -> TestResult {
    let fixture = Fixture::from_set("catalog")?;
    let olive = fixture.product("olive-oil-1l")?;
    let mut queue = ActionQueue::new();

    queue.set_action(olive, PricingStrategy::Undercut, "abc");

    assert_eq!(
        queue.build_submission(&[], &fixture.products()),
        Err(SubmissionError::NothingToSubmit)
    );

    queue.set_action(olive, PricingStrategy::Undercut, "10");

    let request = queue.build_submission(&[], &fixture.products())?;
    let action = request.actions.first().ok_or("missing action")?;

    assert_eq!(action.new_price, Decimal::from(90));

    Ok(())
}

#[test]
fn manual_display_price_is_converted_to_standard() -> TestResult {
    let fixture = Fixture::from_set("catalog")?;
    let olive = fixture.product("olive-oil-1l")?;

    let new_price = calculate_new_price(olive, PricingStrategy::Manual, "108");

    assert_eq!(new_price, Some(Decimal::from(90)));
    assert_eq!(
        derived_display_price(olive, new_price),
        Some(Decimal::from(108))
    );

    Ok(())
}
