//! Pricing
//!
//! Derives a new standardized price for a product from a pricing strategy and
//! its parameter. Standardized prices are comparable across vendors and pack
//! sizes; display prices are what the customer sees. Match and undercut work
//! against the competitor's standardized price, reduce works on our own
//! standardized price, and manual takes the display price the operator typed.
//!
//! Nothing here fails loudly: an impossible or invalid request yields `None`,
//! which callers treat as "no action computed".

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::Product;

/// Pricing strategy selected by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PricingStrategy {
    /// Match the cheapest competitor's standardized price.
    Match,

    /// Undercut the cheapest competitor's standardized price by a percentage.
    Undercut,

    /// Reduce our own standardized price by a percentage.
    Reduce,

    /// Set an explicit display price.
    Manual,
}

impl PricingStrategy {
    /// Wire name of the strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            PricingStrategy::Match => "MATCH",
            PricingStrategy::Undercut => "UNDERCUT",
            PricingStrategy::Reduce => "REDUCE",
            PricingStrategy::Manual => "MANUAL",
        }
    }

    /// Whether the strategy needs a competitor anchor.
    pub fn needs_anchor(self) -> bool {
        matches!(self, PricingStrategy::Match | PricingStrategy::Undercut)
    }

    /// Whether the strategy reads its parameter.
    pub fn takes_value(self) -> bool {
        !matches!(self, PricingStrategy::Match)
    }
}

impl Display for PricingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a strategy name is not one of the known strategies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pricing strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for PricingStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MATCH" => Ok(PricingStrategy::Match),
            "UNDERCUT" => Ok(PricingStrategy::Undercut),
            "REDUCE" => Ok(PricingStrategy::Reduce),
            "MANUAL" => Ok(PricingStrategy::Manual),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Calculate the new standardized price for `product`.
///
/// `value` is ignored for [`PricingStrategy::Match`], a percentage for
/// [`PricingStrategy::Undercut`] and [`PricingStrategy::Reduce`], and a display
/// price for [`PricingStrategy::Manual`].
///
/// Returns `None` when the price cannot be derived: no competitor anchor for
/// match/undercut, an unparsable parameter, or a manual price against a zero
/// display ratio.
pub fn calculate_new_price(
    product: &Product,
    strategy: PricingStrategy,
    value: &str,
) -> Option<Decimal> {
    match strategy {
        PricingStrategy::Match => product.competitor_anchor(),
        PricingStrategy::Undercut => {
            let anchor = product.competitor_anchor()?;
            let pct = parse_percentage(value)?;

            anchor.checked_mul(remaining_share(pct)?)
        }
        PricingStrategy::Reduce => {
            let pct = parse_percentage(value)?;

            product.standard_price().checked_mul(remaining_share(pct)?)
        }
        PricingStrategy::Manual => {
            let display = parse_amount(value)?;

            display.checked_div(product.ratio())
        }
    }
}

/// Same as [`calculate_new_price`], keyed by the strategy's wire name.
///
/// Unrecognised names yield `None`.
pub fn calculate_new_price_for_kind(product: &Product, kind: &str, value: &str) -> Option<Decimal> {
    let strategy = kind.parse::<PricingStrategy>().ok()?;

    calculate_new_price(product, strategy, value)
}

/// Display price corresponding to a new standardized price, keeping the
/// product's current display markup.
pub fn derived_display_price(product: &Product, new_standard: Option<Decimal>) -> Option<Decimal> {
    new_standard?.checked_mul(product.ratio())
}

/// Parse an absolute amount typed by the operator.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return None;
    }

    trimmed
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(trimmed).ok())
}

/// Parse a percentage typed by the operator, e.g. `"10"` or `"10%"` for ten percent.
///
/// The result is in percent units, not a fraction.
pub fn parse_percentage(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed);

    parse_amount(number)
}

/// `1 - pct / 100`
fn remaining_share(pct: Decimal) -> Option<Decimal> {
    Decimal::ONE.checked_sub(pct.checked_div(Decimal::ONE_HUNDRED)?)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn product(display: i64, standard: i64, anchor: Option<i64>) -> Product {
        Product::new(
            "p1",
            Some(Decimal::from(display)),
            Some(Decimal::from(standard)),
            anchor.map(Decimal::from),
        )
    }

    #[test]
    fn match_returns_anchor() {
        let product = product(60, 50, Some(45));

        assert_eq!(
            calculate_new_price(&product, PricingStrategy::Match, ""),
            Some(Decimal::from(45))
        );
    }

    #[test]
    fn match_without_anchor_is_none() {
        let missing = product(60, 50, None);
        let zero = product(60, 50, Some(0));

        assert_eq!(calculate_new_price(&missing, PricingStrategy::Match, ""), None);
        assert_eq!(calculate_new_price(&zero, PricingStrategy::Match, ""), None);
    }

    #[test]
    fn match_ignores_value() {
        let product = product(60, 50, Some(45));

        assert_eq!(
            calculate_new_price(&product, PricingStrategy::Match, "garbage"),
            Some(Decimal::from(45))
        );
    }

    #[test]
    fn undercut_takes_percentage_off_anchor() {
        let product = product(120, 100, Some(100));

        assert_eq!(
            calculate_new_price(&product, PricingStrategy::Undercut, "10"),
            Some(Decimal::from(90))
        );
    }

    #[test]
    fn undercut_accepts_percent_sign_and_whitespace() {
        let product = product(120, 100, Some(100));

        assert_eq!(
            calculate_new_price(&product, PricingStrategy::Undercut, " 10% "),
            Some(Decimal::from(90))
        );
    }

    #[test]
    fn undercut_rejects_non_numeric_value() {
        let with_anchor = product(120, 100, Some(100));
        let without_anchor = product(120, 100, None);

        assert_eq!(
            calculate_new_price(&with_anchor, PricingStrategy::Undercut, "abc"),
            None
        );
        assert_eq!(
            calculate_new_price(&without_anchor, PricingStrategy::Undercut, "abc"),
            None
        );
        assert_eq!(
            calculate_new_price(&with_anchor, PricingStrategy::Undercut, ""),
            None
        );
    }

    #[test]
    fn undercut_without_anchor_is_none() {
        let product = product(120, 100, None);

        assert_eq!(
            calculate_new_price(&product, PricingStrategy::Undercut, "10"),
            None
        );
    }

    #[test]
    fn reduce_takes_percentage_off_standard_price() {
        let product = product(60, 50, None);

        assert_eq!(
            calculate_new_price(&product, PricingStrategy::Reduce, "20"),
            Some(Decimal::from(40))
        );
    }

    #[test]
    fn reduce_without_standard_price_is_zero() {
        let product = Product::new("p1", Some(Decimal::from(60)), None, None);

        assert_eq!(
            calculate_new_price(&product, PricingStrategy::Reduce, "20"),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn manual_converts_display_to_standard() {
        let product = product(60, 50, None);

        assert_eq!(
            calculate_new_price(&product, PricingStrategy::Manual, "120"),
            Some(Decimal::from(100))
        );
    }

    #[test]
    fn manual_with_zero_display_ratio_is_none() {
        let product = product(0, 50, None);

        assert_eq!(
            calculate_new_price(&product, PricingStrategy::Manual, "120"),
            None
        );
    }

    #[test]
    fn unknown_kind_is_none() {
        let product = product(60, 50, Some(45));

        assert_eq!(calculate_new_price_for_kind(&product, "DOUBLE", "10"), None);
        assert_eq!(
            calculate_new_price_for_kind(&product, "match", ""),
            Some(Decimal::from(45))
        );
    }

    #[test]
    fn reduce_by_zero_round_trips_display_price() -> TestResult {
        let product = Product::new(
            "p1",
            Some("19.99".parse()?),
            Some("7.33".parse()?),
            None,
        );

        let new_standard = calculate_new_price(&product, PricingStrategy::Reduce, "0");
        let display = derived_display_price(&product, new_standard).ok_or("no display price")?;
        let difference = (display - Decimal::new(1999, 2)).abs();

        assert!(
            difference < Decimal::new(1, 12),
            "expected ~19.99, got {display}"
        );

        Ok(())
    }

    #[test]
    fn derived_display_price_of_none_is_none() {
        let product = product(60, 50, Some(45));

        assert_eq!(derived_display_price(&product, None), None);
    }

    #[test]
    fn match_scenario_derives_display_price() {
        let product = product(60, 50, Some(45));
        let new_standard = calculate_new_price(&product, PricingStrategy::Match, "");

        assert_eq!(new_standard, Some(Decimal::from(45)));
        assert_eq!(
            derived_display_price(&product, new_standard),
            Some(Decimal::from(54))
        );
    }

    #[test]
    fn parses_scientific_notation() {
        assert_eq!(parse_amount("1e2"), Some(Decimal::from(100)));
        assert_eq!(parse_amount("  "), None);
    }

    #[test]
    fn strategy_parsing_rejects_unknown_names() {
        assert_eq!("reduce".parse::<PricingStrategy>(), Ok(PricingStrategy::Reduce));
        assert_eq!(
            "FREE".parse::<PricingStrategy>(),
            Err(UnknownStrategy("FREE".to_string()))
        );
    }
}
