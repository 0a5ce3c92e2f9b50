//! Property-based tests for DepreciationCalculator.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::{DepreciationCalculator, DepreciationInput};

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 2000-01-01 plus up to ~40 years
    (0i64..14_600).prop_map(|days| {
        NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date") + Duration::days(days)
    })
}

fn arb_input() -> impl Strategy<Value = DepreciationInput> {
    (0u64..10_000_000_000u64, 0u32..60, arb_date()).prop_map(|(value, years, purchased)| {
        DepreciationInput {
            value: Decimal::from(value),
            useful_life_years: years,
            purchase_date: purchased,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Percentage stays within 0..=100 and the current value is never negative.
    #[test]
    fn prop_bounds_hold(input in arb_input(), as_of in arb_date()) {
        let result = DepreciationCalculator::compute(&input, as_of);
        prop_assert!(result.depreciation_percentage <= 100);
        prop_assert!(result.current_value >= Decimal::ZERO);
        prop_assert!(result.accumulated_depreciation >= Decimal::ZERO);
        prop_assert!(result.accumulated_depreciation <= input.value);
    }

    /// Current value and accumulated depreciation always add back to the value.
    #[test]
    fn prop_value_is_conserved(input in arb_input(), as_of in arb_date()) {
        let result = DepreciationCalculator::compute(&input, as_of);
        prop_assert_eq!(
            result.current_value + result.accumulated_depreciation,
            input.value
        );
    }

    /// Accumulated depreciation never decreases as time passes.
    #[test]
    fn prop_accumulated_is_monotonic(
        input in arb_input(),
        as_of in arb_date(),
        extra_days in 0i64..2_000,
    ) {
        let earlier = DepreciationCalculator::compute(&input, as_of);
        let later = DepreciationCalculator::compute(&input, as_of + Duration::days(extra_days));
        prop_assert!(later.accumulated_depreciation >= earlier.accumulated_depreciation);
        prop_assert!(later.depreciation_percentage >= earlier.depreciation_percentage);
    }

    /// The percentage is the floor of the exact ratio.
    #[test]
    fn prop_percentage_is_floor(input in arb_input(), as_of in arb_date()) {
        let result = DepreciationCalculator::compute(&input, as_of);
        if input.value > Decimal::ZERO {
            let pct = Decimal::from(result.depreciation_percentage);
            let exact = result.accumulated_depreciation * Decimal::ONE_HUNDRED / input.value;
            prop_assert!(pct <= exact);
            prop_assert!(exact < pct + Decimal::ONE);
        } else {
            prop_assert_eq!(result.depreciation_percentage, 0);
        }
    }

    /// Nothing depreciates before the first full month.
    #[test]
    fn prop_no_depreciation_before_purchase(input in arb_input(), days_before in 0i64..1_000) {
        let as_of = input.purchase_date - Duration::days(days_before);
        let result = DepreciationCalculator::compute(&input, as_of);
        prop_assert_eq!(result.elapsed_months, 0);
        prop_assert_eq!(result.accumulated_depreciation, Decimal::ZERO);
        prop_assert_eq!(result.current_value, input.value);
    }
}
