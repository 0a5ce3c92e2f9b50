//! Depreciation calculator.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::asset::Asset;

/// Attributes the calculation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepreciationInput {
    /// Acquisition value.
    pub value: Decimal,
    /// Useful life in whole years.
    pub useful_life_years: u32,
    /// Purchase date.
    pub purchase_date: NaiveDate,
}

impl From<&Asset> for DepreciationInput {
    fn from(asset: &Asset) -> Self {
        Self {
            value: asset.value,
            useful_life_years: asset.useful_life_years,
            purchase_date: asset.purchase_date,
        }
    }
}

/// Depreciation figures at a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depreciation {
    /// Evaluation date.
    pub as_of: NaiveDate,
    /// Whole months elapsed since purchase.
    pub elapsed_months: u32,
    /// Monthly depreciation, truncated to two decimals.
    pub monthly_depreciation: Decimal,
    /// Accumulated depreciation, within `[0, value]`.
    pub accumulated_depreciation: Decimal,
    /// `value - accumulated_depreciation`.
    pub current_value: Decimal,
    /// Floor of accumulated / value * 100.
    pub depreciation_percentage: u8,
}

/// Stateless straight-line depreciation calculator.
pub struct DepreciationCalculator;

impl DepreciationCalculator {
    /// Decimal places kept on monetary outputs.
    pub const MONEY_SCALE: u32 = 2;

    /// Whole calendar months between two dates, clamped to zero.
    ///
    /// A month only counts once the day-of-month of `from` is reached,
    /// so Jan 15 → Feb 14 is 0 months and Jan 15 → Feb 15 is 1.
    #[must_use]
    pub fn elapsed_months(from: NaiveDate, to: NaiveDate) -> u32 {
        if to <= from {
            return 0;
        }
        let years = i64::from(to.year()) - i64::from(from.year());
        let months = i64::from(to.month()) - i64::from(from.month());
        let mut total = years * 12 + months;
        if to.day() < from.day() {
            total -= 1;
        }
        u32::try_from(total.max(0)).unwrap_or(u32::MAX)
    }

    /// Computes depreciation as of the given date.
    #[must_use]
    pub fn compute(input: &DepreciationInput, as_of: NaiveDate) -> Depreciation {
        let value = input.value.max(Decimal::ZERO);
        let elapsed = Self::elapsed_months(input.purchase_date, as_of);
        let total_months = u64::from(input.useful_life_years) * 12;

        let (monthly, accumulated) = if total_months == 0 {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            let total = Decimal::from(total_months);
            let monthly = value / total;
            // value * elapsed / total keeps the exact product before truncation
            let accumulated = value
                .checked_mul(Decimal::from(elapsed))
                .and_then(|v| v.checked_div(total))
                .unwrap_or_else(|| monthly.saturating_mul(Decimal::from(elapsed)));
            (monthly, accumulated)
        };

        let accumulated = truncate(accumulated).clamp(Decimal::ZERO, value);
        let current_value = (value - accumulated).max(Decimal::ZERO);

        let depreciation_percentage = if value > Decimal::ZERO {
            accumulated
                .checked_mul(Decimal::ONE_HUNDRED)
                .map_or_else(
                    || accumulated / value * Decimal::ONE_HUNDRED,
                    |scaled| scaled / value,
                )
                .floor()
                .to_u8()
                .unwrap_or(100)
                .min(100)
        } else {
            0
        };

        Depreciation {
            as_of,
            elapsed_months: elapsed,
            monthly_depreciation: truncate(monthly),
            accumulated_depreciation: accumulated,
            current_value,
            depreciation_percentage,
        }
    }

    /// Computes depreciation for an asset.
    #[must_use]
    pub fn for_asset(asset: &Asset, as_of: NaiveDate) -> Depreciation {
        Self::compute(&DepreciationInput::from(asset), as_of)
    }
}

fn truncate(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DepreciationCalculator::MONEY_SCALE, RoundingStrategy::ToZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(value: Decimal, years: u32, purchased: NaiveDate) -> DepreciationInput {
        DepreciationInput {
            value,
            useful_life_years: years,
            purchase_date: purchased,
        }
    }

    #[test]
    fn test_elapsed_months() {
        assert_eq!(
            DepreciationCalculator::elapsed_months(date(2023, 1, 15), date(2023, 2, 14)),
            0
        );
        assert_eq!(
            DepreciationCalculator::elapsed_months(date(2023, 1, 15), date(2023, 2, 15)),
            1
        );
        assert_eq!(
            DepreciationCalculator::elapsed_months(date(2023, 1, 15), date(2024, 1, 15)),
            12
        );
        assert_eq!(
            DepreciationCalculator::elapsed_months(date(2023, 1, 31), date(2023, 2, 28)),
            0
        );
    }

    #[test]
    fn test_elapsed_months_clamped_for_future_purchase() {
        assert_eq!(
            DepreciationCalculator::elapsed_months(date(2025, 6, 1), date(2024, 6, 1)),
            0
        );
    }

    #[test]
    fn test_laptop_monthly_depreciation() {
        let result = DepreciationCalculator::compute(
            &input(dec!(15000000), 4, date(2023, 1, 15)),
            date(2024, 1, 15),
        );
        assert_eq!(result.monthly_depreciation, dec!(312500));
        assert_eq!(result.elapsed_months, 12);
        assert_eq!(result.accumulated_depreciation, dec!(3750000));
        assert_eq!(result.current_value, dec!(11250000));
        assert_eq!(result.depreciation_percentage, 25);
    }

    #[test]
    fn test_zero_useful_life_does_not_depreciate() {
        let result = DepreciationCalculator::compute(
            &input(dec!(5000), 0, date(2020, 1, 1)),
            date(2024, 1, 1),
        );
        assert_eq!(result.monthly_depreciation, Decimal::ZERO);
        assert_eq!(result.accumulated_depreciation, Decimal::ZERO);
        assert_eq!(result.current_value, dec!(5000));
        assert_eq!(result.depreciation_percentage, 0);
    }

    #[test]
    fn test_zero_value() {
        let result = DepreciationCalculator::compute(
            &input(Decimal::ZERO, 5, date(2020, 1, 1)),
            date(2024, 1, 1),
        );
        assert_eq!(result.current_value, Decimal::ZERO);
        assert_eq!(result.depreciation_percentage, 0);
    }

    #[test]
    fn test_accumulated_capped_at_value() {
        let result = DepreciationCalculator::compute(
            &input(dec!(1200), 1, date(2010, 3, 1)),
            date(2024, 3, 1),
        );
        assert_eq!(result.accumulated_depreciation, dec!(1200));
        assert_eq!(result.current_value, Decimal::ZERO);
        assert_eq!(result.depreciation_percentage, 100);
    }

    #[test]
    fn test_non_terminating_division_truncates() {
        // 1000 / 36 = 27.777...
        let result = DepreciationCalculator::compute(
            &input(dec!(1000), 3, date(2023, 1, 1)),
            date(2023, 11, 1),
        );
        assert_eq!(result.monthly_depreciation, dec!(27.77));
        assert_eq!(result.accumulated_depreciation, dec!(277.77));
        assert_eq!(result.current_value, dec!(722.23));
        assert_eq!(result.depreciation_percentage, 27);
    }

    #[test]
    fn test_full_life_reaches_value_exactly() {
        let result = DepreciationCalculator::compute(
            &input(dec!(1000), 3, date(2020, 1, 1)),
            date(2023, 1, 1),
        );
        assert_eq!(result.accumulated_depreciation, dec!(1000));
        assert_eq!(result.current_value, Decimal::ZERO);
    }

    #[test]
    fn test_percentage_is_floored() {
        // 10 of 12 months on 1 year → 83.33% → 83
        let result = DepreciationCalculator::compute(
            &input(dec!(1200), 1, date(2023, 1, 1)),
            date(2023, 11, 1),
        );
        assert_eq!(result.accumulated_depreciation, dec!(1000));
        assert_eq!(result.depreciation_percentage, 83);
    }
}
