//! Straight-line depreciation.
//!
//! Pure computation from asset attributes and an as-of date. Reports reuse
//! these outputs verbatim so every view shows the same truncated figures.

pub mod calculator;

#[cfg(test)]
mod calculator_props;

pub use calculator::{Depreciation, DepreciationCalculator, DepreciationInput};
