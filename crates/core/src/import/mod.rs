//! Bulk asset import from CSV text.
//!
//! The accepted grammar is deliberately narrow: comma separated, no quoting,
//! exactly seven fields per row. Validation is pure and collects every row
//! error; the batch is realized only if no row failed.

mod parser;
mod types;

#[cfg(test)]
mod tests;

pub use parser::{EXPECTED_HEADER, FIELD_COUNT, parse};
pub use types::{CandidateRow, ImportBatch};
