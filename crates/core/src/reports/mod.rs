//! Report generation.
//!
//! Pure aggregation over registry and workflow snapshots:
//! - Asset register with depreciation at a given date
//! - Transfer history
//! - Loan history
//! - Incident log

pub mod service;
pub mod types;


pub use service::{ReportInput, ReportService};
pub use types::*;
