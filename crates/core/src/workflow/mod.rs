//! Transfer and loan request workflows.
//!
//! Both follow the same lifecycle (see [`RequestStatus`]): a request is opened
//! as PENDING and resolved exactly once. The services here are pure; the db
//! crate runs each check together with its write in one store transaction.

pub mod loan;
pub mod transfer;
pub mod types;

#[cfg(test)]
mod service_props;

pub use loan::{AssetLoan, LoanDecision, LoanService, REASON_MAX_CHARS, REASON_MIN_CHARS};
pub use transfer::{AssetMovement, TransferAction, TransferService};
pub use types::RequestStatus;
