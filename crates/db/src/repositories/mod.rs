//! Repository abstractions for data access.
//!
//! Each repository wraps the shared [`MemoryStore`](crate::MemoryStore) and
//! runs the core rules for its entity inside one store transaction, so a
//! precondition check and the write it guards cannot interleave with
//! another request.

pub mod asset;
pub mod import;
pub mod incident;
pub mod loan;
pub mod report;
pub mod transfer;
pub mod unit;

pub use asset::AssetRepository;
pub use import::ImportRepository;
pub use incident::IncidentRepository;
pub use loan::LoanRepository;
pub use report::ReportRepository;
pub use transfer::TransferRepository;
pub use unit::UnitRepository;
