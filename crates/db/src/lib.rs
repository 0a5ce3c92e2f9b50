//! Storage layer and engine facade.
//!
//! This crate provides:
//! - [`MemoryStore`], a single-lock store with all-or-nothing transactions
//! - Repositories that run the core rules inside store transactions
//! - [`AssetEngine`], the role-checked entry point for every operation

pub mod engine;
pub mod repositories;
pub mod store;

pub use engine::AssetEngine;
pub use repositories::{
    AssetRepository, ImportRepository, IncidentRepository, LoanRepository, ReportRepository,
    TransferRepository, UnitRepository,
};
pub use store::{MemoryStore, StoreState};
