//! Core business logic for Assetra.
//!
//! This crate contains pure business logic with ZERO persistence dependencies.
//! All domain types, validation rules, and calculations live here; the db
//! crate supplies storage and runs each rule inside a store transaction.
//!
//! # Modules
//!
//! - `asset` - Asset register types, status sets and tag format
//! - `workflow` - Transfer and loan request state machines
//! - `incident` - Write-once loss and damage reports
//! - `import` - Bulk CSV import validation
//! - `depreciation` - Straight-line depreciation
//! - `reports` - Per-domain report aggregation
//! - `policy` - Role-based access checks
//! - `ports` - Collaborator traits (registry, units, files, clock, identity)
//! - `storage` - OpenDAL-backed photo store

pub mod asset;
pub mod depreciation;
pub mod error;
pub mod import;
pub mod incident;
pub mod policy;
pub mod ports;
pub mod reports;
pub mod storage;
pub mod workflow;

pub use error::{EngineError, ErrorKind, RowError};
