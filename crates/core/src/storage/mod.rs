//! Photo storage using Apache OpenDAL.
//!
//! Evidence (incident) and proof-of-loan photos are stored as opaque objects
//! and referenced from records by [`PhotoRef`]. Only `image/*` content up to
//! the configured size (2 MiB by default) is accepted.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{CheckedPhoto, PhotoRef, PhotoStore, PhotoUpload};
