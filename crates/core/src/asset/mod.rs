//! Asset register domain types.
//!
//! # Modules
//!
//! - `types` - Asset, Unit, status set and creation candidates
//! - `tag` - Generated asset tag format

pub mod tag;
pub mod types;

pub use tag::format_tag;
pub use types::{Asset, AssetStatus, CREATABLE_STATUSES, LOANABLE_STATUSES, NewAsset, Unit};
