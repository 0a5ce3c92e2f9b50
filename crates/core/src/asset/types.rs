//! Asset and unit types.

use std::fmt;

use assetra_shared::types::{AssetId, UnitId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an asset.
///
/// Parsing is case-insensitive and only happens at the boundary
/// (CSV import and deserialization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum AssetStatus {
    /// Assigned and in active use.
    InUse,
    /// Available in storage.
    Idle,
    /// Under maintenance.
    InRepair,
    /// Lent out through an approved loan.
    OnLoan,
    /// Reported lost.
    Lost,
    /// Sold off.
    Sold,
}

/// Statuses a newly created asset may start in.
pub const CREATABLE_STATUSES: [AssetStatus; 3] =
    [AssetStatus::InUse, AssetStatus::Idle, AssetStatus::InRepair];

/// Statuses from which an asset may be lent.
pub const LOANABLE_STATUSES: [AssetStatus; 2] = [AssetStatus::InUse, AssetStatus::Idle];

impl AssetStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::InUse,
        Self::Idle,
        Self::InRepair,
        Self::OnLoan,
        Self::Lost,
        Self::Sold,
    ];

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InUse => "InUse",
            Self::Idle => "Idle",
            Self::InRepair => "InRepair",
            Self::OnLoan => "OnLoan",
            Self::Lost => "Lost",
            Self::Sold => "Sold",
        }
    }

    /// Parses a status, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(needle))
    }

    /// Returns true if a new asset may start in this status.
    #[must_use]
    pub fn is_creatable(&self) -> bool {
        CREATABLE_STATUSES.contains(self)
    }

    /// Returns true if a loan may be requested or approved from this status.
    #[must_use]
    pub fn is_loanable(&self) -> bool {
        LOANABLE_STATUSES.contains(self)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AssetStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown asset status: {value}"))
    }
}

/// An organizational unit that can own assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unit number.
    pub id: UnitId,
    /// Short code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Inactive units cannot receive transfers.
    pub active: bool,
}

/// A registered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset ID.
    pub id: AssetId,
    /// Generated unique tag.
    pub tag: String,
    /// Asset name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Owning unit, if assigned.
    pub unit_id: Option<UnitId>,
    /// Acquisition value in whole currency units.
    pub value: Decimal,
    /// Purchase date.
    pub purchase_date: NaiveDate,
    /// Useful life in whole years.
    pub useful_life_years: u32,
    /// Current status.
    pub status: AssetStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// A validated creation candidate, before a tag and id are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    /// Asset name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Owning unit, if any.
    pub unit_id: Option<UnitId>,
    /// Acquisition value in whole currency units.
    pub value: Decimal,
    /// Purchase date.
    pub purchase_date: NaiveDate,
    /// Useful life in whole years.
    pub useful_life_years: u32,
    /// Initial status; one of [`CREATABLE_STATUSES`].
    pub status: AssetStatus,
}

impl NewAsset {
    /// Materializes the candidate with the given id, tag and creation time.
    #[must_use]
    pub fn into_asset(self, id: AssetId, tag: String, created_at: DateTime<Utc>) -> Asset {
        Asset {
            id,
            tag,
            name: self.name,
            category: self.category,
            unit_id: self.unit_id,
            value: self.value,
            purchase_date: self.purchase_date,
            useful_life_years: self.useful_life_years,
            status: self.status,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("InUse", Some(AssetStatus::InUse))]
    #[case("inuse", Some(AssetStatus::InUse))]
    #[case("INREPAIR", Some(AssetStatus::InRepair))]
    #[case(" OnLoan ", Some(AssetStatus::OnLoan))]
    #[case("sold", Some(AssetStatus::Sold))]
    #[case("in use", None)]
    #[case("broken", None)]
    #[case("", None)]
    fn test_status_parse(#[case] input: &str, #[case] expected: Option<AssetStatus>) {
        assert_eq!(AssetStatus::parse(input), expected);
    }

    #[test]
    fn test_creatable_and_loanable_sets() {
        assert!(AssetStatus::InUse.is_creatable());
        assert!(AssetStatus::InRepair.is_creatable());
        assert!(!AssetStatus::OnLoan.is_creatable());
        assert!(!AssetStatus::Sold.is_creatable());

        assert!(AssetStatus::Idle.is_loanable());
        assert!(!AssetStatus::InRepair.is_loanable());
        assert!(!AssetStatus::OnLoan.is_loanable());
        assert!(!AssetStatus::Lost.is_loanable());
    }

    #[test]
    fn test_status_serde_is_case_insensitive() {
        let status: AssetStatus = serde_json::from_str("\"onloan\"").unwrap();
        assert_eq!(status, AssetStatus::OnLoan);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"OnLoan\"");
        assert!(serde_json::from_str::<AssetStatus>("\"gone\"").is_err());
    }
}
