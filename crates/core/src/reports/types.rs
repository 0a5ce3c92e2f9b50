//! Report data types.

use std::collections::BTreeMap;
use std::fmt;

use assetra_shared::types::{AssetId, UnitId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::asset::AssetStatus;
use crate::error::EngineError;
use crate::incident::IncidentReport;
use crate::workflow::{AssetLoan, AssetMovement};

/// Which records a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportDomain {
    /// Asset register.
    Assets,
    /// Transfer requests.
    Transfers,
    /// Loan requests.
    Loans,
    /// Incident reports.
    Incidents,
}

impl ReportDomain {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assets => "assets",
            Self::Transfers => "transfers",
            Self::Loans => "loans",
            Self::Incidents => "incidents",
        }
    }

    /// Parses a domain name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "assets" => Some(Self::Assets),
            "transfers" => Some(Self::Transfers),
            "loans" => Some(Self::Loans),
            "incidents" => Some(Self::Incidents),
            _ => None,
        }
    }
}

impl fmt::Display for ReportDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Only rows touching this unit.
    pub unit_id: Option<UnitId>,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    /// Asset status (asset reports only).
    pub status: Option<AssetStatus>,
    /// Depreciation date; defaults to today.
    pub as_of: Option<NaiveDate>,
}

impl ReportFilter {
    /// Rejects an inverted date range.
    ///
    /// # Errors
    ///
    /// `Validation` if `from` is after `to`.
    pub fn validate(&self) -> Result<(), EngineError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(EngineError::validation(format!(
                "invalid date range: start {from} is after end {to}"
            ))),
            _ => Ok(()),
        }
    }

    /// Whether `date` falls inside the range.
    #[must_use]
    pub fn includes_date(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Whether `unit` passes the unit filter.
    #[must_use]
    pub fn includes_unit(&self, unit: Option<UnitId>) -> bool {
        self.unit_id.is_none_or(|wanted| unit == Some(wanted))
    }
}

/// A summary cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryValue {
    /// A row count.
    Count(u64),
    /// A money amount.
    Amount(Decimal),
}

impl SummaryValue {
    /// Count from a length.
    #[must_use]
    pub fn count(n: usize) -> Self {
        Self::Count(u64::try_from(n).unwrap_or(u64::MAX))
    }
}

/// Asset register row with depreciation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReportRow {
    /// Asset ID.
    pub asset_id: AssetId,
    /// Asset tag.
    pub tag: String,
    /// Asset name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Owning unit.
    pub unit_id: Option<UnitId>,
    /// Current status.
    pub status: AssetStatus,
    /// Purchase date.
    pub purchase_date: NaiveDate,
    /// Acquisition value.
    pub value: Decimal,
    /// Useful life in years.
    pub useful_life_years: u32,
    /// Whole months since purchase.
    pub elapsed_months: u32,
    /// Monthly depreciation.
    pub monthly_depreciation: Decimal,
    /// Accumulated depreciation.
    pub accumulated_depreciation: Decimal,
    /// Book value.
    pub current_value: Decimal,
    /// Share of value depreciated, floored.
    pub depreciation_percentage: u8,
}

/// Transfer history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReportRow {
    /// Tag of the moved asset.
    pub asset_tag: String,
    /// The movement.
    #[serde(flatten)]
    pub movement: AssetMovement,
}

/// Loan history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanReportRow {
    /// Tag of the lent asset.
    pub asset_tag: String,
    /// The loan.
    #[serde(flatten)]
    pub loan: AssetLoan,
}

/// Incident log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReportRow {
    /// Tag of the affected asset.
    pub asset_tag: String,
    /// The incident.
    #[serde(flatten)]
    pub incident: IncidentReport,
}

/// Rows of a report, by domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportRows {
    /// Asset rows.
    Assets(Vec<AssetReportRow>),
    /// Transfer rows.
    Transfers(Vec<TransferReportRow>),
    /// Loan rows.
    Loans(Vec<LoanReportRow>),
    /// Incident rows.
    Incidents(Vec<IncidentReportRow>),
}

impl ReportRows {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Assets(rows) => rows.len(),
            Self::Transfers(rows) => rows.len(),
            Self::Loans(rows) => rows.len(),
            Self::Incidents(rows) => rows.len(),
        }
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Domain covered.
    pub domain: ReportDomain,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
    /// Depreciation date used.
    pub as_of: NaiveDate,
    /// Currency label for amounts.
    pub currency: String,
    /// Filter applied.
    pub filter: ReportFilter,
    /// Rows.
    pub rows: ReportRows,
    /// Totals and counts.
    pub summary: BTreeMap<String, SummaryValue>,
}
