//! Report generation service.

use std::collections::{BTreeMap, HashMap};

use assetra_shared::types::AssetId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::types::{
    AssetReportRow, IncidentReportRow, LoanReportRow, Report, ReportDomain, ReportFilter,
    ReportRows, SummaryValue, TransferReportRow,
};
use crate::asset::{Asset, AssetStatus};
use crate::depreciation::DepreciationCalculator;
use crate::error::EngineError;
use crate::incident::IncidentReport;
use crate::workflow::{AssetLoan, AssetMovement, RequestStatus};

/// Snapshot of everything a report may draw from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    /// Registered assets.
    pub assets: &'a [Asset],
    /// All movements.
    pub movements: &'a [AssetMovement],
    /// All loans.
    pub loans: &'a [AssetLoan],
    /// All incidents.
    pub incidents: &'a [IncidentReport],
}

/// Service for generating reports.
pub struct ReportService;

impl ReportService {
    /// Builds a report for `domain`.
    ///
    /// Depreciation is evaluated at `filter.as_of`, or at `generated_at`'s
    /// date when unset.
    ///
    /// # Errors
    ///
    /// `Validation` if the filter's date range is inverted.
    pub fn build(
        domain: ReportDomain,
        input: ReportInput<'_>,
        filter: &ReportFilter,
        generated_at: DateTime<Utc>,
        currency: &str,
    ) -> Result<Report, EngineError> {
        filter.validate()?;
        let as_of = filter.as_of.unwrap_or_else(|| generated_at.date_naive());
        let assets_by_id: HashMap<AssetId, &Asset> =
            input.assets.iter().map(|a| (a.id, a)).collect();

        let (rows, summary) = match domain {
            ReportDomain::Assets => {
                let rows = Self::asset_rows(input.assets, filter, as_of);
                let summary = Self::asset_summary(&rows);
                (ReportRows::Assets(rows), summary)
            }
            ReportDomain::Transfers => {
                let rows = Self::transfer_rows(input.movements, &assets_by_id, filter);
                let summary = Self::workflow_summary(rows.iter().map(|r| r.movement.status));
                (ReportRows::Transfers(rows), summary)
            }
            ReportDomain::Loans => {
                let rows = Self::loan_rows(input.loans, &assets_by_id, filter);
                let summary = Self::workflow_summary(rows.iter().map(|r| r.loan.status));
                (ReportRows::Loans(rows), summary)
            }
            ReportDomain::Incidents => {
                let rows = Self::incident_rows(input.incidents, &assets_by_id, filter);
                let mut summary = BTreeMap::new();
                summary.insert("total".to_string(), SummaryValue::count(rows.len()));
                (ReportRows::Incidents(rows), summary)
            }
        };

        Ok(Report {
            domain,
            generated_at,
            as_of,
            currency: currency.to_string(),
            filter: filter.clone(),
            rows,
            summary,
        })
    }

    /// Asset rows matching the filter, with depreciation at `as_of`.
    #[must_use]
    pub fn asset_rows(
        assets: &[Asset],
        filter: &ReportFilter,
        as_of: chrono::NaiveDate,
    ) -> Vec<AssetReportRow> {
        assets
            .iter()
            .filter(|a| filter.includes_unit(a.unit_id))
            .filter(|a| filter.includes_date(a.purchase_date))
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .map(|asset| {
                let dep = DepreciationCalculator::for_asset(asset, as_of);
                AssetReportRow {
                    asset_id: asset.id,
                    tag: asset.tag.clone(),
                    name: asset.name.clone(),
                    category: asset.category.clone(),
                    unit_id: asset.unit_id,
                    status: asset.status,
                    purchase_date: asset.purchase_date,
                    value: asset.value,
                    useful_life_years: asset.useful_life_years,
                    elapsed_months: dep.elapsed_months,
                    monthly_depreciation: dep.monthly_depreciation,
                    accumulated_depreciation: dep.accumulated_depreciation,
                    current_value: dep.current_value,
                    depreciation_percentage: dep.depreciation_percentage,
                }
            })
            .collect()
    }

    /// Totals over asset rows, plus one count per status.
    #[must_use]
    pub fn asset_summary(rows: &[AssetReportRow]) -> BTreeMap<String, SummaryValue> {
        let total_value: Decimal = rows.iter().map(|r| r.value).sum();
        let total_accumulated: Decimal = rows.iter().map(|r| r.accumulated_depreciation).sum();
        let total_current: Decimal = rows.iter().map(|r| r.current_value).sum();

        let mut summary = BTreeMap::new();
        summary.insert("asset_count".to_string(), SummaryValue::count(rows.len()));
        summary.insert("total_value".to_string(), SummaryValue::Amount(total_value));
        summary.insert(
            "total_accumulated_depreciation".to_string(),
            SummaryValue::Amount(total_accumulated),
        );
        summary.insert(
            "total_current_value".to_string(),
            SummaryValue::Amount(total_current),
        );
        for status in AssetStatus::ALL {
            let count = rows.iter().filter(|r| r.status == status).count();
            summary.insert(
                format!("status_{}", status.as_str()),
                SummaryValue::count(count),
            );
        }
        summary
    }

    /// Counts by request status.
    #[must_use]
    pub fn workflow_summary(
        statuses: impl Iterator<Item = RequestStatus>,
    ) -> BTreeMap<String, SummaryValue> {
        let (mut pending, mut approved, mut rejected) = (0usize, 0usize, 0usize);
        for status in statuses {
            match status {
                RequestStatus::Pending => pending += 1,
                RequestStatus::Approved => approved += 1,
                RequestStatus::Rejected => rejected += 1,
            }
        }

        let mut summary = BTreeMap::new();
        summary.insert(
            "total".to_string(),
            SummaryValue::count(pending + approved + rejected),
        );
        summary.insert("pending".to_string(), SummaryValue::count(pending));
        summary.insert("approved".to_string(), SummaryValue::count(approved));
        summary.insert("rejected".to_string(), SummaryValue::count(rejected));
        summary
    }

    fn transfer_rows(
        movements: &[AssetMovement],
        assets: &HashMap<AssetId, &Asset>,
        filter: &ReportFilter,
    ) -> Vec<TransferReportRow> {
        let mut rows: Vec<TransferReportRow> = movements
            .iter()
            .filter(|m| filter.unit_id.is_none_or(|u| m.touches_unit(u)))
            .filter(|m| filter.includes_date(m.requested_at.date_naive()))
            .map(|m| TransferReportRow {
                asset_tag: tag_of(assets, m.asset_id),
                movement: m.clone(),
            })
            .collect();
        rows.sort_by(|a, b| {
            a.movement
                .requested_at
                .cmp(&b.movement.requested_at)
                .then_with(|| a.movement.id.cmp(&b.movement.id))
        });
        rows
    }

    fn loan_rows(
        loans: &[AssetLoan],
        assets: &HashMap<AssetId, &Asset>,
        filter: &ReportFilter,
    ) -> Vec<LoanReportRow> {
        let mut rows: Vec<LoanReportRow> = loans
            .iter()
            .filter(|l| filter.includes_unit(assets.get(&l.asset_id).and_then(|a| a.unit_id)))
            .filter(|l| filter.includes_date(l.request_date))
            .map(|l| LoanReportRow {
                asset_tag: tag_of(assets, l.asset_id),
                loan: l.clone(),
            })
            .collect();
        rows.sort_by(|a, b| {
            a.loan
                .requested_at
                .cmp(&b.loan.requested_at)
                .then_with(|| a.loan.id.cmp(&b.loan.id))
        });
        rows
    }

    fn incident_rows(
        incidents: &[IncidentReport],
        assets: &HashMap<AssetId, &Asset>,
        filter: &ReportFilter,
    ) -> Vec<IncidentReportRow> {
        let mut rows: Vec<IncidentReportRow> = incidents
            .iter()
            .filter(|i| filter.includes_unit(assets.get(&i.asset_id).and_then(|a| a.unit_id)))
            .filter(|i| filter.includes_date(i.incident_date))
            .map(|i| IncidentReportRow {
                asset_tag: tag_of(assets, i.asset_id),
                incident: i.clone(),
            })
            .collect();
        rows.sort_by(|a, b| {
            a.incident
                .incident_date
                .cmp(&b.incident.incident_date)
                .then_with(|| a.incident.recorded_at.cmp(&b.incident.recorded_at))
        });
        rows
    }
}

fn tag_of(assets: &HashMap<AssetId, &Asset>, id: AssetId) -> String {
    assets
        .get(&id)
        .map_or_else(|| id.to_string(), |a| a.tag.clone())
}
