//! Loss and damage incident reports.
//!
//! Reports are write-once and never change the asset's status; marking an
//! asset `Lost` is a separate decision.

use assetra_shared::types::{AssetId, IncidentId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::error::EngineError;
use crate::storage::{CheckedPhoto, PhotoRef};

/// Minimum description length, in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// A recorded incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReport {
    /// Incident ID.
    pub id: IncidentId,
    /// Affected asset.
    pub asset_id: AssetId,
    /// Reporter.
    pub reported_by: UserId,
    /// What happened.
    pub description: String,
    /// When it happened.
    pub incident_date: NaiveDate,
    /// Evidence photo.
    pub evidence_photo: PhotoRef,
    /// When the report was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Stateless incident rules.
pub struct IncidentService;

impl IncidentService {
    /// Validate and build an incident report.
    ///
    /// # Errors
    ///
    /// `Validation` if the description is shorter than 10 characters, the
    /// date is after `recorded_at`'s date, or the evidence photo is missing
    /// or not stored.
    pub fn record(
        asset: &Asset,
        reported_by: UserId,
        description: &str,
        incident_date: NaiveDate,
        evidence: Option<CheckedPhoto>,
        recorded_at: DateTime<Utc>,
    ) -> Result<IncidentReport, EngineError> {
        let description = description.trim();
        if description.chars().count() < DESCRIPTION_MIN_CHARS {
            return Err(EngineError::validation(format!(
                "description must be at least {DESCRIPTION_MIN_CHARS} characters"
            )));
        }
        let today = recorded_at.date_naive();
        if incident_date > today {
            return Err(EngineError::validation(format!(
                "incident date {incident_date} is in the future"
            )));
        }
        let evidence =
            evidence.ok_or_else(|| EngineError::validation("evidence photo is required"))?;
        if !evidence.stored {
            return Err(EngineError::validation(format!(
                "evidence photo {} has not been uploaded",
                evidence.photo
            )));
        }

        Ok(IncidentReport {
            id: IncidentId::new(),
            asset_id: asset.id,
            reported_by,
            description: description.to_string(),
            incident_date,
            evidence_photo: evidence.photo,
            recorded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetStatus;
    use chrono::{Days, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    fn asset() -> Asset {
        Asset {
            id: AssetId::new(),
            tag: "AST-202402-000003".to_string(),
            name: "Camera".to_string(),
            category: "AV".to_string(),
            unit_id: None,
            value: dec!(8000000),
            purchase_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            useful_life_years: 4,
            status: AssetStatus::OnLoan,
            created_at: now(),
        }
    }

    fn evidence(stored: bool) -> Option<CheckedPhoto> {
        Some(CheckedPhoto {
            photo: PhotoRef("photos/e/evidence.png".to_string()),
            stored,
        })
    }

    #[test]
    fn test_record_incident() {
        let asset = asset();
        let report = IncidentService::record(
            &asset,
            UserId::new(),
            "  Dropped during transport  ",
            now().date_naive(),
            evidence(true),
            now(),
        )
        .unwrap();
        assert_eq!(report.asset_id, asset.id);
        assert_eq!(report.description, "Dropped during transport");
        assert_eq!(report.evidence_photo.key(), "photos/e/evidence.png");
    }

    #[test]
    fn test_short_description_fails() {
        let result = IncidentService::record(
            &asset(),
            UserId::new(),
            "Broken",
            now().date_naive(),
            evidence(true),
            now(),
        );
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_future_date_fails() {
        let result = IncidentService::record(
            &asset(),
            UserId::new(),
            "Screen cracked in storage",
            now().date_naive() + Days::new(1),
            evidence(true),
            now(),
        );
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_evidence_required_and_stored() {
        for photo in [None, evidence(false)] {
            let result = IncidentService::record(
                &asset(),
                UserId::new(),
                "Screen cracked in storage",
                now().date_naive(),
                photo,
                now(),
            );
            assert!(matches!(result, Err(EngineError::Validation(_))));
        }
    }
}
