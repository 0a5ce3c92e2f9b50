//! Asset loan requests.
//!
//! Approval needs a proof photo that is already in the file store and an
//! asset that is still loanable; the asset then moves to `OnLoan`. Two loans
//! may be pending for the same asset, and whichever is approved first wins.

use assetra_shared::types::{AssetId, LoanId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::{Asset, AssetStatus};
use crate::error::EngineError;
use crate::storage::{CheckedPhoto, PhotoRef};
use crate::workflow::types::{RequestStatus, ensure_pending};

/// Minimum rejection reason length, in characters.
pub const REASON_MIN_CHARS: usize = 10;

/// Maximum rejection reason length, in characters.
pub const REASON_MAX_CHARS: usize = 500;

/// A request to lend an asset to a borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLoan {
    /// Loan ID.
    pub id: LoanId,
    /// Asset being lent.
    pub asset_id: AssetId,
    /// Who receives the asset.
    pub borrower_id: UserId,
    /// Who opened the request.
    pub requested_by: UserId,
    /// When the request was opened.
    pub requested_at: DateTime<Utc>,
    /// Request date (clock today at request time).
    pub request_date: NaiveDate,
    /// Expected return, never before `request_date`.
    pub expected_return_date: NaiveDate,
    /// Purpose of the loan.
    pub purpose: String,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Who approved or rejected.
    pub decided_by: Option<UserId>,
    /// Decision date.
    pub decision_date: Option<NaiveDate>,
    /// Proof photo, present once approved.
    pub proof_photo: Option<PhotoRef>,
    /// Present only when rejected.
    pub rejection_reason: Option<String>,
}

impl AssetLoan {
    /// Applies a decision produced by [`LoanService`].
    pub fn apply(&mut self, decision: &LoanDecision) {
        self.status = decision.new_status();
        match decision {
            LoanDecision::Approve {
                decided_by,
                decision_date,
                proof_photo,
            } => {
                self.decided_by = Some(*decided_by);
                self.decision_date = Some(*decision_date);
                self.proof_photo = Some(proof_photo.clone());
            }
            LoanDecision::Reject {
                decided_by,
                decision_date,
                rejection_reason,
            } => {
                self.decided_by = Some(*decided_by);
                self.decision_date = Some(*decision_date);
                self.rejection_reason = Some(rejection_reason.clone());
            }
        }
    }
}

/// Resolution of a pending loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanDecision {
    /// Approve; the asset becomes `OnLoan`.
    Approve {
        /// The approver.
        decided_by: UserId,
        /// Approval date.
        decision_date: NaiveDate,
        /// Stored proof photo.
        proof_photo: PhotoRef,
    },
    /// Reject; the asset is untouched.
    Reject {
        /// The approver.
        decided_by: UserId,
        /// Rejection date.
        decision_date: NaiveDate,
        /// Reason, stored verbatim.
        rejection_reason: String,
    },
}

impl LoanDecision {
    /// Returns the new status resulting from this decision.
    #[must_use]
    pub fn new_status(&self) -> RequestStatus {
        match self {
            Self::Approve { .. } => RequestStatus::Approved,
            Self::Reject { .. } => RequestStatus::Rejected,
        }
    }

    /// Asset status to set alongside the decision, if any.
    #[must_use]
    pub fn asset_status(&self) -> Option<AssetStatus> {
        match self {
            Self::Approve { .. } => Some(AssetStatus::OnLoan),
            Self::Reject { .. } => None,
        }
    }
}

/// Stateless loan rules.
pub struct LoanService;

impl LoanService {
    /// Opens a pending loan dated `today`.
    ///
    /// # Errors
    ///
    /// - `Validation` if the expected return precedes today or purpose is blank
    /// - `State` if the asset is not in a loanable status
    pub fn open(
        asset: &Asset,
        borrower_id: UserId,
        expected_return_date: NaiveDate,
        purpose: &str,
        requested_by: UserId,
        requested_at: DateTime<Utc>,
    ) -> Result<AssetLoan, EngineError> {
        let request_date = requested_at.date_naive();
        if expected_return_date < request_date {
            return Err(EngineError::validation(format!(
                "expected return date {expected_return_date} is before request date {request_date}"
            )));
        }
        let purpose = purpose.trim();
        if purpose.is_empty() {
            return Err(EngineError::validation("purpose is required"));
        }
        if !asset.status.is_loanable() {
            return Err(EngineError::State(format!(
                "asset {} is {} and cannot be lent",
                asset.tag, asset.status
            )));
        }

        Ok(AssetLoan {
            id: LoanId::new(),
            asset_id: asset.id,
            borrower_id,
            requested_by,
            requested_at,
            request_date,
            expected_return_date,
            purpose: purpose.to_string(),
            status: RequestStatus::Pending,
            decided_by: None,
            decision_date: None,
            proof_photo: None,
            rejection_reason: None,
        })
    }

    /// Approve a pending loan.
    ///
    /// Checks run in order: loan pending, date not in the future, proof photo
    /// supplied and stored, asset still loanable.
    ///
    /// # Errors
    ///
    /// - `AlreadyResolved` if the loan is not pending
    /// - `Validation` for a future date or a missing/unstored photo
    /// - `State` if the asset is no longer loanable
    pub fn approve(
        loan: &AssetLoan,
        asset_status: AssetStatus,
        decided_by: UserId,
        decision_date: NaiveDate,
        proof: Option<CheckedPhoto>,
        today: NaiveDate,
    ) -> Result<LoanDecision, EngineError> {
        ensure_pending("loan", loan.id, loan.status)?;
        ensure_not_future(decision_date, today)?;

        let proof = proof.ok_or_else(|| EngineError::validation("proof photo is required"))?;
        if !proof.stored {
            return Err(EngineError::validation(format!(
                "proof photo {} has not been uploaded",
                proof.photo
            )));
        }
        if !asset_status.is_loanable() {
            return Err(EngineError::State(format!(
                "asset is {asset_status} and cannot be lent"
            )));
        }

        Ok(LoanDecision::Approve {
            decided_by,
            decision_date,
            proof_photo: proof.photo,
        })
    }

    /// Reject a pending loan. The reason is length-checked on its trimmed
    /// form and stored as given.
    ///
    /// # Errors
    ///
    /// - `AlreadyResolved` if the loan is not pending
    /// - `Validation` for a future date or a reason outside 10..=500 characters
    pub fn reject(
        loan: &AssetLoan,
        decided_by: UserId,
        decision_date: NaiveDate,
        rejection_reason: String,
        today: NaiveDate,
    ) -> Result<LoanDecision, EngineError> {
        ensure_pending("loan", loan.id, loan.status)?;
        ensure_not_future(decision_date, today)?;

        let len = rejection_reason.trim().chars().count();
        if !(REASON_MIN_CHARS..=REASON_MAX_CHARS).contains(&len) {
            return Err(EngineError::validation(format!(
                "rejection reason must be {REASON_MIN_CHARS}-{REASON_MAX_CHARS} characters, got {len}"
            )));
        }

        Ok(LoanDecision::Reject {
            decided_by,
            decision_date,
            rejection_reason,
        })
    }

    /// Pending loans, oldest request first.
    #[must_use]
    pub fn pending_queue<'a>(loans: impl IntoIterator<Item = &'a AssetLoan>) -> Vec<AssetLoan> {
        let mut pending: Vec<AssetLoan> = loans
            .into_iter()
            .filter(|l| l.status == RequestStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            a.requested_at
                .cmp(&b.requested_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        pending
    }
}

fn ensure_not_future(date: NaiveDate, today: NaiveDate) -> Result<(), EngineError> {
    if date > today {
        return Err(EngineError::validation(format!(
            "decision date {date} is after today ({today})"
        )));
    }
    Ok(())
}
