//! Loan repository: loan requests and their resolution.

use assetra_core::EngineError;
use assetra_core::storage::CheckedPhoto;
use assetra_core::workflow::{AssetLoan, LoanService};
use assetra_shared::types::{AssetId, LoanId, UserId};
use chrono::{DateTime, NaiveDate, Utc};

use crate::store::MemoryStore;

/// Loan repository.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    store: MemoryStore,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Opens a pending loan.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The asset is not found
    /// - The return date or purpose is invalid
    /// - The asset is not loanable
    pub async fn open(
        &self,
        asset_id: AssetId,
        borrower_id: UserId,
        expected_return_date: NaiveDate,
        purpose: String,
        requested_by: UserId,
        requested_at: DateTime<Utc>,
    ) -> Result<AssetLoan, EngineError> {
        self.store
            .transaction(|state| {
                let asset = state
                    .asset(asset_id)
                    .ok_or_else(|| EngineError::not_found("asset", asset_id))?;
                let loan = LoanService::open(
                    asset,
                    borrower_id,
                    expected_return_date,
                    &purpose,
                    requested_by,
                    requested_at,
                )?;
                state.loans.push(loan.clone());
                Ok(loan)
            })
            .await
    }

    /// Approves a pending loan and marks the asset `OnLoan`. The asset's
    /// loanability is re-read inside the transaction, so of two pending loans
    /// on one asset only the first approval succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The loan or its asset is not found
    /// - The loan is not pending
    /// - The date is in the future or the proof photo is missing
    /// - The asset is no longer loanable
    pub async fn approve(
        &self,
        id: LoanId,
        decided_by: UserId,
        decision_date: NaiveDate,
        proof: Option<CheckedPhoto>,
        today: NaiveDate,
    ) -> Result<AssetLoan, EngineError> {
        self.store
            .transaction(|state| {
                let loan = state.loan_mut(id)?.clone();
                let asset_status = state.asset_mut(loan.asset_id)?.status;
                let decision = LoanService::approve(
                    &loan,
                    asset_status,
                    decided_by,
                    decision_date,
                    proof,
                    today,
                )?;

                if let Some(status) = decision.asset_status() {
                    state.asset_mut(loan.asset_id)?.status = status;
                }
                let loan = state.loan_mut(id)?;
                loan.apply(&decision);
                Ok(loan.clone())
            })
            .await
    }

    /// Rejects a pending loan. The asset is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The loan is not found
    /// - The loan is not pending
    /// - The date is in the future or the reason length is out of range
    pub async fn reject(
        &self,
        id: LoanId,
        decided_by: UserId,
        decision_date: NaiveDate,
        rejection_reason: String,
        today: NaiveDate,
    ) -> Result<AssetLoan, EngineError> {
        self.store
            .transaction(|state| {
                let loan = state.loan_mut(id)?;
                let decision =
                    LoanService::reject(loan, decided_by, decision_date, rejection_reason, today)?;
                loan.apply(&decision);
                Ok(loan.clone())
            })
            .await
    }

    /// Pending loans, oldest first.
    pub async fn pending(&self) -> Vec<AssetLoan> {
        self.store
            .read(|s| LoanService::pending_queue(&s.loans))
            .await
    }

    /// Every loan of an asset, oldest first.
    pub async fn history(&self, asset_id: AssetId) -> Vec<AssetLoan> {
        let mut loans: Vec<AssetLoan> = self
            .store
            .read(|s| {
                s.loans
                    .iter()
                    .filter(|l| l.asset_id == asset_id)
                    .cloned()
                    .collect()
            })
            .await;
        loans.sort_by(|a, b| {
            a.requested_at
                .cmp(&b.requested_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        loans
    }
}
