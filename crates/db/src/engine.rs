//! The engine facade.
//!
//! Every operation resolves the current actor, checks the access policy,
//! then delegates to a repository. Photo existence is checked against the
//! file store before a transaction starts, so no I/O happens under the
//! store lock.

use std::sync::Arc;

use assetra_core::EngineError;
use assetra_core::asset::{Asset, Unit};
use assetra_core::depreciation::{Depreciation, DepreciationCalculator};
use assetra_core::incident::{IncidentReport, IncidentService};
use assetra_core::policy::{AccessPolicy, Action, Resource};
use assetra_core::ports::{Actor, AssetRegistry, Clock, FileStore, IdentityProvider, UnitDirectory};
use assetra_core::reports::{Report, ReportDomain, ReportFilter};
use assetra_core::storage::{CheckedPhoto, PhotoRef, PhotoStore, PhotoUpload};
use assetra_core::workflow::{AssetLoan, AssetMovement};
use assetra_shared::types::{AssetId, LoanId, MovementId, UnitId, UserId};
use chrono::NaiveDate;

use crate::repositories::{
    AssetRepository, ImportRepository, IncidentRepository, LoanRepository, ReportRepository,
    TransferRepository, UnitRepository,
};
use crate::store::MemoryStore;

/// Default currency label on reports.
pub const DEFAULT_CURRENCY: &str = "IDR";

/// Role-checked entry point for asset lifecycle operations.
pub struct AssetEngine<F: FileStore = PhotoStore> {
    assets: AssetRepository,
    units: UnitRepository,
    transfers: TransferRepository,
    loans: LoanRepository,
    incidents: IncidentRepository,
    imports: ImportRepository,
    reports: ReportRepository,
    files: F,
    clock: Arc<dyn Clock>,
    identity: Arc<dyn IdentityProvider>,
    policy: AccessPolicy,
    currency: String,
}

impl<F: FileStore> AssetEngine<F> {
    /// Creates an engine over `store` with the standard access policy.
    #[must_use]
    pub fn new(
        store: MemoryStore,
        files: F,
        clock: Arc<dyn Clock>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let assets = AssetRepository::new(store.clone(), Arc::clone(&clock));
        Self {
            imports: ImportRepository::new(assets.clone()),
            assets,
            units: UnitRepository::new(store.clone()),
            transfers: TransferRepository::new(store.clone()),
            loans: LoanRepository::new(store.clone()),
            incidents: IncidentRepository::new(store.clone()),
            reports: ReportRepository::new(store),
            files,
            clock,
            identity,
            policy: AccessPolicy::standard(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Replace the access policy.
    #[must_use]
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the currency label used on reports.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// The unit directory.
    #[must_use]
    pub fn units(&self) -> &UnitRepository {
        &self.units
    }

    fn authorize(&self, action: Action, resource: Resource) -> Result<Actor, EngineError> {
        let actor = self.identity.current_actor();
        if let Err(err) = self.policy.authorize(actor.role, action, resource) {
            tracing::warn!(user = %actor.id, role = %actor.role, %action, %resource, "forbidden");
            return Err(err);
        }
        Ok(actor)
    }

    async fn find_asset(&self, id: AssetId) -> Result<Asset, EngineError> {
        self.assets
            .get(id)
            .await?
            .ok_or_else(|| EngineError::not_found("asset", id))
    }

    async fn check_photo(&self, photo: Option<PhotoRef>) -> Result<Option<CheckedPhoto>, EngineError> {
        match photo {
            Some(photo) => {
                let stored = self.files.exists(&photo).await?;
                Ok(Some(CheckedPhoto { photo, stored }))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Request moving an asset to another unit.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not request transfers
    /// - The asset or unit is not found
    /// - The unit is the current one or inactive
    /// - A transfer is already pending for the asset
    pub async fn request_transfer(
        &self,
        asset_id: AssetId,
        to_unit: UnitId,
        notes: Option<String>,
    ) -> Result<AssetMovement, EngineError> {
        let actor = self.authorize(Action::Request, Resource::Transfer)?;
        let result = self
            .transfers
            .open(asset_id, to_unit, notes, actor.id, self.clock.now())
            .await;
        match &result {
            Ok(movement) => tracing::info!(
                movement = %movement.id,
                asset = %asset_id,
                to_unit = %to_unit,
                "transfer requested"
            ),
            Err(EngineError::Conflict(msg)) => tracing::warn!(asset = %asset_id, %msg, "transfer conflict"),
            Err(_) => {}
        }
        result
    }

    /// Approve a pending transfer and reassign the asset.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not approve transfers
    /// - The movement is not found
    /// - The movement is not pending
    pub async fn approve_transfer(&self, id: MovementId) -> Result<AssetMovement, EngineError> {
        let actor = self.authorize(Action::Approve, Resource::Transfer)?;
        let movement = self.transfers.approve(id, actor.id, self.clock.now()).await?;
        tracing::info!(
            movement = %id,
            asset = %movement.asset_id,
            to_unit = %movement.to_unit,
            "transfer approved"
        );
        Ok(movement)
    }

    /// Reject a pending transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not reject transfers
    /// - The movement is not found
    /// - The reason is blank
    /// - The movement is not pending
    pub async fn reject_transfer(
        &self,
        id: MovementId,
        reason: String,
    ) -> Result<AssetMovement, EngineError> {
        let actor = self.authorize(Action::Reject, Resource::Transfer)?;
        let movement = self
            .transfers
            .reject(id, actor.id, self.clock.now(), reason)
            .await?;
        tracing::info!(movement = %id, "transfer rejected");
        Ok(movement)
    }

    /// Pending transfers, oldest first, optionally touching one unit.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the actor may not view transfers.
    pub async fn list_pending_transfers(
        &self,
        unit: Option<UnitId>,
    ) -> Result<Vec<AssetMovement>, EngineError> {
        self.authorize(Action::View, Resource::Transfer)?;
        Ok(self.transfers.pending(unit).await)
    }

    /// All transfers of an asset, oldest first.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the actor may not view transfers.
    pub async fn movement_history(
        &self,
        asset_id: AssetId,
    ) -> Result<Vec<AssetMovement>, EngineError> {
        self.authorize(Action::View, Resource::Transfer)?;
        Ok(self.transfers.history(asset_id).await)
    }

    // ========================================================================
    // Loans
    // ========================================================================

    /// Request a loan dated today.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not request loans
    /// - The asset is not found or not loanable
    /// - The return date precedes today or the purpose is blank
    pub async fn request_loan(
        &self,
        asset_id: AssetId,
        borrower_id: UserId,
        expected_return_date: NaiveDate,
        purpose: impl Into<String>,
    ) -> Result<AssetLoan, EngineError> {
        let actor = self.authorize(Action::Request, Resource::Loan)?;
        let loan = self
            .loans
            .open(
                asset_id,
                borrower_id,
                expected_return_date,
                purpose.into(),
                actor.id,
                self.clock.now(),
            )
            .await?;
        tracing::info!(loan = %loan.id, asset = %asset_id, "loan requested");
        Ok(loan)
    }

    /// Approve a pending loan; the asset becomes `OnLoan`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not approve loans
    /// - The loan is not found or not pending
    /// - The date is after today
    /// - The proof photo is missing or was never uploaded
    /// - The asset is no longer loanable
    pub async fn approve_loan(
        &self,
        id: LoanId,
        approval_date: NaiveDate,
        proof_photo: Option<PhotoRef>,
    ) -> Result<AssetLoan, EngineError> {
        let actor = self.authorize(Action::Approve, Resource::Loan)?;
        let proof = self.check_photo(proof_photo).await?;
        let loan = self
            .loans
            .approve(id, actor.id, approval_date, proof, self.clock.today())
            .await?;
        tracing::info!(loan = %id, asset = %loan.asset_id, "loan approved");
        Ok(loan)
    }

    /// Reject a pending loan.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not reject loans
    /// - The loan is not found or not pending
    /// - The date is after today
    /// - The reason is not 10 to 500 characters once trimmed
    pub async fn reject_loan(
        &self,
        id: LoanId,
        approval_date: NaiveDate,
        reason: String,
    ) -> Result<AssetLoan, EngineError> {
        let actor = self.authorize(Action::Reject, Resource::Loan)?;
        let loan = self
            .loans
            .reject(id, actor.id, approval_date, reason, self.clock.today())
            .await?;
        tracing::info!(loan = %id, "loan rejected");
        Ok(loan)
    }

    /// Pending loans, oldest first.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the actor may not view loans.
    pub async fn list_pending_loans(&self) -> Result<Vec<AssetLoan>, EngineError> {
        self.authorize(Action::View, Resource::Loan)?;
        Ok(self.loans.pending().await)
    }

    /// All loans of an asset, oldest first.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the actor may not view loans.
    pub async fn loan_history(&self, asset_id: AssetId) -> Result<Vec<AssetLoan>, EngineError> {
        self.authorize(Action::View, Resource::Loan)?;
        Ok(self.loans.history(asset_id).await)
    }

    // ========================================================================
    // Incidents and photos
    // ========================================================================

    /// Record a loss or damage incident.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not create incidents
    /// - The asset is not found
    /// - The description is too short or the date is in the future
    /// - The evidence photo is missing or was never uploaded
    pub async fn report_incident(
        &self,
        asset_id: AssetId,
        description: &str,
        incident_date: NaiveDate,
        evidence_photo: Option<PhotoRef>,
    ) -> Result<IncidentReport, EngineError> {
        let actor = self.authorize(Action::Create, Resource::Incident)?;
        let asset = self.find_asset(asset_id).await?;
        let evidence = self.check_photo(evidence_photo).await?;
        let report = IncidentService::record(
            &asset,
            actor.id,
            description,
            incident_date,
            evidence,
            self.clock.now(),
        )?;
        let report = self.incidents.insert(report).await?;
        tracing::info!(incident = %report.id, asset = %asset_id, "incident reported");
        Ok(report)
    }

    /// Incidents recorded for an asset.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the actor may not view incidents.
    pub async fn incident_history(
        &self,
        asset_id: AssetId,
    ) -> Result<Vec<IncidentReport>, EngineError> {
        self.authorize(Action::View, Resource::Incident)?;
        Ok(self.incidents.for_asset(asset_id).await)
    }

    /// Store an evidence or proof photo.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not upload photos
    /// - The file is not an image or is too large
    /// - The file store fails
    pub async fn upload_photo(&self, upload: PhotoUpload) -> Result<PhotoRef, EngineError> {
        let actor = self.authorize(Action::Create, Resource::Photo)?;
        let photo = self.files.put(upload).await?;
        tracing::info!(user = %actor.id, photo = %photo, "photo uploaded");
        Ok(photo)
    }

    // ========================================================================
    // Register, import and reports
    // ========================================================================

    /// All registered assets.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the actor may not view assets.
    pub async fn list_assets(&self) -> Result<Vec<Asset>, EngineError> {
        self.authorize(Action::View, Resource::Asset)?;
        self.assets.list().await
    }

    /// Units that may receive transfers, ordered by ID.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the actor may not view assets.
    pub async fn list_active_units(&self) -> Result<Vec<Unit>, EngineError> {
        self.authorize(Action::View, Resource::Asset)?;
        self.units.active_units().await
    }

    /// Validate a CSV file and create every row, or nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not create assets
    /// - The header is malformed
    /// - Any row is invalid (all row errors are returned)
    /// - A referenced unit does not exist
    pub async fn validate_and_import(&self, csv_text: &str) -> Result<Vec<Asset>, EngineError> {
        let actor = self.authorize(Action::Create, Resource::Asset)?;
        let created = self.imports.import(csv_text).await?;
        tracing::info!(user = %actor.id, count = created.len(), "import committed");
        Ok(created)
    }

    /// Depreciation of one asset at `as_of`, or today.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not view assets
    /// - The asset is not found
    pub async fn compute_depreciation(
        &self,
        asset_id: AssetId,
        as_of: Option<NaiveDate>,
    ) -> Result<Depreciation, EngineError> {
        self.authorize(Action::View, Resource::Asset)?;
        let asset = self.find_asset(asset_id).await?;
        let as_of = as_of.unwrap_or_else(|| self.clock.today());
        tracing::debug!(asset = %asset_id, %as_of, "computing depreciation");
        Ok(DepreciationCalculator::for_asset(&asset, as_of))
    }

    /// Build a report for one domain.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor may not generate reports
    /// - The filter's date range is inverted
    pub async fn build_report(
        &self,
        domain: ReportDomain,
        filter: &ReportFilter,
    ) -> Result<Report, EngineError> {
        self.authorize(Action::Report, Resource::Report)?;
        let report = self
            .reports
            .build(domain, filter, self.clock.now(), &self.currency)
            .await?;
        tracing::debug!(%domain, rows = report.rows.len(), "report built");
        Ok(report)
    }
}
