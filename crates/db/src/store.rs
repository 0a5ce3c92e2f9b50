//! In-memory store with transactional writes.
//!
//! All state sits behind one async mutex. A transaction locks it, runs the
//! closure against a staged copy and swaps the copy in only if the closure
//! returns `Ok`, so a failed check leaves nothing behind.

use std::collections::BTreeMap;
use std::sync::Arc;

use assetra_core::EngineError;
use assetra_core::asset::{Asset, Unit};
use assetra_core::incident::IncidentReport;
use assetra_core::workflow::{AssetLoan, AssetMovement};
use assetra_shared::types::{AssetId, LoanId, MovementId, UnitId};
use tokio::sync::Mutex;

/// Everything the store holds.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    /// Assets in creation order.
    pub assets: Vec<Asset>,
    /// Units by id.
    pub units: BTreeMap<UnitId, Unit>,
    /// Movements in request order.
    pub movements: Vec<AssetMovement>,
    /// Loans in request order.
    pub loans: Vec<AssetLoan>,
    /// Incidents in recording order.
    pub incidents: Vec<IncidentReport>,
    /// Last tag sequence number handed out.
    pub tag_sequence: u64,
}

impl StoreState {
    /// Find an asset.
    #[must_use]
    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Find an asset for update.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such asset exists.
    pub fn asset_mut(&mut self, id: AssetId) -> Result<&mut Asset, EngineError> {
        self.assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| EngineError::not_found("asset", id))
    }

    /// Find a movement for update.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such movement exists.
    pub fn movement_mut(&mut self, id: MovementId) -> Result<&mut AssetMovement, EngineError> {
        self.movements
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| EngineError::not_found("transfer", id))
    }

    /// Find a loan for update.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such loan exists.
    pub fn loan_mut(&mut self, id: LoanId) -> Result<&mut AssetLoan, EngineError> {
        self.loans
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| EngineError::not_found("loan", id))
    }

    /// Next tag sequence number.
    ///
    /// # Errors
    ///
    /// `Infrastructure` once the sequence is exhausted.
    pub fn next_tag_sequence(&mut self) -> Result<u64, EngineError> {
        self.tag_sequence = self
            .tag_sequence
            .checked_add(1)
            .ok_or_else(|| EngineError::Infrastructure("asset tag sequence exhausted".into()))?;
        Ok(self.tag_sequence)
    }
}

/// Shared handle to the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `units`.
    #[must_use]
    pub fn with_units(units: impl IntoIterator<Item = Unit>) -> Self {
        let state = StoreState {
            units: units.into_iter().map(|u| (u.id, u)).collect(),
            ..StoreState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Runs a read-only closure under the lock.
    pub async fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let guard = self.state.lock().await;
        f(&guard)
    }

    /// Runs `f` as one transaction.
    ///
    /// `f` works on a full copy of the state, so each write costs time
    /// proportional to the whole store, not to the records it touches.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns; the store is then left untouched.
    pub async fn transaction<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut guard = self.state.lock().await;
        let mut staged = guard.clone();
        let out = f(&mut staged)?;
        *guard = staged;
        Ok(out)
    }
}
