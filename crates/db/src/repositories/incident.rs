//! Incident repository.

use assetra_core::EngineError;
use assetra_core::incident::IncidentReport;
use assetra_shared::types::AssetId;

use crate::store::MemoryStore;

/// Incident repository. Reports are append-only.
#[derive(Debug, Clone)]
pub struct IncidentRepository {
    store: MemoryStore,
}

impl IncidentRepository {
    /// Creates a new incident repository.
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Appends a validated report.
    ///
    /// # Errors
    ///
    /// `NotFound` if the asset no longer exists.
    pub async fn insert(&self, report: IncidentReport) -> Result<IncidentReport, EngineError> {
        self.store
            .transaction(|state| {
                if state.asset(report.asset_id).is_none() {
                    return Err(EngineError::not_found("asset", report.asset_id));
                }
                state.incidents.push(report.clone());
                Ok(report)
            })
            .await
    }

    /// Reports for one asset, in recording order.
    pub async fn for_asset(&self, asset_id: AssetId) -> Vec<IncidentReport> {
        self.store
            .read(|s| {
                s.incidents
                    .iter()
                    .filter(|i| i.asset_id == asset_id)
                    .cloned()
                    .collect()
            })
            .await
    }
}
