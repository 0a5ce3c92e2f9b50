//! Asset registry backed by the memory store.

use std::sync::Arc;

use assetra_core::EngineError;
use assetra_core::asset::{Asset, AssetStatus, NewAsset, format_tag};
use assetra_core::ports::{AssetRegistry, Clock};
use assetra_shared::types::{AssetId, UnitId};
use chrono::{DateTime, Utc};

use crate::store::{MemoryStore, StoreState};

/// Asset repository.
#[derive(Clone)]
pub struct AssetRepository {
    store: MemoryStore,
    clock: Arc<dyn Clock>,
}

impl AssetRepository {
    /// Creates a new asset repository.
    #[must_use]
    pub fn new(store: MemoryStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

impl AssetRegistry for AssetRepository {
    async fn get(&self, id: AssetId) -> Result<Option<Asset>, EngineError> {
        Ok(self.store.read(|s| s.asset(id).cloned()).await)
    }

    async fn list(&self) -> Result<Vec<Asset>, EngineError> {
        Ok(self.store.read(|s| s.assets.clone()).await)
    }

    async fn update_unit(&self, id: AssetId, unit_id: UnitId) -> Result<Asset, EngineError> {
        self.store
            .transaction(|state| {
                if !state.units.contains_key(&unit_id) {
                    return Err(EngineError::not_found("unit", unit_id));
                }
                let asset = state.asset_mut(id)?;
                asset.unit_id = Some(unit_id);
                Ok(asset.clone())
            })
            .await
    }

    async fn update_status(&self, id: AssetId, status: AssetStatus) -> Result<Asset, EngineError> {
        self.store
            .transaction(|state| {
                let asset = state.asset_mut(id)?;
                asset.status = status;
                Ok(asset.clone())
            })
            .await
    }

    async fn create_batch(&self, candidates: Vec<NewAsset>) -> Result<Vec<Asset>, EngineError> {
        let now = self.clock.now();
        let created = self
            .store
            .transaction(|state| create_assets(state, candidates, now))
            .await?;
        tracing::info!(count = created.len(), "assets created");
        Ok(created)
    }
}

/// Materializes candidates with fresh ids and tags. Any unknown unit fails
/// the whole batch.
fn create_assets(
    state: &mut StoreState,
    candidates: Vec<NewAsset>,
    now: DateTime<Utc>,
) -> Result<Vec<Asset>, EngineError> {
    let mut created = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if let Some(unit_id) = candidate.unit_id
            && !state.units.contains_key(&unit_id)
        {
            return Err(EngineError::not_found("unit", unit_id));
        }
        let tag = format_tag(candidate.purchase_date, state.next_tag_sequence()?);
        let asset = candidate.into_asset(AssetId::new(), tag, now);
        state.assets.push(asset.clone());
        created.push(asset);
    }
    Ok(created)
}
