//! Transfer repository: movement requests and their resolution.

use assetra_core::EngineError;
use assetra_core::workflow::{AssetMovement, RequestStatus, TransferService};
use assetra_shared::types::{AssetId, MovementId, UnitId, UserId};
use chrono::{DateTime, Utc};

use crate::store::MemoryStore;

/// Transfer repository.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    store: MemoryStore,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Opens a pending movement. The target unit lookup, the single-pending
    /// check and the insert share one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The unit or the asset is not found
    /// - The target is the current unit or inactive
    /// - A pending movement already exists for the asset
    pub async fn open(
        &self,
        asset_id: AssetId,
        to_unit: UnitId,
        notes: Option<String>,
        requested_by: UserId,
        requested_at: DateTime<Utc>,
    ) -> Result<AssetMovement, EngineError> {
        self.store
            .transaction(|state| {
                let target = state
                    .units
                    .get(&to_unit)
                    .ok_or_else(|| EngineError::not_found("unit", to_unit))?;
                let asset = state
                    .asset(asset_id)
                    .ok_or_else(|| EngineError::not_found("asset", asset_id))?;
                let pending_exists = state
                    .movements
                    .iter()
                    .any(|m| m.asset_id == asset_id && m.status == RequestStatus::Pending);
                let movement = TransferService::open(
                    asset,
                    target,
                    pending_exists,
                    notes,
                    requested_by,
                    requested_at,
                )?;
                state.movements.push(movement.clone());
                Ok(movement)
            })
            .await
    }

    /// Approves a pending movement and reassigns the asset.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The movement or its asset is not found
    /// - The movement is not pending
    pub async fn approve(
        &self,
        id: MovementId,
        validated_by: UserId,
        validated_at: DateTime<Utc>,
    ) -> Result<AssetMovement, EngineError> {
        self.store
            .transaction(|state| {
                let movement = state.movement_mut(id)?;
                let action = TransferService::approve(movement, validated_by, validated_at)?;
                movement.apply(&action);
                let movement = movement.clone();

                state.asset_mut(movement.asset_id)?.unit_id = Some(movement.to_unit);
                Ok(movement)
            })
            .await
    }

    /// Rejects a pending movement. The asset is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The movement is not found
    /// - The reason is blank
    /// - The movement is not pending
    pub async fn reject(
        &self,
        id: MovementId,
        validated_by: UserId,
        validated_at: DateTime<Utc>,
        rejection_reason: String,
    ) -> Result<AssetMovement, EngineError> {
        self.store
            .transaction(|state| {
                let movement = state.movement_mut(id)?;
                let action = TransferService::reject(
                    movement,
                    validated_by,
                    validated_at,
                    rejection_reason,
                )?;
                movement.apply(&action);
                Ok(movement.clone())
            })
            .await
    }

    /// Pending movements, oldest first.
    pub async fn pending(&self, unit: Option<UnitId>) -> Vec<AssetMovement> {
        self.store
            .read(|s| TransferService::pending_queue(&s.movements, unit))
            .await
    }

    /// Every movement of an asset, oldest first.
    pub async fn history(&self, asset_id: AssetId) -> Vec<AssetMovement> {
        let mut movements: Vec<AssetMovement> = self
            .store
            .read(|s| {
                s.movements
                    .iter()
                    .filter(|m| m.asset_id == asset_id)
                    .cloned()
                    .collect()
            })
            .await;
        movements.sort_by(|a, b| {
            a.requested_at
                .cmp(&b.requested_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        movements
    }
}
