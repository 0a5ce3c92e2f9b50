//! Inter-unit transfer requests.
//!
//! A movement is opened against an asset's current unit and resolved once,
//! by approval (which reassigns the asset) or rejection. The store is
//! responsible for running the check and the write as one atomic step; the
//! rules here are pure.

use assetra_shared::types::{AssetId, MovementId, UnitId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::{Asset, Unit};
use crate::error::EngineError;
use crate::workflow::types::{RequestStatus, ensure_pending};

/// A request to move an asset between units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMovement {
    /// Movement ID.
    pub id: MovementId,
    /// Asset being moved.
    pub asset_id: AssetId,
    /// Asset's unit when the request was opened.
    pub from_unit: Option<UnitId>,
    /// Destination unit.
    pub to_unit: UnitId,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Who opened the request.
    pub requested_by: UserId,
    /// When the request was opened.
    pub requested_at: DateTime<Utc>,
    /// Who resolved the request.
    pub validated_by: Option<UserId>,
    /// When the request was resolved.
    pub validated_at: Option<DateTime<Utc>>,
    /// Free-text notes from the requester.
    pub notes: Option<String>,
    /// Present only when rejected.
    pub rejection_reason: Option<String>,
}

impl AssetMovement {
    /// Applies a resolution produced by [`TransferService`].
    pub fn apply(&mut self, action: &TransferAction) {
        self.status = action.new_status();
        match action {
            TransferAction::Approve {
                validated_by,
                validated_at,
            } => {
                self.validated_by = Some(*validated_by);
                self.validated_at = Some(*validated_at);
            }
            TransferAction::Reject {
                validated_by,
                validated_at,
                rejection_reason,
            } => {
                self.validated_by = Some(*validated_by);
                self.validated_at = Some(*validated_at);
                self.rejection_reason = Some(rejection_reason.clone());
            }
        }
    }

    /// Returns true if either end of the movement is `unit`.
    #[must_use]
    pub fn touches_unit(&self, unit: UnitId) -> bool {
        self.to_unit == unit || self.from_unit == Some(unit)
    }
}

/// Resolution of a pending movement, with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferAction {
    /// Approve and reassign the asset.
    Approve {
        /// The approver.
        validated_by: UserId,
        /// When it was approved.
        validated_at: DateTime<Utc>,
    },
    /// Reject without touching the asset.
    Reject {
        /// The approver.
        validated_by: UserId,
        /// When it was rejected.
        validated_at: DateTime<Utc>,
        /// Why.
        rejection_reason: String,
    },
}

impl TransferAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> RequestStatus {
        match self {
            Self::Approve { .. } => RequestStatus::Approved,
            Self::Reject { .. } => RequestStatus::Rejected,
        }
    }
}

/// Stateless transfer rules.
pub struct TransferService;

impl TransferService {
    /// Opens a pending movement.
    ///
    /// # Errors
    ///
    /// - `Validation` if the target is the asset's current unit or is inactive
    /// - `Conflict` if the asset already has a pending movement
    pub fn open(
        asset: &Asset,
        target: &Unit,
        pending_exists: bool,
        notes: Option<String>,
        requested_by: UserId,
        requested_at: DateTime<Utc>,
    ) -> Result<AssetMovement, EngineError> {
        if asset.unit_id == Some(target.id) {
            return Err(EngineError::validation(format!(
                "asset {} is already in unit {}",
                asset.tag, target.id
            )));
        }
        if !target.active {
            return Err(EngineError::validation(format!(
                "unit {} is inactive",
                target.id
            )));
        }
        if pending_exists {
            return Err(EngineError::Conflict(format!(
                "asset {} already has a pending transfer",
                asset.tag
            )));
        }

        Ok(AssetMovement {
            id: MovementId::new(),
            asset_id: asset.id,
            from_unit: asset.unit_id,
            to_unit: target.id,
            status: RequestStatus::Pending,
            requested_by,
            requested_at,
            validated_by: None,
            validated_at: None,
            notes: notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            rejection_reason: None,
        })
    }

    /// Approve a pending movement.
    ///
    /// # Errors
    ///
    /// `AlreadyResolved` if the movement is not pending.
    pub fn approve(
        movement: &AssetMovement,
        validated_by: UserId,
        validated_at: DateTime<Utc>,
    ) -> Result<TransferAction, EngineError> {
        ensure_pending("transfer", movement.id, movement.status)?;
        Ok(TransferAction::Approve {
            validated_by,
            validated_at,
        })
    }

    /// Reject a pending movement.
    ///
    /// # Errors
    ///
    /// - `Validation` if the reason is blank
    /// - `AlreadyResolved` if the movement is not pending
    pub fn reject(
        movement: &AssetMovement,
        validated_by: UserId,
        validated_at: DateTime<Utc>,
        rejection_reason: String,
    ) -> Result<TransferAction, EngineError> {
        if rejection_reason.trim().is_empty() {
            return Err(EngineError::validation("rejection reason is required"));
        }
        ensure_pending("transfer", movement.id, movement.status)?;
        Ok(TransferAction::Reject {
            validated_by,
            validated_at,
            rejection_reason,
        })
    }

    /// Pending movements, oldest request first, optionally limited to
    /// movements leaving or entering `unit`.
    #[must_use]
    pub fn pending_queue<'a>(
        movements: impl IntoIterator<Item = &'a AssetMovement>,
        unit: Option<UnitId>,
    ) -> Vec<AssetMovement> {
        let mut pending: Vec<AssetMovement> = movements
            .into_iter()
            .filter(|m| m.status == RequestStatus::Pending)
            .filter(|m| unit.is_none_or(|u| m.touches_unit(u)))
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
