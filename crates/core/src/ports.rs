//! Collaborator interfaces the engine consumes.
//!
//! These traits are implemented by the db crate (registry, unit directory)
//! and by [`crate::storage`] (photo store). Clock and identity are injected
//! so tests run deterministically.

use std::future::Future;
use std::sync::Mutex;

use assetra_shared::types::{AssetId, UnitId, UserId};
use chrono::{DateTime, NaiveDate, Utc};

use crate::asset::{Asset, AssetStatus, NewAsset, Unit};
use crate::error::EngineError;
use crate::policy::UserRole;
use crate::storage::{PhotoRef, PhotoUpload};

/// Canonical store of asset records.
pub trait AssetRegistry: Send + Sync {
    /// Find an asset by ID.
    fn get(
        &self,
        id: AssetId,
    ) -> impl Future<Output = Result<Option<Asset>, EngineError>> + Send;

    /// All assets, in creation order.
    fn list(&self) -> impl Future<Output = Result<Vec<Asset>, EngineError>> + Send;

    /// Reassign an asset's unit.
    fn update_unit(
        &self,
        id: AssetId,
        unit_id: UnitId,
    ) -> impl Future<Output = Result<Asset, EngineError>> + Send;

    /// Change an asset's status.
    fn update_status(
        &self,
        id: AssetId,
        status: AssetStatus,
    ) -> impl Future<Output = Result<Asset, EngineError>> + Send;

    /// Create all candidates atomically, generating a unique tag for each.
    fn create_batch(
        &self,
        candidates: Vec<NewAsset>,
    ) -> impl Future<Output = Result<Vec<Asset>, EngineError>> + Send;
}

/// Directory of organizational units.
pub trait UnitDirectory: Send + Sync {
    /// Find a unit by ID.
    fn get(&self, id: UnitId) -> impl Future<Output = Result<Option<Unit>, EngineError>> + Send;

    /// Units that may receive transfers.
    fn active_units(&self) -> impl Future<Output = Result<Vec<Unit>, EngineError>> + Send;
}

/// Binary store for evidence and proof-of-loan photos.
pub trait FileStore: Send + Sync {
    /// Validate and persist a photo.
    fn put(
        &self,
        upload: PhotoUpload,
    ) -> impl Future<Output = Result<PhotoRef, EngineError>> + Send;

    /// Whether a reference points at a stored photo.
    fn exists(&self, photo: &PhotoRef) -> impl Future<Output = Result<bool, EngineError>> + Send;

    /// Read a stored photo.
    fn read(&self, photo: &PhotoRef) -> impl Future<Output = Result<Vec<u8>, EngineError>> + Send;
}

/// The user on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID stamped on requester/validator fields.
    pub id: UserId,
    /// Role checked against the access policy.
    pub role: UserRole,
}

impl Actor {
    /// Create an actor.
    #[must_use]
    pub const fn new(id: UserId, role: UserRole) -> Self {
        Self { id, role }
    }
}

/// Supplies the current actor.
pub trait IdentityProvider: Send + Sync {
    /// The actor performing the current operation.
    fn current_actor(&self) -> Actor;
}

/// A fixed actor, for single-user tools and tests.
#[derive(Debug)]
pub struct StaticIdentity {
    actor: Mutex<Actor>,
}

impl StaticIdentity {
    /// Create a provider that always returns `actor`.
    #[must_use]
    pub fn new(actor: Actor) -> Self {
        Self {
            actor: Mutex::new(actor),
        }
    }

    /// Switch to another actor.
    pub fn set(&self, actor: Actor) {
        let mut guard = self
            .actor
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = actor;
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_actor(&self) -> Actor {
        *self
            .actor
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Time source for timestamps and date-boundary checks.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current date (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self
            .now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self
            .now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_today_and_advance() {
        let start = Utc.with_ymd_and_hms(2024, 5, 31, 23, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());

        clock.advance(chrono::Duration::hours(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_static_identity_switch() {
        let first = Actor::new(UserId::new(), UserRole::Staff);
        let second = Actor::new(UserId::new(), UserRole::Manager);
        let identity = StaticIdentity::new(first);
        assert_eq!(identity.current_actor(), first);

        identity.set(second);
        assert_eq!(identity.current_actor(), second);
    }
}
