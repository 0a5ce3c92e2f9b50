//! Unit directory backed by the memory store.

use assetra_core::EngineError;
use assetra_core::asset::Unit;
use assetra_core::ports::UnitDirectory;
use assetra_shared::types::UnitId;

use crate::store::MemoryStore;

/// Unit repository.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    store: MemoryStore,
}

impl UnitRepository {
    /// Creates a new unit repository.
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Inserts or replaces a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the store transaction fails.
    pub async fn upsert(&self, unit: Unit) -> Result<Unit, EngineError> {
        self.store
            .transaction(|state| {
                state.units.insert(unit.id, unit.clone());
                Ok(unit)
            })
            .await
    }
}

impl UnitDirectory for UnitRepository {
    async fn get(&self, id: UnitId) -> Result<Option<Unit>, EngineError> {
        Ok(self.store.read(|s| s.units.get(&id).cloned()).await)
    }

    async fn active_units(&self) -> Result<Vec<Unit>, EngineError> {
        Ok(self
            .store
            .read(|s| s.units.values().filter(|u| u.active).cloned().collect())
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: i64, active: bool) -> Unit {
        Unit {
            id: UnitId(id),
            code: format!("U{id}"),
            name: format!("Unit {id}"),
            active,
        }
    }

    #[tokio::test]
    async fn test_active_units_ordered_by_id() {
        let repo = UnitRepository::new(MemoryStore::with_units([
            unit(3, true),
            unit(1, true),
            unit(2, false),
        ]));
        let ids: Vec<i64> = repo
            .active_units()
            .await
            .unwrap()
            .iter()
            .map(|u| u.id.get())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let repo = UnitRepository::new(MemoryStore::new());
        repo.upsert(unit(1, true)).await.unwrap();
        repo.upsert(unit(1, false)).await.unwrap();
        assert!(!repo.get(UnitId(1)).await.unwrap().unwrap().active);
        assert!(repo.get(UnitId(2)).await.unwrap().is_none());
    }
}
