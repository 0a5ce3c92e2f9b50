//! Report repository: runs report aggregation over a store snapshot.

use assetra_core::EngineError;
use assetra_core::reports::{Report, ReportDomain, ReportFilter, ReportInput, ReportService};
use chrono::{DateTime, Utc};

use crate::store::MemoryStore;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    store: MemoryStore,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Builds a report from a consistent snapshot.
    ///
    /// # Errors
    ///
    /// `Validation` if the filter's date range is inverted.
    pub async fn build(
        &self,
        domain: ReportDomain,
        filter: &ReportFilter,
        generated_at: DateTime<Utc>,
        currency: &str,
    ) -> Result<Report, EngineError> {
        self.store
            .read(|s| {
                let input = ReportInput {
                    assets: &s.assets,
                    movements: &s.movements,
                    loans: &s.loans,
                    incidents: &s.incidents,
                };
                ReportService::build(domain, input, filter, generated_at, currency)
            })
            .await
    }
}
