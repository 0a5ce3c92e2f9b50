//! Bulk import: pure validation followed by one atomic registry write.

use assetra_core::EngineError;
use assetra_core::asset::Asset;
use assetra_core::import;
use assetra_core::ports::AssetRegistry;

use super::asset::AssetRepository;

/// Import repository, generic over the registry it writes to.
#[derive(Clone)]
pub struct ImportRepository<R: AssetRegistry = AssetRepository> {
    registry: R,
}

impl<R: AssetRegistry> ImportRepository<R> {
    /// Creates a new import repository.
    #[must_use]
    pub const fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Validates `csv_text` and creates every row, or nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The header is malformed (`Format`)
    /// - Any row fails validation (`RowsInvalid`, listing every failure)
    /// - The registry rejects the batch
    pub async fn import(&self, csv_text: &str) -> Result<Vec<Asset>, EngineError> {
        let batch = import::parse(csv_text)?;
        if !batch.is_valid() {
            tracing::warn!(
                errors = batch.errors.len(),
                rows = ?batch.failed_rows(),
                "import rejected"
            );
        }
        let candidates = batch.into_candidates()?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        self.registry.create_batch(candidates).await
    }
}
