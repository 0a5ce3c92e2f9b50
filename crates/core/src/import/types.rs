//! Import batch types.

use crate::asset::NewAsset;
use crate::error::{EngineError, RowError};

/// A row that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    /// Row number; the header is row 1.
    pub row: usize,
    /// The asset to create.
    pub asset: NewAsset,
}

/// Result of validating a whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    /// Rows that passed, in file order.
    pub rows: Vec<CandidateRow>,
    /// Every error found, in file order.
    pub errors: Vec<RowError>,
}

impl ImportBatch {
    /// Returns true if no row failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Rows whose index appears in the error list.
    #[must_use]
    pub fn failed_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.errors.iter().map(|e| e.row).collect();
        rows.dedup();
        rows
    }

    /// The creation candidates, or every collected error.
    ///
    /// # Errors
    ///
    /// `RowsInvalid` if any row failed.
    pub fn into_candidates(self) -> Result<Vec<NewAsset>, EngineError> {
        if self.errors.is_empty() {
            Ok(self.rows.into_iter().map(|r| r.asset).collect())
        } else {
            Err(EngineError::RowsInvalid(self.errors))
        }
    }
}
