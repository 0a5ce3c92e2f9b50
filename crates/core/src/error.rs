//! Engine error taxonomy.
//!
//! Every operation except bulk import fails fast on the first violated
//! precondition. Bulk import collects all row errors into
//! [`EngineError::RowsInvalid`] so the caller can fix a file in one pass.

use std::fmt;

use assetra_shared::AppError;
use serde::Serialize;
use thiserror::Error;

use crate::policy::{Action, Resource, UserRole};
use crate::storage::StorageError;

/// Coarse error category, stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed header or structure.
    Format,
    /// A field or argument violates a business rule.
    Validation,
    /// The operation would violate the single-pending invariant.
    Conflict,
    /// Attempted transition from an ineligible state.
    State,
    /// Referenced entity is missing.
    NotFound,
    /// The actor's role is not granted the operation.
    Forbidden,
    /// An injected collaborator failed.
    Infrastructure,
}

/// A single validation failure inside a CSV import batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// Row number; the header is row 1.
    pub row: usize,
    /// Column the error refers to, if any.
    pub field: Option<&'static str>,
    /// Human-readable message.
    pub message: String,
}

impl RowError {
    /// Error for a specific column.
    #[must_use]
    pub fn field(row: usize, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            row,
            field: Some(field),
            message: message.into(),
        }
    }

    /// Error for the row as a whole.
    #[must_use]
    pub fn row(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "row {} ({field}): {}", self.row, self.message),
            None => write!(f, "row {}: {}", self.row, self.message),
        }
    }
}

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input structure.
    #[error("Malformed input: {0}")]
    Format(String),

    /// A field or argument violates a business rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// One or more import rows failed validation; nothing was created.
    #[error("Import rejected: {} row error(s)", .0.len())]
    RowsInvalid(Vec<RowError>),

    /// Single-pending invariant would be violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request was already approved or rejected.
    #[error("{entity} {id} is already {status}")]
    AlreadyResolved {
        /// Entity kind ("transfer", "loan").
        entity: &'static str,
        /// Entity id.
        id: String,
        /// Terminal status observed.
        status: String,
    },

    /// Any other ineligible state.
    #[error("Invalid state: {0}")]
    State(String),

    /// Referenced entity is missing.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Entity id.
        id: String,
    },

    /// Role gate refused the operation.
    #[error("Role {role} may not {action} {resource}")]
    Forbidden {
        /// Actor's role.
        role: UserRole,
        /// Attempted action.
        action: Action,
        /// Target resource.
        resource: Resource,
    },

    /// Collaborator failure, propagated unmodified.
    #[error("Infrastructure failure: {0}")]
    Infrastructure(String),
}

impl EngineError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) => ErrorKind::Format,
            Self::Validation(_) | Self::RowsInvalid(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::AlreadyResolved { .. } | Self::State(_) => ErrorKind::State,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Format | ErrorKind::Validation => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict | ErrorKind::State => 409,
            ErrorKind::Infrastructure => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Format(_) => "FORMAT_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::RowsInvalid(_) => "IMPORT_ROWS_INVALID",
            Self::Conflict(_) => "PENDING_CONFLICT",
            Self::AlreadyResolved { .. } => "ALREADY_RESOLVED",
            Self::State(_) => "INVALID_STATE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Infrastructure(_) => "INFRASTRUCTURE_ERROR",
        }
    }

    /// Row errors carried by a rejected import, empty for other variants.
    #[must_use]
    pub fn row_errors(&self) -> &[RowError] {
        match self {
            Self::RowsInvalid(errors) => errors,
            _ => &[],
        }
    }
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        if err.is_rejected_upload() {
            Self::Validation(err.to_string())
        } else {
            Self::Infrastructure(err.to_string())
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Format => Self::Format(message),
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::State => Self::InvalidState(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Forbidden => Self::Forbidden(message),
            ErrorKind::Infrastructure => Self::ExternalService(message),
        }
    }
}
