//! Request lifecycle types shared by transfers and loans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Status of a transfer or loan request.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
///
/// Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved (terminal).
    Approved,
    /// Rejected (terminal).
    Rejected,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fails with [`EngineError::AlreadyResolved`] once `status` is terminal.
pub(crate) fn ensure_pending(
    entity: &'static str,
    id: impl ToString,
    status: RequestStatus,
) -> Result<(), EngineError> {
    if !status.is_terminal() {
        Ok(())
    } else {
        Err(EngineError::AlreadyResolved {
            entity,
            id: id.to_string(),
            status: status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(RequestStatus::Pending.to_string(), "PENDING");
        assert_eq!(RequestStatus::Rejected.to_string(), "REJECTED");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_ensure_pending() {
        assert!(ensure_pending("loan", "x", RequestStatus::Pending).is_ok());
        let err = ensure_pending("loan", "x", RequestStatus::Rejected).unwrap_err();
        assert_eq!(err.to_string(), "loan x is already REJECTED");
        let err = ensure_pending("transfer", "y", RequestStatus::Approved).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::State);
    }

    #[test]
    fn test_serde_uppercase() {
        let json = serde_json::to_string(&RequestStatus::Approved).unwrap();
        assert_eq!(json, "\"APPROVED\"");
    }
}
