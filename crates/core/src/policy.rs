//! Role-based access policy.
//!
//! Authorization is an explicit lookup keyed by `(role, action, resource)`.
//! The engine consults the policy before every operation; callers are
//! trusted to supply the right actor, identity itself is not verified here.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// User role in the organization hierarchy.
///
/// Roles are ordered from lowest to highest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Can view assets and reports.
    Viewer = 0,
    /// Can request transfers and loans, and report incidents.
    Staff = 1,
    /// Can approve/reject requests and import assets.
    Manager = 2,
    /// Full access.
    Admin = 3,
}

impl UserRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "staff" => Some(Self::Staff),
            "manager" => Some(Self::Manager),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Staff => "staff",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }

    const ALL: [Self; 4] = [Self::Viewer, Self::Staff, Self::Manager, Self::Admin];
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation an actor attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Open a new request.
    Request,
    /// Approve a pending request.
    Approve,
    /// Reject a pending request.
    Reject,
    /// Create records directly (imports, incident reports).
    Create,
    /// Generate reports.
    Report,
    /// Read records.
    View,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Request => "request",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Create => "create",
            Self::Report => "report",
            Self::View => "view",
        };
        f.write_str(s)
    }
}

/// Entity kind an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Asset records.
    Asset,
    /// Transfer (movement) requests.
    Transfer,
    /// Loan requests.
    Loan,
    /// Incident reports.
    Incident,
    /// Aggregated reports.
    Report,
    /// Uploaded evidence and proof photos.
    Photo,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Transfer => "transfer",
            Self::Loan => "loan",
            Self::Incident => "incident",
            Self::Report => "report",
            Self::Photo => "photo",
        };
        f.write_str(s)
    }
}

/// Lookup table of granted `(role, action, resource)` triples.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    grants: HashSet<(UserRole, Action, Resource)>,
}

impl AccessPolicy {
    /// An empty policy that denies everything.
    #[must_use]
    pub fn deny_all() -> Self {
        Self::default()
    }

    /// The standard grant table.
    ///
    /// Each role inherits every grant of the roles below it.
    #[must_use]
    pub fn standard() -> Self {
        const RESOURCES: [Resource; 6] = [
            Resource::Asset,
            Resource::Transfer,
            Resource::Loan,
            Resource::Incident,
            Resource::Report,
            Resource::Photo,
        ];

        let mut policy = Self::default();
        for role in UserRole::ALL {
            for resource in RESOURCES {
                policy = policy
                    .grant(role, Action::View, resource)
                    .grant(role, Action::Report, resource);
            }
            if role >= UserRole::Staff {
                policy = policy
                    .grant(role, Action::Request, Resource::Transfer)
                    .grant(role, Action::Request, Resource::Loan)
                    .grant(role, Action::Create, Resource::Incident)
                    .grant(role, Action::Create, Resource::Photo);
            }
            if role >= UserRole::Manager {
                for resource in [Resource::Transfer, Resource::Loan] {
                    policy = policy
                        .grant(role, Action::Approve, resource)
                        .grant(role, Action::Reject, resource);
                }
                policy = policy.grant(role, Action::Create, Resource::Asset);
            }
        }
        policy
    }

    /// Adds a grant.
    #[must_use]
    pub fn grant(mut self, role: UserRole, action: Action, resource: Resource) -> Self {
        self.grants.insert((role, action, resource));
        self
    }

    /// Returns true if the triple is granted.
    #[must_use]
    pub fn allows(&self, role: UserRole, action: Action, resource: Resource) -> bool {
        self.grants.contains(&(role, action, resource))
    }

    /// Checks a grant, failing with [`EngineError::Forbidden`].
    pub fn authorize(
        &self,
        role: UserRole,
        action: Action,
        resource: Resource,
    ) -> Result<(), EngineError> {
        if self.allows(role, action, resource) {
            Ok(())
        } else {
            Err(EngineError::Forbidden {
                role,
                action,
                resource,
            })
        }
    }
}
