use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A repository role.
///
/// Roles are granted either per tenant or, for `sysadmin`, system wide.
/// The derived `Ord` keeps role sets in a stable order so role resolution
/// is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Sysadmin,
    ModelViewer,
    ModelCreator,
    ModelPromoter,
    ModelReviewer,
    ModelPublisher,
    NamespaceAdmin,
    TenantAdmin,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::User,
        Role::Sysadmin,
        Role::ModelViewer,
        Role::ModelCreator,
        Role::ModelPromoter,
        Role::ModelReviewer,
        Role::ModelPublisher,
        Role::NamespaceAdmin,
        Role::TenantAdmin,
    ];

    /// Wire name of the role, identical to its serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Sysadmin => "sysadmin",
            Role::ModelViewer => "model_viewer",
            Role::ModelCreator => "model_creator",
            Role::ModelPromoter => "model_promoter",
            Role::ModelReviewer => "model_reviewer",
            Role::ModelPublisher => "model_publisher",
            Role::NamespaceAdmin => "namespace_admin",
            Role::TenantAdmin => "tenant_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseRoleError(s.to_owned()))
    }
}
