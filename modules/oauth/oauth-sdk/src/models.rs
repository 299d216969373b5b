//! Domain models consumed by the OAuth core.

use std::fmt;
use std::str::FromStr;

use repo_security::TenantId;
use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceKind};

/// Identifier of a model in its pretty format `namespace:name:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId {
    pub namespace: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a model id of the form namespace:name:version")]
pub struct ModelIdError(pub String);

impl ModelId {
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `namespace:name:version`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelIdError`] unless the input has exactly three non-empty parts.
    pub fn from_pretty_format(s: &str) -> Result<Self, ModelIdError> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(name), Some(version), None)
                if !namespace.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(namespace, name, version))
            }
            _ => Err(ModelIdError(s.to_owned())),
        }
    }

    #[must_use]
    pub fn pretty_format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.name, self.version)
    }
}

impl FromStr for ModelId {
    type Err = ModelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_pretty_format(s)
    }
}

/// An ownership boundary over model namespaces, owned by one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    pub tenant_id: TenantId,
}

impl Namespace {
    #[must_use]
    pub fn new(name: impl Into<String>, tenant_id: TenantId) -> Self {
        Self {
            name: name.into(),
            tenant_id,
        }
    }

    /// Whether `name` is this namespace or one of its sub-namespaces.
    #[must_use]
    pub fn owns(&self, name: &str) -> bool {
        name.strip_prefix(self.name.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }

    #[must_use]
    pub fn owns_model(&self, model_id: &ModelId) -> bool {
        self.owns(&model_id.namespace)
    }

    /// Ownership test for a request resource.
    ///
    /// Model resources are matched on their parsed model id; a model resource
    /// whose name is not a valid model id is owned by no namespace.
    /// Other resources are matched on their raw name.
    #[must_use]
    pub fn applies_to(&self, resource: &Resource) -> bool {
        match resource.kind() {
            ResourceKind::Model => ModelId::from_pretty_format(resource.name())
                .is_ok_and(|model_id| self.owns_model(&model_id)),
            ResourceKind::Named => self.owns(resource.name()),
        }
    }
}

/// A tenant with the namespaces it owns, in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub namespaces: Vec<Namespace>,
}

impl Tenant {
    pub fn new<I, S>(id: TenantId, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespaces = namespaces
            .into_iter()
            .map(|name| Namespace::new(name, id.clone()))
            .collect();
        Self { id, namespaces }
    }
}

/// A human user or technical identity known to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub technical: bool,
}

impl User {
    #[must_use]
    pub fn technical(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            technical: true,
        }
    }

    #[must_use]
    pub fn human(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            technical: false,
        }
    }
}
