//! Domain errors for the OAuth resolver.

/// Errors raised while wiring the provider registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("provider id '{0}' is registered more than once")]
    DuplicateProvider(String),
}
