//! Domain layer for the OAuth resolver.

pub mod error;
pub mod registry;

pub use error::RegistryError;
pub use registry::{AuthOutcome, ProviderRegistry};
