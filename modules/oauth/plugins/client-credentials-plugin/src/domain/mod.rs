//! Domain layer for the client-credentials provider.

pub mod provider;

pub use provider::{ACCEPTED_ALGORITHM, ClientCredentialsProvider};
