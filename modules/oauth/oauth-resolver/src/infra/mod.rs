//! Infrastructure: key material retrieval and the static account directory.

pub mod accounts;
pub mod jwks;
pub mod key_cache;

pub use accounts::StaticAccountResolver;
pub use jwks::{HttpJwksSource, JwksDocument, JwksSource};
pub use key_cache::{JwksKeyCache, MIN_REFRESH_INTERVAL, spawn_key_refresher};
