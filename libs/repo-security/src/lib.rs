#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod principal;
pub mod role;
pub mod tenant;

pub use principal::{AuthenticatedPrincipal, AuthenticatedPrincipalBuilder};
pub use role::{ParseRoleError, Role};
pub use tenant::TenantId;
