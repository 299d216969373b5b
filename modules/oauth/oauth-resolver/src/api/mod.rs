//! HTTP surface of the resolver.

pub mod middleware;
pub mod problem;

pub use middleware::{OAuthState, oauth_middleware};
pub use problem::Problem;
