//! Bearer-token authentication middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use oauth_sdk::{AuthRequest, OAuthError};
use tracing::{debug, error};

use super::problem::Problem;
use crate::config::OAuthResolverConfig;
use crate::domain::{AuthOutcome, ProviderRegistry};

/// Shared state for [`oauth_middleware`].
#[derive(Clone)]
pub struct OAuthState {
    registry: Arc<ProviderRegistry>,
    context_path: Arc<str>,
}

impl OAuthState {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, cfg: &OAuthResolverConfig) -> Self {
        Self {
            registry,
            context_path: Arc::from(cfg.context_path.as_str()),
        }
    }
}

/// Authenticate every request through the provider registry.
///
/// For each request:
/// 1. Skips CORS preflight requests
/// 2. Extracts the bearer token, answering 401 if there is none
/// 3. Dispatches to the providers and inserts the `AuthenticatedPrincipal`
///    into the request extensions on success
///
/// Tokens no provider handles answer 401, rejected tokens 403, malformed
/// tokens 400 and collaborator failures 503.
pub async fn oauth_middleware(
    State(state): State<OAuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    let Some(bearer) = extract_bearer_token(req.headers()) else {
        return Problem::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Missing or invalid Authorization header",
        )
        .into_response();
    };

    let auth_request = AuthRequest::from_uri(req.method().clone(), req.uri(), &state.context_path);
    match state.registry.authenticate(&auth_request, bearer) {
        Ok(AuthOutcome::Authenticated(principal)) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Ok(AuthOutcome::Rejected { provider_id }) => {
            debug!(provider = %provider_id, path = %auth_request.path(), "request rejected");
            Problem::new(
                StatusCode::FORBIDDEN,
                "Forbidden",
                "The token does not grant access to this resource",
            )
            .into_response()
        }
        Ok(AuthOutcome::Unauthenticated) => Problem::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "No provider accepts the token",
        )
        .into_response(),
        Err(err) => oauth_error_to_response(&err),
    }
}

fn oauth_error_to_response(err: &OAuthError) -> Response {
    let problem = match err {
        OAuthError::MalformedToken(reason) => {
            error!(reason = %reason, "malformed token, the issuer integration is broken");
            Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "Malformed token")
        }
        OAuthError::KeyResolution(_) | OAuthError::AccountResolution(_) => {
            error!(error = %err, "authentication collaborator failed");
            Problem::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable",
                "Authentication service unavailable",
            )
        }
    };
    problem.into_response()
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}
