//! Outcome report printed by the CLI.

use std::process::ExitCode;

use oauth_resolver::AuthOutcome;
use oauth_sdk::OAuthError;
use repo_security::AuthenticatedPrincipal;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Report {
    Authenticated { principal: AuthenticatedPrincipal },
    Rejected { provider_id: String },
    Unauthenticated,
    Malformed { reason: String },
    CollaboratorFailure { error: String },
}

impl Report {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(match self {
            Report::Authenticated { .. } => 0,
            Report::Rejected { .. } | Report::Unauthenticated => 1,
            Report::Malformed { .. } => 2,
            Report::CollaboratorFailure { .. } => 3,
        })
    }
}

impl From<Result<AuthOutcome, OAuthError>> for Report {
    fn from(result: Result<AuthOutcome, OAuthError>) -> Self {
        match result {
            Ok(AuthOutcome::Authenticated(principal)) => Report::Authenticated { principal },
            Ok(AuthOutcome::Rejected { provider_id }) => Report::Rejected { provider_id },
            Ok(AuthOutcome::Unauthenticated) => Report::Unauthenticated,
            Err(OAuthError::MalformedToken(reason)) => Report::Malformed { reason },
            Err(err @ (OAuthError::KeyResolution(_) | OAuthError::AccountResolution(_))) => {
                Report::CollaboratorFailure {
                    error: err.to_string(),
                }
            }
        }
    }
}
