#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Verification order and outcomes of the client-credentials provider.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use client_credentials_plugin::{ClientCredentialsPluginConfig, ClientCredentialsProvider};
use common::{
    CountingKeys, FixedClock, ISSUER, InMemoryAccounts, NOW, UnavailableKeys, acme_accounts,
    claims, get, provider, signed, signed_by_other_key, signed_rs512, signed_with_secret,
    signed_without_kid,
};
use oauth_sdk::{OAuthError, OAuthProvider};
use repo_security::Role;

const ACME_MODEL: &str = "/api/v1/models/com.acme:Thermometer:1.0.0";
const OTHER_MODEL: &str = "/api/v1/models/com.other:Thermometer:1.0.0";

fn counting() -> (Arc<CountingKeys>, Arc<InMemoryAccounts>, ClientCredentialsProvider) {
    let keys = Arc::new(CountingKeys::primary());
    let accounts = Arc::new(acme_accounts());
    let provider = provider(keys.clone(), accounts.clone());
    (keys, accounts, provider)
}

#[test]
fn foreign_algorithm_is_rejected_before_any_collaborator_call() {
    let (keys, accounts, provider) = counting();

    for token in [
        signed_with_secret(&claims("svc-1", 60)),
        signed_rs512(&claims("svc-1", 60)),
    ] {
        assert!(!provider.verify(&get(ACME_MODEL), &token).unwrap());
    }

    assert_eq!(keys.calls(), 0);
    assert_eq!(accounts.calls(), 0);
}

#[test]
fn signature_from_unpublished_key_is_rejected_before_identity_lookup() {
    let (keys, accounts, provider) = counting();

    let token = signed_by_other_key(&claims("svc-1", 60));
    assert!(!provider.verify(&get(ACME_MODEL), &token).unwrap());

    assert_eq!(keys.calls(), 1);
    assert_eq!(accounts.calls(), 0);
}

#[test]
fn token_without_kid_is_checked_against_every_key() {
    let (_, _, provider) = counting();

    let token = signed_without_kid(&claims("svc-1", 60));
    assert!(provider.verify(&get(ACME_MODEL), &token).unwrap());
}

#[test]
fn expiry_equal_to_now_is_expired() {
    let (keys, accounts, provider) = counting();

    let token = signed(&claims("svc-1", 0));
    assert!(!provider.verify(&get(ACME_MODEL), &token).unwrap());

    assert_eq!(keys.calls(), 1);
    assert_eq!(accounts.calls(), 0);
}

#[test]
fn expiry_one_second_ahead_is_accepted() {
    let (_, _, provider) = counting();

    let token = signed(&claims("svc-1", 1));
    assert!(provider.verify(&get(ACME_MODEL), &token).unwrap());
}

#[test]
fn token_without_expiry_is_rejected() {
    let (_, _, provider) = counting();

    let mut payload = claims("svc-1", 60);
    payload.as_object_mut().unwrap().remove("exp");
    assert!(!provider.verify(&get(ACME_MODEL), &signed(&payload)).unwrap());
}

#[test]
fn missing_client_id_is_malformed_not_rejected() {
    let (_, _, provider) = counting();

    let mut payload = claims("svc-1", 60);
    payload.as_object_mut().unwrap().remove("client_id");
    let token = signed(&payload);

    let err = provider.verify(&get(ACME_MODEL), &token).unwrap_err();
    assert!(err.is_malformed(), "{err}");

    let err = provider
        .create_authentication(&get(ACME_MODEL), &token)
        .unwrap_err();
    assert!(err.is_malformed(), "{err}");
}

#[test]
fn unknown_technical_user_is_malformed() {
    let (_, _, provider) = counting();

    let token = signed(&claims("svc-unknown", 60));

    let err = provider.verify(&get("/api/v1/status"), &token).unwrap_err();
    assert!(matches!(err, OAuthError::MalformedToken(_)));

    let err = provider
        .create_authentication(&get("/api/v1/status"), &token)
        .unwrap_err();
    assert!(matches!(err, OAuthError::MalformedToken(_)));
}

#[test]
fn resource_in_owned_namespace_is_allowed_with_tenant_roles() {
    let (_, _, provider) = counting();
    let token = signed(&claims("svc-1", 60));

    assert!(provider.verify(&get(ACME_MODEL), &token).unwrap());

    let principal = provider
        .create_authentication(&get(ACME_MODEL), &token)
        .unwrap();
    assert_eq!(principal.name(), "svc-1");
    assert_eq!(principal.display_name(), "svc-1");
    assert!(principal.credentials().is_none());
    assert_eq!(principal.provider_id(), "test-provider");
    assert_eq!(principal.tenant_id().map(|t| t.as_str()), Some("acme"));
    assert_eq!(
        principal.roles(),
        &BTreeSet::from([Role::ModelViewer, Role::ModelCreator])
    );
}

#[test]
fn resource_outside_owned_namespaces_is_rejected() {
    let (_, _, provider) = counting();
    let token = signed(&claims("svc-1", 60));

    assert!(!provider.verify(&get(OTHER_MODEL), &token).unwrap());
}

#[test]
fn undecodable_foreign_model_is_rejected() {
    let (_, _, provider) = counting();
    let token = signed(&claims("svc-1", 60));
    let request = get("/api/v1/models/com.other:Thermometer:1.0.0%FF/content");

    assert!(request.resource().is_some());
    assert!(!provider.verify(&request, &token).unwrap());
}

#[test]
fn namespace_resource_is_matched_by_raw_name() {
    let (_, _, provider) = counting();
    let token = signed(&claims("svc-1", 60));

    assert!(provider.verify(&get("/api/v1/namespaces/com.acme"), &token).unwrap());
    assert!(provider.verify(&get("/api/v1/namespaces/com.acme.sensors/users"), &token).unwrap());
    assert!(!provider.verify(&get("/api/v1/namespaces/com.other"), &token).unwrap());
}

#[test]
fn request_without_resource_uses_global_roles() {
    let keys = Arc::new(CountingKeys::primary());
    let accounts = Arc::new(
        acme_accounts().with_membership("svc-1", "globex", &["net.globex"], &[Role::TenantAdmin]),
    );
    let provider = provider(keys, accounts.clone());
    let token = signed(&claims("svc-1", 60));

    assert!(provider.verify(&get("/api/v1/status"), &token).unwrap());

    let principal = provider
        .create_authentication(&get("/api/v1/status"), &token)
        .unwrap();
    assert!(principal.tenant_id().is_none());
    assert_eq!(
        principal.roles(),
        &BTreeSet::from([Role::ModelViewer, Role::ModelCreator, Role::TenantAdmin])
    );
}

#[test]
fn roles_are_scoped_to_the_tenant_owning_the_resource() {
    let accounts = Arc::new(
        acme_accounts().with_membership("svc-1", "globex", &["net.globex"], &[Role::TenantAdmin]),
    );
    let provider = provider(Arc::new(CountingKeys::primary()), accounts);
    let token = signed(&claims("svc-1", 60));
    let request = get("/api/v1/models/net.globex.iot:Lamp:2.0.0/content");

    assert!(provider.verify(&request, &token).unwrap());
    let principal = provider.create_authentication(&request, &token).unwrap();
    assert_eq!(principal.tenant_id().map(|t| t.as_str()), Some("globex"));
    assert_eq!(principal.roles(), &BTreeSet::from([Role::TenantAdmin]));
}

#[test]
fn verify_is_idempotent() {
    let (_, _, provider) = counting();
    let token = signed(&claims("svc-1", 60));

    for path in [ACME_MODEL, OTHER_MODEL, "/api/v1/status"] {
        let first = provider.verify(&get(path), &token).unwrap();
        let second = provider.verify(&get(path), &token).unwrap();
        assert_eq!(first, second, "{path}");
    }
}

#[test]
fn key_supplier_failure_propagates() {
    let provider = provider(Arc::new(UnavailableKeys), Arc::new(acme_accounts()));
    let token = signed(&claims("svc-1", 60));

    let err = provider.verify(&get(ACME_MODEL), &token).unwrap_err();
    assert!(matches!(err, OAuthError::KeyResolution(_)));
    assert!(err.is_collaborator_failure());
}

#[test]
fn account_resolver_failure_propagates() {
    let provider = provider(
        Arc::new(CountingKeys::primary()),
        Arc::new(acme_accounts().unavailable()),
    );
    let token = signed(&claims("svc-1", 60));

    let err = provider.verify(&get(ACME_MODEL), &token).unwrap_err();
    assert!(matches!(err, OAuthError::AccountResolution(_)));
}

#[test]
fn can_handle_matches_configured_issuer_only() {
    let (_, _, provider) = counting();
    assert_eq!(provider.issuer(), Some(ISSUER));
    assert!(provider.can_handle(&signed(&claims("svc-1", 60))));

    let mut foreign = claims("svc-1", 60);
    foreign["iss"] = "https://elsewhere.example.com".into();
    assert!(!provider.can_handle(&signed(&foreign)));

    let unconfigured = ClientCredentialsProvider::new(
        &ClientCredentialsPluginConfig::default(),
        Arc::new(CountingKeys::primary()),
        Arc::new(acme_accounts()),
    );
    assert_eq!(unconfigured.issuer(), None);
    assert!(!unconfigured.can_handle(&signed(&claims("svc-1", 60))));
}

#[test]
fn identity_can_come_from_subject_claim() {
    let cfg = ClientCredentialsPluginConfig {
        issuer: Some(ISSUER.to_owned()),
        identity_claim: client_credentials_plugin::IdentityClaim::Sub,
        ..ClientCredentialsPluginConfig::default()
    };
    let accounts = Arc::new(
        InMemoryAccounts::default()
            .with_user("service-account")
            .with_membership("service-account", "acme", &["com.acme"], &[Role::ModelViewer]),
    );
    let provider = ClientCredentialsProvider::new(&cfg, Arc::new(CountingKeys::primary()), accounts)
        .with_clock(Arc::new(FixedClock::at(NOW)));
    let token = signed(&claims("svc-1", 60));

    assert!(provider.verify(&get(ACME_MODEL), &token).unwrap());
    let principal = provider.create_authentication(&get(ACME_MODEL), &token).unwrap();
    assert_eq!(principal.name(), "service-account");
}
