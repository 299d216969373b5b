//! JWKS document retrieval.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Uri, header};
use http_body_util::{BodyExt, Empty};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use oauth_sdk::KeyResolverError;
use serde::Deserialize;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A JWKS document as published by an issuer.
///
/// Keys stay raw JSON so one unsupported key does not make the whole
/// document unreadable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwksDocument {
    #[serde(default)]
    pub keys: Vec<serde_json::Value>,
}

impl JwksDocument {
    /// # Errors
    ///
    /// [`KeyResolverError::Decode`] if `body` is not a JWKS JSON document.
    pub fn from_slice(body: &[u8]) -> Result<Self, KeyResolverError> {
        serde_json::from_slice(body).map_err(|e| KeyResolverError::Decode(e.to_string()))
    }
}

/// Where a key cache gets its JWKS documents from.
#[async_trait]
pub trait JwksSource: Send + Sync {
    /// Location of the document, for diagnostics.
    fn uri(&self) -> &str;

    /// Fetch the current document.
    ///
    /// # Errors
    ///
    /// [`KeyResolverError`] if the document cannot be retrieved or decoded.
    async fn fetch(&self) -> Result<JwksDocument, KeyResolverError>;
}

/// Fetches JWKS documents over HTTP or HTTPS.
pub struct HttpJwksSource {
    uri: Uri,
    raw_uri: String,
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    timeout: Duration,
}

impl HttpJwksSource {
    /// # Errors
    ///
    /// [`KeyResolverError::Fetch`] if `uri` is not a valid absolute URI or
    /// TLS cannot be configured.
    pub fn new(uri: &str) -> Result<Self, KeyResolverError> {
        let fetch_error = |reason: String| KeyResolverError::Fetch {
            uri: uri.to_owned(),
            reason,
        };

        let parsed: Uri = uri
            .parse()
            .map_err(|e: http::uri::InvalidUri| fetch_error(e.to_string()))?;
        if parsed.scheme().is_none() || parsed.authority().is_none() {
            return Err(fetch_error("URI must be absolute".to_owned()));
        }

        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::aws_lc_rs::default_provider())
            .map_err(|e| fetch_error(format!("cannot configure TLS: {e}")))?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            uri: parsed,
            raw_uri: uri.to_owned(),
            client,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Bound on the whole exchange, body included.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn fetch_error(&self, reason: &dyn fmt::Display) -> KeyResolverError {
        KeyResolverError::Fetch {
            uri: self.raw_uri.clone(),
            reason: reason.to_string(),
        }
    }

    async fn get(&self) -> Result<Bytes, KeyResolverError> {
        let request = Request::get(self.uri.clone())
            .header(header::ACCEPT, "application/json")
            .body(Empty::new())
            .map_err(|e| self.fetch_error(&e))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| self.fetch_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyResolverError::Status {
                uri: self.raw_uri.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| self.fetch_error(&e))?;
        Ok(body.to_bytes())
    }
}

#[async_trait]
impl JwksSource for HttpJwksSource {
    fn uri(&self) -> &str {
        &self.raw_uri
    }

    #[tracing::instrument(skip_all, fields(uri = %self.raw_uri))]
    async fn fetch(&self) -> Result<JwksDocument, KeyResolverError> {
        let body = tokio::time::timeout(self.timeout, self.get())
            .await
            .map_err(|_| self.fetch_error(&format!("no answer within {}ms", self.timeout.as_millis())))??;
        JwksDocument::from_slice(&body)
    }
}
