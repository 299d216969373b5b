//! Resource identification from request paths.
//!
//! [`identify_resource`] maps a normalized request path (context path already
//! removed) to the repository resource the request acts on. Paths that target
//! no protectable resource yield `None`, which means authorization does not
//! depend on a resource.

use std::sync::LazyLock;

use http::{Method, Uri};

/// What kind of entity a [`Resource`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A model, named by its pretty formatted model id.
    Model,
    /// Any other named entity, such as a namespace.
    Named,
}

/// The target of a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    kind: ResourceKind,
    name: String,
}

impl Resource {
    #[must_use]
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn model(model_id: impl Into<String>) -> Self {
        Self::new(ResourceKind::Model, model_id)
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(ResourceKind::Named, name)
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Route pattern, resource kind, and the path parameter carrying the name.
const RESOURCE_ROUTES: &[(&str, ResourceKind, &str)] = &[
    ("/api/v1/models/{model_id}", ResourceKind::Model, "model_id"),
    ("/api/v1/models/{model_id}/{*rest}", ResourceKind::Model, "model_id"),
    ("/api/v1/attachments/{model_id}", ResourceKind::Model, "model_id"),
    ("/api/v1/attachments/{model_id}/{*rest}", ResourceKind::Model, "model_id"),
    ("/api/v1/generators/{key}/models/{model_id}", ResourceKind::Model, "model_id"),
    ("/api/v1/generators/{key}/models/{model_id}/{*rest}", ResourceKind::Model, "model_id"),
    ("/api/v1/namespaces/{namespace}", ResourceKind::Named, "namespace"),
    ("/api/v1/namespaces/{namespace}/{*rest}", ResourceKind::Named, "namespace"),
];

type ResourceRouter = matchit::Router<(ResourceKind, &'static str)>;

#[allow(clippy::expect_used)]
fn build_router() -> ResourceRouter {
    let mut router = matchit::Router::new();
    for &(pattern, kind, param) in RESOURCE_ROUTES {
        router
            .insert(pattern, (kind, param))
            .expect("resource route patterns are valid and disjoint");
    }
    router
}

static ROUTER: LazyLock<ResourceRouter> = LazyLock::new(build_router);

/// Identify the resource a normalized request path refers to.
///
/// Path segments are percent-decoded, with invalid UTF-8 replaced; a trailing
/// slash is ignored.
#[must_use]
pub fn identify_resource(path: &str) -> Option<Resource> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    let matched = ROUTER.at(path).ok()?;
    let (kind, param) = *matched.value;
    let raw = matched.params.get(param)?;
    // A matched route always names a resource, even when the segment is not
    // valid UTF-8 once decoded.
    let decoded = urlencoding::decode_binary(raw.as_bytes());
    Some(Resource::new(kind, String::from_utf8_lossy(&decoded).into_owned()))
}

/// The parts of an inbound request the OAuth core looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRequest {
    method: Method,
    path: String,
}

impl AuthRequest {
    /// A request for an already normalized path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// A request for `uri`, with `context_path` removed from the front of its path.
    #[must_use]
    pub fn from_uri(method: Method, uri: &Uri, context_path: &str) -> Self {
        Self::new(method, strip_context_path(uri.path(), context_path))
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The resource this request targets, if any.
    #[must_use]
    pub fn resource(&self) -> Option<Resource> {
        identify_resource(&self.path)
    }
}

fn strip_context_path(path: &str, context_path: &str) -> String {
    let context_path = context_path.trim_matches('/');
    if context_path.is_empty() {
        return path.to_owned();
    }
    let rest = path
        .strip_prefix('/')
        .and_then(|p| p.strip_prefix(context_path));
    match rest {
        Some("") => "/".to_owned(),
        Some(rest) if rest.starts_with('/') => rest.to_owned(),
        _ => path.to_owned(),
    }
}
