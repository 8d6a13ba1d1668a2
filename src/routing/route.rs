//! Declarative proxy route definition.

use std::collections::HashMap;
use std::fmt;

use axum::http::Method;
use axum::routing::MethodFilter;
use serde::Serialize;
use serde_json::Value;

use crate::validation::{validate_to_value, Envelope, FieldIssue};

/// Methods the dashboard API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn filter(&self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a route requires a usable credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Protected,
    /// Sign-in style routes. No credential is checked or forwarded.
    Public,
}

/// Body validator stored in the route table.
pub type BodySchema = fn(&[u8]) -> Result<Value, Vec<FieldIssue>>;

/// An absolute URL into this deployment, injected into the forwarded body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Callback {
    pub field: &'static str,
    pub path: &'static str,
}

/// One proxied endpoint: inbound method + path and where it goes upstream.
#[derive(Clone)]
pub struct ProxyRoute {
    pub name: &'static str,
    pub method: HttpMethod,
    /// Inbound path pattern, `{param}` segments included.
    pub path: &'static str,
    /// Upstream suffix template using the same `{param}` names.
    pub upstream: &'static str,
    pub access: Access,
    pub schema: Option<BodySchema>,
    pub callbacks: &'static [Callback],
}

impl ProxyRoute {
    pub fn protected(name: &'static str, method: HttpMethod, path: &'static str, upstream: &'static str) -> Self {
        Self {
            name,
            method,
            path,
            upstream,
            access: Access::Protected,
            schema: None,
            callbacks: &[],
        }
    }

    pub fn public(name: &'static str, method: HttpMethod, path: &'static str, upstream: &'static str) -> Self {
        Self {
            access: Access::Public,
            ..Self::protected(name, method, path, upstream)
        }
    }

    /// Validate the request body as `T` before forwarding.
    pub fn body<T: Envelope>(mut self) -> Self {
        self.schema = Some(validate_to_value::<T> as BodySchema);
        self
    }

    pub fn callbacks(mut self, callbacks: &'static [Callback]) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Parameter names declared in the inbound path.
    pub fn params(&self) -> Vec<&'static str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
            .collect()
    }

    /// Substitute validated parameters into the upstream template.
    pub fn upstream_path(&self, params: &HashMap<String, String>) -> String {
        params.iter().fold(self.upstream.to_string(), |path, (name, value)| {
            path.replace(&format!("{{{}}}", name), value)
        })
    }
}

impl fmt::Debug for ProxyRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRoute")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("upstream", &self.upstream)
            .field("access", &self.access)
            .field("validated", &self.schema.is_some())
            .finish()
    }
}

/// Serializable summary for the admin API.
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub upstream: &'static str,
    pub access: Access,
    pub validated: bool,
}

impl From<&ProxyRoute> for RouteInfo {
    fn from(route: &ProxyRoute) -> Self {
        Self {
            name: route.name,
            method: route.method,
            path: route.path,
            upstream: route.upstream,
            access: route.access,
            validated: route.schema.is_some(),
        }
    }
}
