//! The transport contract every resource client delegates to.
//!
//! Implementors provide a single primitive, [`Transport::send`]. The verb
//! helpers (`get`, `post`, `put`, `delete`) and the paginated helpers
//! (`get_all`, `request_all`) are built on top of it, so a test double only
//! has to record what `send` receives.

use std::future::Future;

use reqwest::Method;
use serde_json::Value;

use crate::error::ZendeskError;
use crate::pagination::Paginator;
use crate::path::ApiPath;

/// Where a request goes.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A path relative to the endpoint group's base URL.
    Path(ApiPath),
    /// An absolute URL handed back by the API (next-page links).
    Url(String),
}

/// A single request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Request target.
    pub target: Target,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a body-less request to a relative path.
    pub fn new(method: Method, path: ApiPath) -> Self {
        Self {
            method,
            target: Target::Path(path),
            body: None,
        }
    }

    /// Attaches a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the relative path, if this request targets one.
    pub fn path(&self) -> Option<&ApiPath> {
        match &self.target {
            Target::Path(path) => Some(path),
            Target::Url(_) => None,
        }
    }

    /// Short description for logs: `GET views/1`.
    pub fn describe(&self) -> String {
        match &self.target {
            Target::Path(path) => format!("{} {}", self.method, path),
            Target::Url(url) => format!("{} {}", self.method, url),
        }
    }
}

/// Shared HTTP session used by every resource client.
///
/// Implementations own authentication, connection reuse and error mapping.
/// Resource clients call the provided helpers; they never retry, suppress or
/// reinterpret what comes back.
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange and returns the parsed JSON body
    /// (`Value::Null` for empty bodies).
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Value, ZendeskError>> + Send;

    /// GET a path.
    fn get(&self, path: ApiPath) -> impl Future<Output = Result<Value, ZendeskError>> + Send {
        self.send(ApiRequest::new(Method::GET, path))
    }

    /// POST a JSON body to a path.
    fn post(
        &self,
        path: ApiPath,
        body: Value,
    ) -> impl Future<Output = Result<Value, ZendeskError>> + Send {
        self.send(ApiRequest::new(Method::POST, path).with_body(body))
    }

    /// PUT a JSON body to a path.
    fn put(
        &self,
        path: ApiPath,
        body: Value,
    ) -> impl Future<Output = Result<Value, ZendeskError>> + Send {
        self.send(ApiRequest::new(Method::PUT, path).with_body(body))
    }

    /// DELETE a path.
    fn delete(&self, path: ApiPath) -> impl Future<Output = Result<Value, ZendeskError>> + Send {
        self.send(ApiRequest::new(Method::DELETE, path))
    }

    /// GET every page of a list and return the items under `roots`.
    fn get_all(
        &self,
        path: ApiPath,
        roots: &'static [&'static str],
    ) -> impl Future<Output = Result<Vec<Value>, ZendeskError>> + Send {
        self.request_all(Method::GET, path, None, roots)
    }

    /// Sends a request with any verb and body, following every page.
    fn request_all(
        &self,
        method: Method,
        path: ApiPath,
        body: Option<Value>,
        roots: &'static [&'static str],
    ) -> impl Future<Output = Result<Vec<Value>, ZendeskError>> + Send {
        let mut first = ApiRequest::new(method, path);
        first.body = body;
        Paginator::new(self, first, roots).collect()
    }
}
