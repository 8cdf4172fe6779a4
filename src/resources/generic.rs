//! Plain CRUD client driven by a registry descriptor.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use super::unwrap_root;
use crate::error::ZendeskError;
use crate::pagination::Paginator;
use crate::path::ApiPath;
use crate::registry::{ResourceDescriptor, ResourceKind};
use crate::transport::{ApiRequest, Transport};

/// Generic resource client.
///
/// Serves every registry entry without a dedicated type. The collection
/// path comes from the descriptor's template; responses are unwrapped with
/// the descriptor's JSON roots.
///
/// # Example
///
/// ```ignore
/// let tickets = client.resource(ResourceKind::Tickets)?;
/// let open = tickets.list_with(json!({"status": "open"})).await?;
///
/// let audits = client.resource(ResourceKind::TicketAudits)?.with_parent(35436);
/// let trail = audits.list().await?;
/// ```
pub struct Resource<T> {
    transport: Arc<T>,
    kind: ResourceKind,
    parent: Option<String>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            kind: self.kind,
            parent: self.parent.clone(),
        }
    }
}

impl<T: Transport> Resource<T> {
    /// Creates a client for `kind` on a shared transport.
    pub fn new(transport: Arc<T>, kind: ResourceKind) -> Self {
        Self {
            transport,
            kind,
            parent: None,
        }
    }

    /// Binds the `{parent}` slot of a nested path template.
    pub fn with_parent(mut self, parent: impl fmt::Display) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    /// The registry entry this client serves.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The static descriptor of this client.
    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.kind.descriptor()
    }

    /// Collection path with the parent bound.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` for a nested resource with no parent.
    pub fn path(&self) -> Result<ApiPath, ZendeskError> {
        let descriptor = self.descriptor();
        ApiPath::from_template(descriptor.path, self.parent.as_deref()).ok_or_else(|| {
            ZendeskError::invalid_config(format!(
                "resource {} is nested under '{}'; bind it with with_parent()",
                self.kind, descriptor.path
            ))
        })
    }

    /// Lists every item, following pages.
    pub async fn list(&self) -> Result<Vec<Value>, ZendeskError> {
        let path = self.path()?;
        self.transport
            .get_all(path, self.descriptor().json_roots)
            .await
    }

    /// Lists every item matching the query parameters, following pages.
    pub async fn list_with(&self, params: Value) -> Result<Vec<Value>, ZendeskError> {
        let path = self.path()?.params(params);
        self.transport
            .get_all(path, self.descriptor().json_roots)
            .await
    }

    /// Pages over the collection lazily.
    ///
    /// Use this instead of [`Resource::list`] when only the first few items
    /// are needed.
    pub fn pages(&self) -> Result<Paginator<'_, T>, ZendeskError> {
        let request = ApiRequest::new(Method::GET, self.path()?);
        Ok(Paginator::new(
            &*self.transport,
            request,
            self.descriptor().json_roots,
        ))
    }

    /// Shows one item.
    pub async fn show(&self, id: impl fmt::Display) -> Result<Value, ZendeskError> {
        let path = self.path()?.id(id);
        let body = self.transport.get(path).await?;
        Ok(unwrap_root(body, self.descriptor().json_roots))
    }

    /// Creates an item. The body is sent as given.
    pub async fn create(&self, body: Value) -> Result<Value, ZendeskError> {
        let path = self.path()?;
        let body = self.transport.post(path, body).await?;
        Ok(unwrap_root(body, self.descriptor().json_roots))
    }

    /// Updates an item. The body is sent as given.
    pub async fn update(&self, id: impl fmt::Display, body: Value) -> Result<Value, ZendeskError> {
        let path = self.path()?.id(id);
        let body = self.transport.put(path, body).await?;
        Ok(unwrap_root(body, self.descriptor().json_roots))
    }

    /// Deletes an item.
    pub async fn delete(&self, id: impl fmt::Display) -> Result<(), ZendeskError> {
        let path = self.path()?.id(id);
        self.transport.delete(path).await?;
        Ok(())
    }

    /// Sends a custom action and returns the raw body.
    ///
    /// `path` is usually built from [`Resource::path`], e.g.
    /// `tickets.path()?.id(1).lit("related")`.
    pub async fn action(
        &self,
        method: Method,
        path: ApiPath,
        body: Option<Value>,
    ) -> Result<Value, ZendeskError> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        self.transport.send(request).await
    }

    /// Sends a custom action and follows every page of the result.
    pub async fn action_all(
        &self,
        method: Method,
        path: ApiPath,
        body: Option<Value>,
    ) -> Result<Vec<Value>, ZendeskError> {
        self.transport
            .request_all(method, path, body, self.descriptor().json_roots)
            .await
    }
}
