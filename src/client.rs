//! The composed client: one endpoint group, one shared transport.
//!
//! `ZendeskClient` consults the registry to hand out resource clients of its
//! configured group. Asking for anything outside that group fails with a
//! configuration error before a request is made.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::ZendeskError;
use crate::http::HttpTransport;
use crate::registry::{ClientType, EndpointGroup, ResourceKind};
use crate::resources::{Resource, Views};
use crate::transport::Transport;

/// A resource client as built by the registry.
pub enum ResourceClient<T> {
    /// The typed views client.
    Views(Views<T>),
    /// A generic client.
    Generic(Resource<T>),
}

impl<T> ResourceClient<T> {
    /// Returns the views client, if this is one.
    pub fn as_views(&self) -> Option<&Views<T>> {
        match self {
            ResourceClient::Views(views) => Some(views),
            ResourceClient::Generic(_) => None,
        }
    }

    /// Returns the generic client, if this is one.
    pub fn as_generic(&self) -> Option<&Resource<T>> {
        match self {
            ResourceClient::Generic(resource) => Some(resource),
            ResourceClient::Views(_) => None,
        }
    }
}

/// Every resource client of one endpoint group, keyed by registry name.
pub type ClientNamespace<T> = BTreeMap<&'static str, ResourceClient<T>>;

/// Client bound to one endpoint group.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = ZendeskClient::new(&config)?;
///
/// let views = client.views()?;
/// let active = views.list_active().await?;
///
/// let users = client.resource(ResourceKind::Users)?;
/// let me = users.show("me").await?;
/// ```
pub struct ZendeskClient<T = HttpTransport> {
    group: EndpointGroup,
    transport: Arc<T>,
}

impl<T> Clone for ZendeskClient<T> {
    fn clone(&self) -> Self {
        Self {
            group: self.group,
            transport: Arc::clone(&self.transport),
        }
    }
}

impl ZendeskClient<HttpTransport> {
    /// Builds an HTTP-backed client for the group named in the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if the group has no usable endpoint, or
    /// `ZendeskError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, ZendeskError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(config.endpoint_group, Arc::new(transport)))
    }
}

impl<T: Transport> ZendeskClient<T> {
    /// Wraps an existing transport.
    pub fn with_transport(group: EndpointGroup, transport: Arc<T>) -> Self {
        tracing::debug!(group = %group, "Client created");
        Self { group, transport }
    }

    /// The endpoint group this client talks to.
    pub fn group(&self) -> EndpointGroup {
        self.group
    }

    /// The shared transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// The views client.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` unless this client targets the core group.
    pub fn views(&self) -> Result<Views<T>, ZendeskError> {
        self.ensure_group(ResourceKind::Views)?;
        Ok(Views::new(Arc::clone(&self.transport)))
    }

    /// A generic client for any registry entry of this group.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if `kind` belongs to another group.
    pub fn resource(&self, kind: ResourceKind) -> Result<Resource<T>, ZendeskError> {
        self.ensure_group(kind)?;
        Ok(Resource::new(Arc::clone(&self.transport), kind))
    }

    /// Looks up a client by registry name, e.g. `"Views"` or `"Search"`.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if the name is not registered in this group.
    pub fn client(&self, name: &str) -> Result<ResourceClient<T>, ZendeskError> {
        let kind = self.group.lookup(name)?;
        Ok(self.build(kind))
    }

    /// Builds every client registered for this group.
    pub fn namespace(&self) -> ClientNamespace<T> {
        self.group
            .resources()
            .map(|kind| (kind.name(), self.build(kind)))
            .collect()
    }

    fn build(&self, kind: ResourceKind) -> ResourceClient<T> {
        let transport = Arc::clone(&self.transport);
        match kind.descriptor().client_type {
            ClientType::Views => ResourceClient::Views(Views::new(transport)),
            ClientType::Generic => ResourceClient::Generic(Resource::new(transport, kind)),
        }
    }

    fn ensure_group(&self, kind: ResourceKind) -> Result<(), ZendeskError> {
        if kind.group() == self.group {
            Ok(())
        } else {
            Err(ZendeskError::invalid_config(format!(
                "resource {} is not available on a '{}' client",
                kind, self.group
            )))
        }
    }
}
