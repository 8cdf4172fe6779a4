//! # zdesk
//!
//! zdesk is a typed client for the Zendesk REST API, with an MCP (Model
//! Context Protocol) server on top.
//!
//! The API is split into endpoint groups (core, Help Center, NPS, services
//! and voice), each with its own base URL. A [`ZendeskClient`] is bound to
//! one group and hands out resource clients for the resources registered in
//! it.
//!
//! ## Features
//!
//! - **Registry**: every resource client of every group, with its path and
//!   JSON roots, in one static table
//! - **Views**: a fully typed client for the Views API
//! - **Generic resources**: CRUD on every other registry entry
//! - **Pagination**: offset and cursor pagination behind one [`Paginator`]
//! - **Security**: credentials are never logged or exposed in error messages
//!
//! ## Architecture
//!
//! - [`config`] - Configuration loading from environment variables
//! - [`error`] - Error types with security-conscious message sanitization
//! - [`registry`] - Endpoint groups and resource descriptors
//! - [`path`] - Request path building and rendering
//! - [`transport`] - The transport contract resource clients call
//! - [`http`] - reqwest implementation of the transport
//! - [`pagination`] - Page following
//! - [`resources`] - Resource clients
//! - [`client`] - The group-bound client factory
//! - [`models`] - Data models for API responses
//! - [`server`] - MCP server implementation with tool routing
//! - [`tools`] - Tool input parameter structs
//!
//! ## Configuration
//!
//! - `ZENDESK_SUBDOMAIN`: account subdomain (or `ZENDESK_ENDPOINT_URI`)
//! - `ZENDESK_USERNAME` with `ZENDESK_TOKEN` or `ZENDESK_PASSWORD`, or
//!   `ZENDESK_OAUTH_TOKEN`
//!
//! Optional:
//! - `ZENDESK_ENDPOINT_GROUP`, `ZENDESK_AS_USER`, `ZENDESK_TIMEOUT_SECS`
//! - `RUST_LOG`: Log level (e.g., `zdesk=debug`)
//!
//! ## Example
//!
//! ```ignore
//! use zdesk::{Config, ZendeskClient, ResourceKind};
//!
//! async fn example() -> Result<(), zdesk::ZendeskError> {
//!     let config = Config::from_env()?;
//!     let client = ZendeskClient::new(&config)?;
//!
//!     let views = client.views()?;
//!     for view in views.list_active().await? {
//!         println!("#{}: {}", view.id, view.display_title());
//!     }
//!
//!     let counts = views.show_counts(&[12345, 67890]).await?;
//!     let audits = client
//!         .resource(ResourceKind::TicketAudits)?
//!         .with_parent(35436)
//!         .list()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod pagination;
pub mod path;
pub mod registry;
pub mod resources;
pub mod server;
pub mod tools;
pub mod transport;

pub use client::{ResourceClient, ZendeskClient};
pub use config::{Config, Credentials};
pub use error::ZendeskError;
pub use http::HttpTransport;
pub use pagination::Paginator;
pub use path::ApiPath;
pub use registry::{EndpointGroup, ResourceKind};
pub use transport::{ApiRequest, Target, Transport};
