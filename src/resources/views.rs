//! Views API.
//!
//! Views are saved ticket filters. Besides plain CRUD this client can
//! execute a view, preview an unsaved one, count tickets and reorder the
//! agent's view list.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};

use crate::error::ZendeskError;
use crate::models::{
    ExecuteParams, View, ViewCount, ViewCountResponse, ViewCountsResponse, ViewDraft,
    ViewResponse, ViewsResponse,
};
use crate::pagination::{decode_items, Paginator};
use crate::path::ApiPath;
use crate::transport::{ApiRequest, Transport};

/// JSON roots of view responses.
pub const VIEW_ROOTS: &[&str] = &["views", "view"];

/// Root of execute and preview pages.
const ROW_ROOTS: &[&str] = &["rows"];

/// Root of the tickets-in-view listing.
const TICKET_ROOTS: &[&str] = &["tickets"];

/// Client for the Views API.
///
/// # Example
///
/// ```ignore
/// let views = client.views()?;
///
/// for view in views.list_active().await? {
///     println!("{}: {}", view.id, view.display_title());
/// }
///
/// let counts = views.show_counts(&[12345, 67890]).await?;
/// ```
pub struct Views<T> {
    transport: Arc<T>,
}

impl<T> Clone for Views<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> Views<T> {
    /// Creates a views client on a shared transport.
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    fn root() -> ApiPath {
        ApiPath::new().lit("views")
    }

    /// Lists shared and personal views available to the current user.
    pub async fn list(&self) -> Result<Vec<View>, ZendeskError> {
        let items = self.transport.get_all(Self::root(), VIEW_ROOTS).await?;
        decode_items(items)
    }

    /// Lists active shared and personal views.
    pub async fn list_active(&self) -> Result<Vec<View>, ZendeskError> {
        let items = self
            .transport
            .get_all(Self::root().lit("active"), VIEW_ROOTS)
            .await?;
        decode_items(items)
    }

    /// Lists views in compact form (id, title and a few flags).
    pub async fn list_compact(&self) -> Result<Vec<View>, ZendeskError> {
        let items = self
            .transport
            .get_all(Self::root().lit("compact"), VIEW_ROOTS)
            .await?;
        decode_items(items)
    }

    /// Lists active shared views. Single request, not paginated.
    pub async fn list_active_shared(&self) -> Result<Vec<View>, ZendeskError> {
        let body = self.transport.get(Self::root().lit("shared")).await?;
        let response: ViewsResponse = serde_json::from_value(body)?;
        Ok(response.views)
    }

    /// Shows one view.
    pub async fn show(&self, view_id: impl fmt::Display) -> Result<View, ZendeskError> {
        let body = self.transport.get(Self::root().id(view_id)).await?;
        let response: ViewResponse = serde_json::from_value(body)?;
        Ok(response.view)
    }

    /// Creates a view.
    pub async fn create(&self, view: &ViewDraft) -> Result<View, ZendeskError> {
        let body = self.transport.post(Self::root(), view.to_body()?).await?;
        let response: ViewResponse = serde_json::from_value(body)?;
        Ok(response.view)
    }

    /// Updates a view.
    pub async fn update(
        &self,
        view_id: impl fmt::Display,
        view: &ViewDraft,
    ) -> Result<View, ZendeskError> {
        let body = self
            .transport
            .put(Self::root().id(view_id), view.to_body()?)
            .await?;
        let response: ViewResponse = serde_json::from_value(body)?;
        Ok(response.view)
    }

    /// Executes a view and returns its rows, following pages.
    pub async fn execute(
        &self,
        view_id: impl fmt::Display,
        params: &ExecuteParams,
    ) -> Result<Vec<Value>, ZendeskError> {
        self.execute_pages(view_id, params)?.collect().await
    }

    /// Pages over a view's execution rows lazily.
    pub fn execute_pages(
        &self,
        view_id: impl fmt::Display,
        params: &ExecuteParams,
    ) -> Result<Paginator<'_, T>, ZendeskError> {
        let path = Self::root()
            .id(view_id)
            .lit("execute")
            .params(serde_json::to_value(params)?);
        Ok(Paginator::new(
            &*self.transport,
            ApiRequest::new(Method::GET, path),
            ROW_ROOTS,
        ))
    }

    /// Lists the tickets matching a view, following pages.
    pub async fn tickets(&self, view_id: impl fmt::Display) -> Result<Vec<Value>, ZendeskError> {
        self.tickets_pages(view_id).collect().await
    }

    /// Pages over the tickets matching a view lazily.
    pub fn tickets_pages(&self, view_id: impl fmt::Display) -> Paginator<'_, T> {
        let path = Self::root().id(view_id).lit("tickets");
        Paginator::new(
            &*self.transport,
            ApiRequest::new(Method::GET, path),
            TICKET_ROOTS,
        )
    }

    /// Runs an unsaved view and returns its rows, following pages.
    pub async fn preview(&self, view: &ViewDraft) -> Result<Vec<Value>, ZendeskError> {
        self.transport
            .request_all(
                Method::POST,
                Self::root().lit("preview"),
                Some(view.to_body()?),
                ROW_ROOTS,
            )
            .await
    }

    /// Ticket count of one view.
    pub async fn show_count(&self, view_id: impl fmt::Display) -> Result<ViewCount, ZendeskError> {
        let body = self
            .transport
            .get(Self::root().id(view_id).lit("count"))
            .await?;
        let response: ViewCountResponse = serde_json::from_value(body)?;
        Ok(response.view_count)
    }

    /// Ticket counts of several views in one request.
    pub async fn show_counts(&self, view_ids: &[u64]) -> Result<Vec<ViewCount>, ZendeskError> {
        let path = Self::root()
            .lit("count_many")
            .params(json!({ "ids": view_ids }));
        let body = self.transport.get(path).await?;
        let response: ViewCountsResponse = serde_json::from_value(body)?;
        Ok(response.view_counts)
    }

    /// Exports a view as CSV. Returns the export job body.
    pub async fn export(&self, view_id: impl fmt::Display) -> Result<Value, ZendeskError> {
        self.transport
            .get(Self::root().id(view_id).lit("export"))
            .await
    }

    /// Execution status of a view.
    pub async fn show_execution_status(
        &self,
        view_id: impl fmt::Display,
    ) -> Result<Value, ZendeskError> {
        self.transport
            .get(Self::root().id(view_id).lit("execution_status"))
            .await
    }

    /// IDs of tickets recently matched by a view.
    pub async fn show_recent_ticket_ids(
        &self,
        view_id: impl fmt::Display,
    ) -> Result<Value, ZendeskError> {
        self.transport
            .get(Self::root().id(view_id).lit("recent_ticket_ids"))
            .await
    }

    /// Deletes a view.
    ///
    /// Goes through the transport's `delete` primitive; this method shares
    /// the name but never calls itself.
    pub async fn delete(&self, view_id: impl fmt::Display) -> Result<(), ZendeskError> {
        Transport::delete(&*self.transport, Self::root().id(view_id)).await?;
        Ok(())
    }

    /// Reorders the agent's views.
    pub async fn reorder(&self, view_order: &[u64]) -> Result<Value, ZendeskError> {
        self.transport
            .put(
                Self::root().lit("reorder"),
                json!({ "view_order": view_order }),
            )
            .await
    }
}
