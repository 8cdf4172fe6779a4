//! MCP server implementation for zdesk.
//!
//! This module defines the `ZdeskServer` struct that implements the MCP
//! `ServerHandler` trait, exposing Zendesk views and registry resources as
//! tools.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde_json::Value;

use crate::client::{ResourceClient, ZendeskClient};
use crate::error::ZendeskError;
use crate::models::{ExecuteParams, View, ViewCount};
use crate::tools::{
    CountViewsInput, DeleteViewInput, ExecuteViewInput, GetResourceInput, GetViewInput,
    ListResourcesInput, ListViewsInput, ReorderViewsInput, ViewFilter, ViewTicketsInput,
};

/// The zdesk MCP server.
///
/// This server exposes one endpoint group's resources as MCP tools. The
/// view tools need a client bound to the core group.
#[derive(Clone)]
pub struct ZdeskServer {
    /// Zendesk client for API operations.
    client: ZendeskClient,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ZdeskServer {
    /// Creates a new server instance around a configured client.
    pub fn new(client: ZendeskClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// A simple ping tool to verify the server is running.
    #[tool(description = "Test connectivity to the zdesk MCP server. Returns 'pong' if the server is running correctly.")]
    fn ping(&self) -> String {
        tracing::debug!("ping tool called");
        "pong".to_string()
    }

    /// List views visible to the authenticated agent.
    #[tool(description = "List Zendesk views. filter is 'active' (default), 'all', 'compact' or 'shared'. Returns view IDs, titles and status.")]
    async fn list_views(
        &self,
        Parameters(input): Parameters<ListViewsInput>,
    ) -> Result<String, String> {
        tracing::debug!(?input, "list_views tool called");

        let result = match self.client.views() {
            Ok(views) => match input.filter {
                ViewFilter::All => views.list().await,
                ViewFilter::Active => views.list_active().await,
                ViewFilter::Compact => views.list_compact().await,
                ViewFilter::Shared => views.list_active_shared().await,
            },
            Err(e) => Err(e),
        };

        let views = result.map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to list views");
            format!("Failed to list views: {}", sanitized)
        })?;

        Ok(format_view_list(&views))
    }

    /// Get full details of one view.
    #[tool(description = "Get full details of a Zendesk view including its conditions, columns and restriction.")]
    async fn get_view(
        &self,
        Parameters(input): Parameters<GetViewInput>,
    ) -> Result<String, String> {
        tracing::debug!(view_id = input.view_id, "get_view tool called");

        let view = async { self.client.views()?.show(input.view_id).await }
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, view_id = input.view_id, "Failed to get view");
                format!("Failed to get view {}: {}", input.view_id, sanitized)
            })?;

        Ok(format_view_details(&view))
    }

    /// Ticket counts for one or more views.
    #[tool(description = "Get ticket counts for one or more views in a single request. Counts may be approximate or pending while Zendesk computes them.")]
    async fn count_views(
        &self,
        Parameters(input): Parameters<CountViewsInput>,
    ) -> Result<String, String> {
        tracing::debug!(view_ids = ?input.view_ids, "count_views tool called");

        let counts = async {
            input.validate()?;
            let views = self.client.views()?;
            match input.view_ids.as_slice() {
                [single] => Ok(vec![views.show_count(*single).await?]),
                many => views.show_counts(many).await,
            }
        }
        .await
        .map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to count views");
            format!("Failed to count views: {}", sanitized)
        })?;

        Ok(format_view_counts(&counts))
    }

    /// Execute a view and return its rows.
    #[tool(description = "Execute a view and return its ticket rows. Optionally sort by a column in 'asc' or 'desc' order.")]
    async fn execute_view(
        &self,
        Parameters(input): Parameters<ExecuteViewInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "execute_view tool called");

        let (rows, more) = async {
            input.validate()?;
            let mut params = ExecuteParams::new();
            if let Some(sort_by) = &input.sort_by {
                params = params.sort_by(sort_by.clone());
            }
            if let Some(sort_order) = &input.sort_order {
                params = params.sort_order(sort_order.clone());
            }
            let views = self.client.views()?;
            views
                .execute_pages(input.view_id, &params)?
                .take_items(input.limit())
                .await
        }
        .await
        .map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, view_id = input.view_id, "Failed to execute view");
            format!("Failed to execute view {}: {}", input.view_id, sanitized)
        })?;

        Ok(format_rows(&rows, more))
    }

    /// List the tickets in a view.
    #[tool(description = "List the tickets matching a view. Returns ticket ID, subject and status.")]
    async fn list_view_tickets(
        &self,
        Parameters(input): Parameters<ViewTicketsInput>,
    ) -> Result<String, String> {
        tracing::debug!(view_id = input.view_id, "list_view_tickets tool called");

        let (tickets, more) = async {
            let views = self.client.views()?;
            views.tickets_pages(input.view_id).take_items(input.limit()).await
        }
        .await
        .map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, view_id = input.view_id, "Failed to list view tickets");
            format!("Failed to list tickets of view {}: {}", input.view_id, sanitized)
        })?;

        Ok(format_rows(&tickets, more))
    }

    /// Reorder the agent's views.
    #[tool(description = "Reorder the agent's views. Pass every view ID in the desired order.")]
    async fn reorder_views(
        &self,
        Parameters(input): Parameters<ReorderViewsInput>,
    ) -> Result<String, String> {
        tracing::debug!(view_order = ?input.view_order, "reorder_views tool called");

        async {
            input.validate()?;
            self.client.views()?.reorder(&input.view_order).await
        }
        .await
        .map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to reorder views");
            format!("Failed to reorder views: {}", sanitized)
        })?;

        Ok(format!("Reordered {} view(s).", input.view_order.len()))
    }

    /// Delete a view.
    #[tool(description = "Permanently delete a view. This cannot be undone.")]
    async fn delete_view(
        &self,
        Parameters(input): Parameters<DeleteViewInput>,
    ) -> Result<String, String> {
        tracing::debug!(view_id = input.view_id, "delete_view tool called");

        async { self.client.views()?.delete(input.view_id).await }
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, view_id = input.view_id, "Failed to delete view");
                format!("Failed to delete view {}: {}", input.view_id, sanitized)
            })?;

        tracing::info!(view_id = input.view_id, "View deleted");
        Ok(format!("View {} deleted.", input.view_id))
    }

    /// List items of any registry resource of the configured group.
    #[tool(description = "List items of any Zendesk resource by registry name (e.g. 'Tickets', 'Users', 'Organizations'). Nested resources such as 'TicketAudits' need parent_id. Returns JSON.")]
    async fn list_resources(
        &self,
        Parameters(input): Parameters<ListResourcesInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "list_resources tool called");

        let limit = input.limit();
        let (items, truncated) = async {
            input.validate()?;
            let kind = self.client.group().lookup(&input.resource)?;
            let mut resource = self.client.resource(kind)?;
            if let Some(parent) = &input.parent_id {
                resource = resource.with_parent(parent);
            }

            resource.pages()?.take_items(limit).await
        }
        .await
        .map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, resource = %input.resource, "Failed to list resource");
            format!("Failed to list {}: {}", input.resource, sanitized)
        })?;

        Ok(format_json_items(&input.resource, &items, truncated))
    }

    /// Get one item of any registry resource of the configured group.
    #[tool(description = "Get one item of any Zendesk resource by registry name and ID (e.g. resource 'Users', id 'me'). Nested resources need parent_id. Returns JSON.")]
    async fn get_resource(
        &self,
        Parameters(input): Parameters<GetResourceInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "get_resource tool called");

        let output = async {
            input.validate()?;
            match self.client.client(&input.resource)? {
                ResourceClient::Views(views) => {
                    let view = views.show(&input.id).await?;
                    Ok::<_, ZendeskError>(format_view_details(&view))
                }
                ResourceClient::Generic(mut resource) => {
                    if let Some(parent) = &input.parent_id {
                        resource = resource.with_parent(parent);
                    }
                    let item = resource.show(&input.id).await?;
                    Ok(format_json(&item))
                }
            }
        }
        .await
        .map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, resource = %input.resource, id = %input.id, "Failed to get resource");
            format!("Failed to get {} {}: {}", input.resource, input.id, sanitized)
        })?;

        Ok(output)
    }

    /// Sanitizes an error message to remove the credential secret.
    fn sanitize_error(&self, error: &ZendeskError) -> String {
        error.sanitized_display(&[self.client.transport().secret_for_sanitization()])
    }
}

#[tool_handler]
impl ServerHandler for ZdeskServer {
    /// Returns server information for the MCP initialize handshake.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "zdesk provides access to Zendesk views and resources. \
                 Use list_views to find views, get_view for details and \
                 count_views for ticket counts. Run a view with execute_view \
                 or list_view_tickets. Manage views with reorder_views and \
                 delete_view. Any other resource is available through \
                 list_resources and get_resource. Start with 'ping' to verify connectivity."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Response formatting helpers
// ============================================================================

/// Maximum length of JSON output before truncation.
const MAX_JSON_LENGTH: usize = 8000;

/// Maximum length of a view description.
const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Truncates a string if it exceeds the maximum length.
///
/// If truncated, appends "... [truncated]" to indicate the content was cut.
fn truncate_text(text: &str, max_length: usize) -> String {
    const MARKER: &str = "... [truncated]";
    if text.len() <= max_length {
        return text.to_string();
    }
    let mut end = max_length.saturating_sub(MARKER.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    if let Some(space_pos) = text[..end].rfind(char::is_whitespace) {
        end = space_pos;
    }
    format!("{}{}", &text[..end], MARKER)
}

/// Formats a list of views as human-readable text.
fn format_view_list(views: &[View]) -> String {
    if views.is_empty() {
        return "No views found.".to_string();
    }

    let mut output = format!("Found {} view(s):\n\n", views.len());

    for view in views {
        output.push_str(&format!("#{} - {}", view.id, view.display_title()));
        if !view.is_active() {
            output.push_str(" [inactive]");
        }
        if view.is_personal_or_restricted() {
            output.push_str(" (restricted)");
        }
        output.push('\n');
    }

    output
}

/// Formats full view details as human-readable text.
fn format_view_details(view: &View) -> String {
    let mut output = format!("View #{}: {}\n", view.id, view.display_title());
    output.push_str(&"=".repeat(60));
    output.push('\n');

    output.push_str(&format!(
        "Active: {}\n",
        if view.is_active() { "yes" } else { "no" }
    ));
    if let Some(position) = view.position {
        output.push_str(&format!("Position: {}\n", position));
    }
    if view.default == Some(true) {
        output.push_str("Default view: yes\n");
    }
    output.push_str(&format!(
        "Restricted: {}\n",
        if view.is_personal_or_restricted() { "yes" } else { "no (shared)" }
    ));
    if let Some(created) = &view.created_at {
        output.push_str(&format!("Created: {}\n", created));
    }
    if let Some(updated) = &view.updated_at {
        output.push_str(&format!("Updated: {}\n", updated));
    }

    if let Some(description) = view.description.as_deref().filter(|d| !d.is_empty()) {
        output.push_str("\nDescription:\n");
        output.push_str(&truncate_text(description, MAX_DESCRIPTION_LENGTH));
        output.push('\n');
    }

    if let Some(conditions) = &view.conditions {
        output.push_str("\nConditions:\n");
        output.push_str(&format_json(conditions));
        output.push('\n');
    }

    if let Some(execution) = &view.execution {
        output.push_str("\nExecution:\n");
        output.push_str(&format_json(execution));
        output.push('\n');
    }

    output
}

/// Formats view counts as human-readable text.
fn format_view_counts(counts: &[ViewCount]) -> String {
    if counts.is_empty() {
        return "No counts returned.".to_string();
    }

    let mut output = String::from("Ticket counts:\n\n");
    for count in counts {
        output.push_str(&format!("View #{}: {}", count.view_id, count.display()));
        if count.fresh == Some(false) {
            output.push_str(" (stale, refreshing)");
        }
        output.push('\n');
    }
    output
}

/// Formats execution rows or tickets, one line per item.
///
/// Execution rows nest the ticket under `ticket`; plain tickets do not.
fn format_rows(rows: &[Value], more: bool) -> String {
    if rows.is_empty() {
        return "No tickets in this view.".to_string();
    }

    let mut output = format!("Showing {} ticket(s)", rows.len());
    if more {
        output.push_str(" (more available, raise limit to see them)");
    }
    output.push_str(":\n\n");

    for row in rows {
        let ticket = row.get("ticket").unwrap_or(row);
        let id = ticket
            .get("id")
            .or_else(|| row.get("ticket_id"))
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string());
        let subject = ticket
            .get("subject")
            .or_else(|| row.get("subject"))
            .and_then(Value::as_str)
            .unwrap_or("(no subject)");
        output.push_str(&format!("#{} - {}", id, subject));
        if let Some(status) = ticket.get("status").and_then(Value::as_str) {
            output.push_str(&format!(" [{}]", status));
        }
        output.push('\n');
    }

    output
}

/// Formats a list of raw items as pretty JSON.
fn format_json_items(resource: &str, items: &[Value], truncated: bool) -> String {
    if items.is_empty() {
        return format!("No {} found.", resource);
    }

    let mut output = format!("{} {} item(s)", items.len(), resource);
    if truncated {
        output.push_str(" (more available, raise limit to see them)");
    }
    output.push_str(":\n\n");
    output.push_str(&format_json(&Value::Array(items.to_vec())));
    output
}

/// Pretty-prints JSON, truncated.
fn format_json(value: &Value) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    truncate_text(&pretty, MAX_JSON_LENGTH)
}
