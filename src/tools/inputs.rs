//! Tool input parameter structs for MCP tools.
//!
//! Each struct derives `JsonSchema` so the MCP client can discover the
//! tool's parameters.
//!
//! # Input Sanitization
//!
//! Structs with string fields implement `sanitize()`, which trims
//! whitespace and drops empty strings. Structs with constraints the schema
//! cannot express implement `validate()`. Call both before using the input.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use crate::error::ZendeskError;

/// Default number of items a listing tool returns.
pub const DEFAULT_LIMIT: usize = 25;

/// Upper bound for `limit` fields.
pub const MAX_LIMIT: usize = 100;

/// Helper function to trim an optional string.
fn trim_option(s: &Option<String>) -> Option<String> {
    s.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Clamps an optional limit to `1..=MAX_LIMIT`.
fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Which view listing `list_views` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    /// Shared and personal views.
    All,
    /// Active shared and personal views.
    #[default]
    Active,
    /// Compact form of all views.
    Compact,
    /// Active shared views only.
    Shared,
}

/// Input parameters for the list_views tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListViewsInput {
    /// Which views to list: "all", "active" (default), "compact" or "shared".
    #[serde(default)]
    pub filter: ViewFilter,
}

/// Input parameters for the get_view tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetViewInput {
    /// The numeric ID of the view.
    pub view_id: u64,
}

/// Input parameters for the count_views tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CountViewsInput {
    /// IDs of the views to count (at least one).
    pub view_ids: Vec<u64>,
}

impl CountViewsInput {
    /// Rejects an empty ID list.
    pub fn validate(&self) -> Result<(), ZendeskError> {
        if self.view_ids.is_empty() {
            return Err(ZendeskError::validation("view_ids must not be empty"));
        }
        Ok(())
    }
}

/// Input parameters for the execute_view tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteViewInput {
    /// The numeric ID of the view to execute.
    pub view_id: u64,

    /// Column to sort by (e.g., "created_at", "priority").
    #[serde(default)]
    pub sort_by: Option<String>,

    /// Sort direction: "asc" or "desc".
    #[serde(default)]
    pub sort_order: Option<String>,

    /// Maximum number of rows to return (default: 25, max: 100).
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ExecuteViewInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            view_id: self.view_id,
            sort_by: trim_option(&self.sort_by),
            sort_order: trim_option(&self.sort_order).map(|s| s.to_lowercase()),
            limit: self.limit,
        }
    }

    /// Rejects sort orders other than "asc" and "desc".
    pub fn validate(&self) -> Result<(), ZendeskError> {
        match self.sort_order.as_deref() {
            None | Some("asc") | Some("desc") => Ok(()),
            Some(other) => Err(ZendeskError::validation(format!(
                "sort_order must be 'asc' or 'desc', got '{}'",
                other
            ))),
        }
    }

    /// Effective row limit.
    pub fn limit(&self) -> usize {
        clamp_limit(self.limit)
    }
}

/// Input parameters for the list_view_tickets tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ViewTicketsInput {
    /// The numeric ID of the view.
    pub view_id: u64,

    /// Maximum number of tickets to return (default: 25, max: 100).
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ViewTicketsInput {
    /// Effective ticket limit.
    pub fn limit(&self) -> usize {
        clamp_limit(self.limit)
    }
}

/// Input parameters for the reorder_views tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReorderViewsInput {
    /// View IDs in the desired order.
    pub view_order: Vec<u64>,
}

impl ReorderViewsInput {
    /// Rejects an empty or duplicated order.
    pub fn validate(&self) -> Result<(), ZendeskError> {
        if self.view_order.is_empty() {
            return Err(ZendeskError::validation("view_order must not be empty"));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.view_order.iter().find(|id| !seen.insert(**id)) {
            return Err(ZendeskError::validation(format!(
                "view_order lists view {} twice",
                dup
            )));
        }
        Ok(())
    }
}

/// Input parameters for the delete_view tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteViewInput {
    /// The numeric ID of the view to delete.
    pub view_id: u64,
}

/// Input parameters for the list_resources tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListResourcesInput {
    /// Registry name of the resource (e.g., "Tickets", "Users", "TicketAudits").
    pub resource: String,

    /// Parent ID for nested resources (e.g., the ticket ID for "TicketAudits").
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Maximum number of items to return (default: 25, max: 100).
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListResourcesInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            resource: self.resource.trim().to_string(),
            parent_id: trim_option(&self.parent_id),
            limit: self.limit,
        }
    }

    /// Rejects an empty resource name.
    pub fn validate(&self) -> Result<(), ZendeskError> {
        if self.resource.is_empty() {
            return Err(ZendeskError::validation("resource is required"));
        }
        Ok(())
    }

    /// Effective item limit.
    pub fn limit(&self) -> usize {
        clamp_limit(self.limit)
    }
}

/// Input parameters for the get_resource tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetResourceInput {
    /// Registry name of the resource (e.g., "Tickets", "Users").
    pub resource: String,

    /// ID of the item to fetch.
    pub id: String,

    /// Parent ID for nested resources.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl GetResourceInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            resource: self.resource.trim().to_string(),
            id: self.id.trim().to_string(),
            parent_id: trim_option(&self.parent_id),
        }
    }

    /// Rejects an empty resource name or ID.
    pub fn validate(&self) -> Result<(), ZendeskError> {
        if self.resource.is_empty() {
            return Err(ZendeskError::validation("resource is required"));
        }
        if self.id.is_empty() {
            return Err(ZendeskError::validation("id is required"));
        }
        Ok(())
    }
}
