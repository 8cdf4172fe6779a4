//! View models.
//!
//! A view is a saved ticket filter. These types cover the view itself, the
//! draft used to create, update or preview one, execution parameters and the
//! ticket count reported for a view.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A shared or personal view.
///
/// Compact listings omit most fields, so everything except `id` is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    /// Unique identifier.
    pub id: u64,

    /// Display title.
    #[serde(default)]
    pub title: Option<String>,

    /// Whether the view is active.
    #[serde(default)]
    pub active: Option<bool>,

    /// Position in the agent's view list.
    #[serde(default)]
    pub position: Option<i64>,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// True for the system default views.
    #[serde(default)]
    pub default: Option<bool>,

    /// Who can see the view (`null` means everyone).
    #[serde(default)]
    pub restriction: Option<Value>,

    /// Columns, grouping and sorting used when the view is executed.
    #[serde(default)]
    pub execution: Option<Value>,

    /// `all` / `any` condition sets.
    #[serde(default)]
    pub conditions: Option<Value>,

    /// Creation timestamp (ISO 8601).
    #[serde(default)]
    pub created_at: Option<String>,

    /// Last update timestamp (ISO 8601).
    #[serde(default)]
    pub updated_at: Option<String>,

    /// API URL of the view.
    #[serde(default)]
    pub url: Option<String>,
}

impl View {
    /// Returns the title or a placeholder.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    /// Returns true unless the API explicitly marked the view inactive.
    pub fn is_active(&self) -> bool {
        self.active != Some(false)
    }

    /// Returns true when the view is restricted to a group or user.
    pub fn is_personal_or_restricted(&self) -> bool {
        matches!(&self.restriction, Some(r) if !r.is_null())
    }
}

/// One condition of a view draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    /// Ticket field, e.g. `status`.
    pub field: String,
    /// Operator, e.g. `less_than`.
    pub operator: String,
    /// Value to compare against.
    pub value: Value,
}

impl Condition {
    /// Creates a condition.
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Body for creating, updating or previewing a view.
///
/// Sent wrapped as `{"view": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewDraft {
    /// Display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Position in the list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Conditions that must all match.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all: Vec<Condition>,

    /// Conditions of which at least one must match.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any: Vec<Condition>,

    /// Output settings (columns, grouping, sorting).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,

    /// Visibility restriction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<Value>,
}

impl ViewDraft {
    /// Creates a draft with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Adds an `all` condition.
    pub fn with_all(mut self, condition: Condition) -> Self {
        self.all.push(condition);
        self
    }

    /// Adds an `any` condition.
    pub fn with_any(mut self, condition: Condition) -> Self {
        self.any.push(condition);
        self
    }

    /// Sets the output block.
    pub fn with_output(mut self, output: Value) -> Self {
        self.output = Some(output);
        self
    }

    /// Wraps the draft under the `view` key.
    pub fn to_body(&self) -> Result<Value, serde_json::Error> {
        Ok(serde_json::json!({ "view": serde_json::to_value(self)? }))
    }
}

/// Sorting and grouping parameters for executing a view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteParams {
    /// Column to sort by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// `asc` or `desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,

    /// Column to group by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,

    /// `asc` or `desc` for the grouping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_order: Option<String>,
}

impl ExecuteParams {
    /// Creates empty parameters (the view's own ordering applies).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts by a column.
    pub fn sort_by(mut self, column: impl Into<String>) -> Self {
        self.sort_by = Some(column.into());
        self
    }

    /// Sets the sort order.
    pub fn sort_order(mut self, order: impl Into<String>) -> Self {
        self.sort_order = Some(order.into());
        self
    }

    /// Groups by a column.
    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = Some(column.into());
        self
    }

    /// Sets the group order.
    pub fn group_order(mut self, order: impl Into<String>) -> Self {
        self.group_order = Some(order.into());
        self
    }
}

/// Ticket count for one view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewCount {
    /// The counted view.
    pub view_id: u64,

    /// API URL of the count.
    #[serde(default)]
    pub url: Option<String>,

    /// Cached count; `null` while the count is being computed.
    #[serde(default)]
    pub value: Option<u64>,

    /// Display form, e.g. `~1k`.
    #[serde(default)]
    pub pretty: Option<String>,

    /// False when `value` is stale and a refresh is pending.
    #[serde(default)]
    pub fresh: Option<bool>,

    /// Whether the view is active.
    #[serde(default)]
    pub active: Option<bool>,
}

impl ViewCount {
    /// Display form of the count.
    pub fn display(&self) -> String {
        match (&self.pretty, self.value) {
            (Some(pretty), _) => pretty.clone(),
            (None, Some(value)) => value.to_string(),
            (None, None) => "pending".to_string(),
        }
    }
}

/// `{"view": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ViewResponse {
    /// The view.
    pub view: View,
}

/// `{"views": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct ViewsResponse {
    /// The views.
    #[serde(default)]
    pub views: Vec<View>,
}

/// `{"view_count": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ViewCountResponse {
    /// The count.
    pub view_count: ViewCount,
}

/// `{"view_counts": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct ViewCountsResponse {
    /// The counts.
    #[serde(default)]
    pub view_counts: Vec<ViewCount>,
}
