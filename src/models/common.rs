//! Types shared across resource families.
//!
//! Covers the error envelope the API returns on failures and the
//! pagination blocks carried by list responses.

use serde::Deserialize;
use serde_json::Value;

/// Error body returned with 4xx/5xx responses.
///
/// The API uses two shapes: `{"error": "RecordNotFound", "description": "..."}`
/// and `{"error": {"title": "...", "message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code string, or a nested object with title and message.
    #[serde(default)]
    pub error: Option<Value>,

    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Per-field validation details.
    #[serde(default)]
    pub details: Option<Value>,
}

impl ApiErrorBody {
    /// Parses an error body, returning `None` if it has none of the known fields.
    pub fn from_value(value: &Value) -> Option<Self> {
        let body = Self::deserialize(value).ok()?;
        if body.error.is_none() && body.description.is_none() {
            return None;
        }
        Some(body)
    }

    /// One-line summary such as `RecordNotFound: Not found`.
    pub fn summary(&self) -> String {
        let code = match &self.error {
            Some(Value::String(code)) => Some(code.clone()),
            Some(Value::Object(obj)) => obj
                .get("title")
                .or_else(|| obj.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };
        match (code, &self.description) {
            (Some(code), Some(desc)) => format!("{}: {}", code, desc),
            (Some(code), None) => code,
            (None, Some(desc)) => desc.clone(),
            (None, None) => "Unknown error".to_string(),
        }
    }
}

/// Cursor pagination metadata (`meta` block).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CursorMeta {
    /// Whether more pages follow.
    #[serde(default)]
    pub has_more: bool,

    /// Cursor for the next page.
    #[serde(default)]
    pub after_cursor: Option<String>,

    /// Cursor for the previous page.
    #[serde(default)]
    pub before_cursor: Option<String>,
}

/// Offset and cursor pagination fields of a list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    /// Absolute URL of the next page (offset pagination).
    #[serde(default)]
    pub next_page: Option<String>,

    /// Absolute URL of the previous page (offset pagination).
    #[serde(default)]
    pub previous_page: Option<String>,

    /// Total number of records, when the endpoint reports it.
    #[serde(default)]
    pub count: Option<u64>,

    /// Cursor metadata (cursor pagination).
    #[serde(default)]
    pub meta: Option<CursorMeta>,

    /// Cursor navigation links (cursor pagination).
    #[serde(default)]
    pub links: Option<PageLinks>,
}

/// Cursor navigation links (`links` block).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    /// Absolute URL of the next page.
    #[serde(default)]
    pub next: Option<String>,

    /// Absolute URL of the previous page.
    #[serde(default)]
    pub prev: Option<String>,
}

impl PageInfo {
    /// Reads the pagination fields out of a raw page.
    ///
    /// Pages that are not objects yield empty info.
    pub fn from_page(page: &Value) -> Self {
        Self::deserialize(page).unwrap_or_default()
    }

    /// URL of the following page, if any.
    ///
    /// Cursor metadata wins over `next_page` when present; `has_more: false`
    /// ends the walk even if a `links.next` is still set.
    pub fn next_url(&self) -> Option<String> {
        if let Some(meta) = &self.meta {
            if !meta.has_more {
                return None;
            }
            if let Some(next) = self.links.as_ref().and_then(|l| l.next.clone()) {
                return Some(next);
            }
        }
        self.next_page.clone().filter(|url| !url.is_empty())
    }

    /// URL of the preceding page, if any.
    pub fn previous_url(&self) -> Option<String> {
        self.links
            .as_ref()
            .and_then(|l| l.prev.clone())
            .or_else(|| self.previous_page.clone())
            .filter(|url| !url.is_empty())
    }
}
