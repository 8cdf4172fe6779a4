//! Request paths.
//!
//! An [`ApiPath`] is an ordered list of segments: literals, identifiers and
//! parameter objects. Literals and identifiers become path components;
//! parameter objects become the query string. Identifiers are encoded but
//! never validated here.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::registry::PARENT_PLACEHOLDER;

/// One element of a request path.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Fixed path component such as `views` or `count_many`.
    Literal(Cow<'static, str>),
    /// Caller-supplied identifier, percent-encoded when rendered.
    Id(String),
    /// Parameter object rendered into the query string.
    Params(Value),
}

impl From<&'static str> for Segment {
    fn from(value: &'static str) -> Self {
        Segment::Literal(Cow::Borrowed(value))
    }
}

/// Ordered segment list used to build a request URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiPath {
    segments: Vec<Segment>,
}

impl ApiPath {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a path from a registry template such as `tickets/{parent}/audits`.
    ///
    /// Returns `None` when the template has a `{parent}` slot and no parent is given.
    pub fn from_template(template: &'static str, parent: Option<&str>) -> Option<Self> {
        let mut path = Self::new();
        for part in template.split('/').filter(|p| !p.is_empty()) {
            if part == PARENT_PLACEHOLDER {
                path = path.id(parent?);
            } else {
                path = path.lit(part);
            }
        }
        Some(path)
    }

    /// Appends a literal segment.
    pub fn lit(mut self, literal: &'static str) -> Self {
        self.segments.push(Segment::Literal(Cow::Borrowed(literal)));
        self
    }

    /// Appends an identifier segment.
    pub fn id(mut self, id: impl fmt::Display) -> Self {
        self.segments.push(Segment::Id(id.to_string()));
        self
    }

    /// Appends a parameter object.
    pub fn params(mut self, params: Value) -> Self {
        self.segments.push(Segment::Params(params));
        self
    }

    /// Appends an arbitrary segment.
    pub fn push(mut self, segment: impl Into<Segment>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// The segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Renders the relative URL: `views/1/count.json?ids=1,2`.
    ///
    /// `dot_json` appends `.json` to the last path component.
    pub fn render(&self, dot_json: bool) -> String {
        let components: Vec<Cow<'_, str>> = self
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Literal(lit) => Some(Cow::Borrowed(lit.as_ref())),
                Segment::Id(id) => Some(urlencoding::encode(id)),
                Segment::Params(_) => None,
            })
            .collect();

        let mut out = components.join("/");
        if dot_json && !out.is_empty() {
            out.push_str(".json");
        }

        let query = self.query_string();
        if !query.is_empty() {
            out.push('?');
            out.push_str(&query);
        }
        out
    }

    /// Query string built from every parameter object, in segment order.
    pub fn query_string(&self) -> String {
        let mut pairs = Vec::new();
        for segment in &self.segments {
            if let Segment::Params(params) = segment {
                append_query(&mut pairs, params);
            }
        }
        pairs.join("&")
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

fn append_query(pairs: &mut Vec<String>, params: &Value) {
    match params {
        Value::Object(map) => {
            for (key, value) in map {
                if let Some(rendered) = query_value(value) {
                    pairs.push(format!(
                        "{}={}",
                        urlencoding::encode(key),
                        urlencoding::encode(&rendered)
                    ));
                }
            }
        }
        Value::Null => {}
        other => {
            if let Some(rendered) = query_value(other) {
                pairs.push(urlencoding::encode(&rendered).into_owned());
            }
        }
    }
}

/// Arrays are comma-joined, which is how the API takes `ids` lists.
fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_literals_and_ids() {
        let path = ApiPath::new().lit("views").id(12345).lit("count");
        assert_eq!(path.render(true), "views/12345/count.json");
        assert_eq!(path.render(false), "views/12345/count");
    }

    #[test]
    fn test_render_ids_param_comma_joined() {
        let path = ApiPath::new()
            .lit("views")
            .lit("count_many")
            .params(json!({"ids": [12345, 67890]}));
        assert_eq!(path.render(true), "views/count_many.json?ids=12345%2C67890");
    }

    #[test]
    fn test_identifiers_are_encoded_not_validated() {
        let path = ApiPath::new().lit("views").id("../etc");
        assert_eq!(path.render(false), "views/..%2Fetc");
    }

    #[test]
    fn test_null_params_skipped() {
        let path = ApiPath::new()
            .lit("views")
            .id(1)
            .lit("execute")
            .params(json!({"sort_by": "status", "page": null}));
        assert_eq!(path.render(false), "views/1/execute?sort_by=status");

        let path = ApiPath::new().lit("views").params(Value::Null);
        assert_eq!(path.render(true), "views.json");
    }

    #[test]
    fn test_from_template() {
        let path = ApiPath::from_template("tickets/{parent}/audits", Some("42")).unwrap();
        assert_eq!(path.render(true), "tickets/42/audits.json");
        assert!(ApiPath::from_template("tickets/{parent}/audits", None).is_none());
        let flat = ApiPath::from_template("account/settings", None).unwrap();
        assert_eq!(flat.segments().len(), 2);
    }

    #[test]
    fn test_paths_compare_by_segments() {
        let a = ApiPath::new().lit("views").id(7);
        let b = ApiPath::new().push("views").push(Segment::Id("7".into()));
        assert_eq!(a, b);
    }
}
