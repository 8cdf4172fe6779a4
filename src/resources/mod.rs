//! Resource clients.
//!
//! A resource client turns the operations of one API resource into transport
//! calls. [`Views`] is fully typed; every other registry entry is served by
//! the generic [`Resource`].

mod generic;
mod views;

pub use generic::Resource;
pub use views::Views;

use serde_json::Value;

/// Returns the payload under the first root present in `body`, or `body` itself.
pub fn unwrap_root(body: Value, roots: &[&str]) -> Value {
    match body {
        Value::Object(mut map) => match roots.iter().find(|root| map.contains_key(**root)) {
            Some(root) => map.remove(*root).unwrap_or(Value::Null),
            None => Value::Object(map),
        },
        other => other,
    }
}
