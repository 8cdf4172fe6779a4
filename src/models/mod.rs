//! Data models for the Zendesk API.
//!
//! Only the views family is fully typed; every other resource client works
//! on `serde_json::Value`.

mod common;
mod view;

pub use common::*;
pub use view::*;
