//! MCP tool inputs for zdesk.
//!
//! This module contains the parameter types of the MCP tools that expose
//! Zendesk views and registry resources.

mod inputs;

pub use inputs::*;
