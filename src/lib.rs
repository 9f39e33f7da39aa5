//! MCP server exposing a Todoist account to AI assistants.

pub mod client;
pub mod config;
pub mod mcp;
mod serde_utils;
