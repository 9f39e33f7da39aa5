//! Model Context Protocol (MCP) server
//!
//! - **server**: tool registration and server metadata
//! - **dispatch**: name-based invocation over the closed set of tools
//! - **tools**: parameter validation and handlers, one module per entity
//! - **format**: Markdown rendering of Todoist entities
//! - **service**: stdio and Streamable HTTP transports

pub mod dispatch;
pub mod format;
pub mod server;
mod service;
pub mod tools;

#[cfg(test)]
mod service_test;

pub use dispatch::{TOOL_NAMES, ToolCall};
pub use server::TodoistServer;
pub use service::{create_mcp_service, mcp_router, serve_http, serve_stdio};
