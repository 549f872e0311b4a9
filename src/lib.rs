//! MCP server exposing the AltText.ai image alt text API as agent tools.

pub mod alttext;
pub mod config;
pub mod format;
pub mod mcp_server;
pub mod tools;
