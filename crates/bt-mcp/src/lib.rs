//! MCP Server for Bundestag plenary protocols
//!
//! This crate exposes the plenary protocols of the German Bundestag, as
//! published by the DIP API, via the Model Context Protocol (MCP), so that
//! chat clients (like Claude Desktop, Windsurf, Cursor) can look up the most
//! recent session.
//!
//! # Architecture
//!
//! The `bt-mcp` crate is a thin facade over the `bt-dip` client library:
//!
//! ```text
//! [ MCP Client (Claude/IDE) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ bt-mcp (MCP Server) ]
//!        | (Rust API)
//!        v
//! [ bt-dip (DIP client + transcript parsing) ]
//!        | (HTTPS)
//!        v
//! [ search.dip.bundestag.de ]
//! ```
//!
//! # Tools
//!
//! - `get_latest_protocol` - summary of the newest plenary protocol
//! - `get_latest_protocol_xml` - its full XML transcript
//! - `get_protocol_speech` - one speech from that transcript
//!
//! # Resources
//!
//! Read-only JSON views of the latest transcript under
//! `bundestag://protocol/latest/` (metadata, toc, agenda, speakers,
//! speeches, attachments, full).

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod resource_handlers;
pub mod resources;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::BundestagMcpServer;
pub use tools::{ToolContent, ToolDefinition, ToolResult, get_tool_definitions};
