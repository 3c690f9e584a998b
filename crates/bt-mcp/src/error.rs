//! Error types for the MCP server

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the DIP API client
    #[error(transparent)]
    Dip(#[from] bt_dip::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid tool arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Unknown tool requested
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Unknown resource requested
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
