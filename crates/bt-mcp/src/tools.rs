//! MCP Tool definitions
//!
//! Tools are the primary way a chat client reads plenary protocols.
//!
//! # Tools
//!
//! - `get_latest_protocol` - Session number, date, title and link of the most
//!   recent plenary protocol
//! - `get_latest_protocol_xml` - Full XML transcript of that protocol
//! - `get_protocol_speech` - One speech from that transcript, by speech id

use serde::{Deserialize, Serialize};

pub const GET_LATEST_PROTOCOL: &str = "get_latest_protocol";
pub const GET_LATEST_PROTOCOL_XML: &str = "get_latest_protocol_xml";
pub const GET_PROTOCOL_SPEECH: &str = "get_protocol_speech";

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: GET_LATEST_PROTOCOL.to_string(),
            description: "Get the most recent plenary protocol of the German Bundestag \
                          (session number, date, title and document link). \
                          Das neueste Plenarprotokoll des Deutschen Bundestags."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: GET_LATEST_PROTOCOL_XML.to_string(),
            description: "Get the full XML transcript of the last Bundestag plenary session. \
                          Das Protokoll der letzten Plenarsitzung des Deutschen Bundestags."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: GET_PROTOCOL_SPEECH.to_string(),
            description: "Get a single speech (speaker, text, interjections) from the latest \
                          plenary protocol"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "speech_id": {
                        "type": "string",
                        "description": "Speech id from the transcript, e.g. ID2012300100"
                    }
                },
                "required": ["speech_id"]
            }),
        },
    ]
}
