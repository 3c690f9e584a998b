//! MCP Server implementation
//!
//! The main server struct that coordinates MCP protocol handling
//! with the DIP API client.

use std::io::{BufRead, Write};

use bt_dip::DipClient;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::handlers::handle_tool_call;
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, ReadResourceParams,
    ResourcesCapability, ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability, codes,
};
use crate::resource_handlers::read_resource;
use crate::resources::{ResourceDefinition, get_resource_definitions};
use crate::tools::{ToolDefinition, ToolResult, get_tool_definitions};
use crate::{Error, Result};

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "bundestag-mcp";

/// MCP Server for Bundestag plenary protocols
///
/// Stateless apart from the tool/resource tables: every tool call is an
/// independent round trip to the DIP API.
///
/// # Example
///
/// ```ignore
/// use bt_dip::{DipClient, DipConfig};
/// use bt_mcp::BundestagMcpServer;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = DipClient::new(DipConfig::from_env()?)?;
///     let mut server = BundestagMcpServer::new(client);
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct BundestagMcpServer {
    /// DIP API client
    client: DipClient,

    /// Whether the server has been initialized
    initialized: bool,

    /// Available MCP tools
    tools: Vec<ToolDefinition>,

    /// Available MCP resources
    resources: Vec<ResourceDefinition>,
}

impl BundestagMcpServer {
    /// Create a new MCP server instance
    pub fn new(client: DipClient) -> Self {
        Self {
            client,
            initialized: false,
            tools: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Initialize the server
    ///
    /// Loads the tool and resource tables. No network access happens here;
    /// a missing API key is reported per tool call.
    pub async fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            base_url = %self.client.config().base_url,
            api_key_configured = self.client.config().api_key.is_some(),
            "Initializing MCP server"
        );
        if self.client.config().api_key.is_none() {
            tracing::warn!("BUNDESTAG_API_KEY is not set; tool calls will fail until it is");
        }

        self.tools = get_tool_definitions();
        self.resources = get_resource_definitions();

        self.initialized = true;
        Ok(())
    }

    /// Run the MCP server on stdin/stdout
    pub async fn run(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(stdin.lock(), stdout.lock()).await
    }

    /// Process newline-delimited JSON-RPC messages until `reader` is exhausted
    pub async fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        self.initialize().await?;

        tracing::info!("MCP server ready, listening on stdio");

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "Received message");

            let response = match self.handle_message(&line).await {
                Ok(response) if response.is_empty() => continue, // Notification
                Ok(response) => response,
                Err(Error::Json(e)) => {
                    tracing::warn!(error = %e, "Malformed message");
                    serde_json::to_string(&JsonRpcResponse::error(
                        None,
                        codes::PARSE_ERROR,
                        format!("Parse error: {}", e),
                    ))?
                }
                Err(e) => serde_json::to_string(&JsonRpcResponse::error(
                    None,
                    codes::INTERNAL_ERROR,
                    format!("Internal error: {}", e),
                ))?,
            };

            writeln!(writer, "{}", response)?;
            writer.flush()?;
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Parses the JSON-RPC request and dispatches to the appropriate handler.
    ///
    /// # Returns
    ///
    /// The JSON-RPC response as a string, or empty string for notifications.
    ///
    /// # Errors
    ///
    /// Fails only when `message` is not JSON at all. JSON that is not a
    /// request object is answered with an Invalid Request error.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let value: Value = serde_json::from_str(message)?;
        let request = match JsonRpcRequest::deserialize(&value) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid request");
                let response = JsonRpcResponse::error(
                    value.get("id").cloned(),
                    codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                );
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            "resources/list" => self.handle_resources_list(request.id),
            "resources/read" => self.handle_resources_read(request.id, request.params).await,
            _ if request.is_notification() => return Ok(String::new()),
            _ => JsonRpcResponse::error(
                request.id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    /// Handle the initialize request
    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        match InitializeParams::deserialize(&params) {
            Ok(params) => tracing::info!(
                client = %params.client_info.name,
                client_version = %params.client_info.version,
                protocol_version = %params.protocol_version,
                "Client connected"
            ),
            Err(e) => tracing::debug!(error = %e, "Initialize without client info"),
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Plenary protocols of the German Bundestag from the DIP API. \
                 Use get_latest_protocol for a summary of the most recent session."
                    .to_string(),
            ),
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<Value> = self
            .tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Handle tools/call request
    ///
    /// Tool failures (network, auth, empty result, parse) become tool results
    /// with `isError: true` so the client can show them to the user.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        tracing::info!(tool = %tool_params.name, "Tool call");

        let tool_result =
            match handle_tool_call(&self.client, &tool_params.name, tool_params.arguments).await {
                Ok(text) => ToolResult::text(text),
                Err(e) => {
                    tracing::warn!(tool = %tool_params.name, error = %e, "Tool call failed");
                    ToolResult::error(e.to_string())
                }
            };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(tool_result)?))
    }

    /// Handle resources/list request
    fn handle_resources_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let resources: Vec<Value> = self
            .resources
            .iter()
            .map(|r| {
                json!({
                    "uri": r.uri,
                    "name": r.name,
                    "description": r.description,
                    "mimeType": r.mime_type
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "resources": resources }))
    }

    /// Handle resources/read request
    async fn handle_resources_read(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let read_params: ReadResourceParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(id, codes::INVALID_PARAMS, format!("Invalid params: {}", e));
            }
        };

        match read_resource(&self.client, &read_params.uri).await {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "contents": [{
                        "uri": content.uri,
                        "mimeType": content.mime_type,
                        "text": content.text
                    }]
                }),
            ),
            Err(e) => {
                tracing::warn!(uri = %read_params.uri, error = %e, "Resource read failed");
                JsonRpcResponse::error(id, codes::INVALID_PARAMS, format!("Resource error: {}", e))
            }
        }
    }

    /// Check if the server is initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get available tools
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Get available resources
    pub fn resources(&self) -> &[ResourceDefinition] {
        &self.resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt_dip::DipConfig;
    use std::time::Duration;

    fn test_server() -> BundestagMcpServer {
        let client = DipClient::new(DipConfig::new(
            Some("test".to_string()),
            "http://127.0.0.1:9/api/v1",
            Duration::from_secs(1),
        ))
        .unwrap();
        BundestagMcpServer::new(client)
    }

    async fn initialized_server() -> BundestagMcpServer {
        let mut server = test_server();
        server.initialize().await.unwrap();
        server
    }

    #[test]
    fn server_creation() {
        let server = test_server();
        assert!(!server.is_initialized());
        assert!(server.tools().is_empty());
        assert!(server.resources().is_empty());
    }

    #[tokio::test]
    async fn initialize_loads_tables() {
        let server = initialized_server().await;
        assert!(server.is_initialized());

        let tool_names: Vec<&str> = server.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            tool_names,
            vec!["get_latest_protocol", "get_latest_protocol_xml", "get_protocol_speech"]
        );
        assert_eq!(server.resources().len(), 7);
    }

    #[tokio::test]
    async fn handle_initialize() {
        let server = initialized_server().await;
        let request = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1.0"}}}"#;

        let parsed: Value = serde_json::from_str(&server.handle_message(request).await.unwrap()).unwrap();
        assert_eq!(parsed["result"]["serverInfo"]["name"], "bundestag-mcp");
        assert_eq!(parsed["result"]["protocolVersion"], "2024-11-05");
        assert!(parsed["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let server = initialized_server().await;
        for request in [
            r#"{"jsonrpc":"2.0","method":"initialized"}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":3}}"#,
        ] {
            assert!(server.handle_message(request).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn ping_returns_empty_result() {
        let server = initialized_server().await;
        let parsed: Value = serde_json::from_str(
            &server
                .handle_message(r#"{"jsonrpc":"2.0","id":9,"method":"ping"}"#)
                .await
                .unwrap(),
        )
        .unwrap();
        assert_eq!(parsed["result"], json!({}));
    }

    #[tokio::test]
    async fn unknown_method() {
        let server = initialized_server().await;
        let request = r#"{"jsonrpc":"2.0","id":4,"method":"unknown/method","params":{}}"#;

        let response = server.handle_message(request).await.unwrap();
        assert!(response.contains("-32601"));
        assert!(response.contains("Method not found: unknown/method"));
    }

    #[tokio::test]
    async fn unknown_tool_is_tool_error() {
        let server = initialized_server().await;
        let request = r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"unknown_tool","arguments":{}}}"#;

        let parsed: Value = serde_json::from_str(&server.handle_message(request).await.unwrap()).unwrap();
        assert_eq!(parsed["result"]["isError"], true);
        assert_eq!(parsed["result"]["content"][0]["text"], "Unknown tool: unknown_tool");
    }

    #[tokio::test]
    async fn tools_call_without_name_is_invalid_params() {
        let server = initialized_server().await;
        let request = r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{}}"#;

        let parsed: Value = serde_json::from_str(&server.handle_message(request).await.unwrap()).unwrap();
        assert_eq!(parsed["error"]["code"], -32602);
        assert_eq!(parsed["id"], 6);
    }

    #[tokio::test]
    async fn unknown_resource_is_invalid_params() {
        let server = initialized_server().await;
        let request = r#"{"jsonrpc":"2.0","id":7,"method":"resources/read","params":{"uri":"repo://config"}}"#;

        let parsed: Value = serde_json::from_str(&server.handle_message(request).await.unwrap()).unwrap();
        assert_eq!(parsed["error"]["code"], -32602);
        assert!(parsed["error"]["message"].as_str().unwrap().contains("Unknown resource"));
    }

    #[tokio::test]
    async fn non_request_json_is_invalid_request() {
        let server = initialized_server().await;

        for (request, id) in [
            (r#"{"jsonrpc":"2.0","id":1,"params":{}}"#, json!(1)),
            (r#"{"jsonrpc":"2.0","id":"x","method":7}"#, json!("x")),
            (r#"[1,2,3]"#, Value::Null),
        ] {
            let parsed: Value = serde_json::from_str(&server.handle_message(request).await.unwrap()).unwrap();
            assert_eq!(parsed["error"]["code"], -32600, "{request}");
            assert_eq!(parsed["id"], id, "{request}");
        }
    }

    #[tokio::test]
    async fn invalid_json_is_an_error() {
        let server = initialized_server().await;
        assert!(matches!(
            server.handle_message(r#"{"invalid json"#).await,
            Err(Error::Json(_))
        ));
    }

    #[tokio::test]
    async fn serve_answers_each_request_line() {
        let mut server = test_server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            "not json\n",
            r#"{"jsonrpc":"2.0","id":7}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();

        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["error"]["code"], -32700);
        assert!(lines[1].get("id").is_none());
        assert_eq!(lines[2]["error"]["code"], -32600);
        assert_eq!(lines[2]["id"], 7);
        assert_eq!(lines[3]["id"], 2);
        assert_eq!(lines[3]["result"]["tools"].as_array().unwrap().len(), 3);
    }
}
