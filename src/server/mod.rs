pub mod types;

use crate::registry::{ToolRegistry, TOOL_NAMES};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};
use types::{
    error_codes, Capabilities, ContentBlock, InitializeParams, InitializeResult, JsonRpcId,
    JsonRpcRequest, JsonRpcResponse, McpMethod, McpTool, ServerInfo, ToolCallParams,
    ToolCallResult, ToolsCapability, ToolsListResult,
};

/// MCP server speaking line-delimited JSON-RPC 2.0.
///
/// Requests are handled one at a time in arrival order. Each response is
/// written as a single line followed by a flush.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        McpServer { registry }
    }

    /// Serves stdin/stdout until EOF.
    pub async fn serve_stdio(&self) -> anyhow::Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(stdin, stdout).await
    }

    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server ready on stdio with {} tools", TOOL_NAMES.len());
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let json = serde_json::to_string(&response)?;
                debug!("Writing response ({} bytes)", json.len());
                writer.write_all(json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        info!("MCP server shutting down (EOF received)");
        Ok(())
    }

    /// Handles one input line. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Failed to parse JSON-RPC message: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = message
            .get("id")
            .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok());
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                warn!("Invalid JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };
        self.handle_request(request).await
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!("Received notification {}", request.method);
            return None;
        };
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                Some(id),
                error_codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            ));
        }

        debug!("Handling request {}", request.method);
        let response = match McpMethod::from_str(&request.method) {
            Some(McpMethod::Initialize) => self.initialize(id, request.params),
            Some(McpMethod::Ping) => JsonRpcResponse::success(Some(id), json!({})),
            Some(McpMethod::ToolsList) => self.tools_list(id).await,
            Some(McpMethod::ToolsCall) => self.tools_call(id, request.params).await,
            None => {
                warn!("Method not found: {}", request.method);
                JsonRpcResponse::error(
                    Some(id),
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not found: {}", request.method),
                )
            }
        };
        Some(response)
    }

    fn initialize(&self, id: JsonRpcId, params: Value) -> JsonRpcResponse {
        let params: InitializeParams = serde_json::from_value(params).unwrap_or_default();
        let protocol_version = params.negotiate();
        info!("Client initialized with protocol {}", protocol_version);
        respond(
            id,
            &InitializeResult {
                protocol_version,
                capabilities: Capabilities {
                    tools: ToolsCapability {
                        list_changed: false,
                    },
                },
                server_info: ServerInfo {
                    name: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                },
            },
        )
    }

    async fn tools_list(&self, id: JsonRpcId) -> JsonRpcResponse {
        let tools = self
            .registry
            .definitions()
            .await
            .into_iter()
            .map(|def| McpTool {
                name: def.name,
                description: def.description,
                input_schema: def.parameters,
            })
            .collect();
        respond(id, &ToolsListResult { tools })
    }

    async fn tools_call(&self, id: JsonRpcId, params: Value) -> JsonRpcResponse {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(
                    Some(id),
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                )
            }
        };

        match self.registry.call(&params.name, params.arguments).await {
            Ok(output) => {
                let mut content = vec![ContentBlock::Text {
                    text: output.text.clone(),
                }];
                if let Some(structured) = output.structured_json() {
                    content.push(ContentBlock::Text { text: structured });
                }
                respond(
                    id,
                    &ToolCallResult {
                        content,
                        is_error: output.is_error,
                    },
                )
            }
            Err(err) => {
                JsonRpcResponse::error(Some(id), error_codes::INVALID_PARAMS, err.to_string())
            }
        }
    }
}

fn respond<T: Serialize>(id: JsonRpcId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(Some(id), value),
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            JsonRpcResponse::error(Some(id), error_codes::INTERNAL_ERROR, "Internal error")
        }
    }
}
