mod fields;
mod youtrack;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

/// How a tool renders its result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

fn internal_error(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError::new(JsonRpcError::INTERNAL_ERROR, format!("Internal error: {e}"))
}

/// Deserialize tool arguments, treating missing arguments as `{}`
pub fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<serde_json::Value>,
) -> Result<T, JsonRpcError> {
    let arguments = arguments.unwrap_or_else(|| serde_json::json!({}));
    serde_json::from_value(arguments).map_err(|e| {
        JsonRpcError::new(
            JsonRpcError::INVALID_PARAMS,
            format!("Invalid arguments: {e}"),
        )
    })
}

/// Wrap plain text in an MCP tool result
pub fn text_result(text: String) -> Result<serde_json::Value, JsonRpcError> {
    let result = CallToolResult {
        content: vec![Content::Text { text }],
        is_error: None,
    };

    serde_json::to_value(result).map_err(internal_error)
}

/// Render `data` as pretty JSON or through `render_text`
pub fn format_result<T: Serialize>(
    data: &T,
    format: OutputFormat,
    render_text: fn(&T) -> String,
) -> Result<serde_json::Value, JsonRpcError> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(|e| {
            JsonRpcError::new(
                JsonRpcError::INTERNAL_ERROR,
                format!("Serialization error: {e}"),
            )
        })?,
        OutputFormat::Text => render_text(data),
    };

    text_result(text)
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "trackertools".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(internal_error)
}

/// JSON schema shared by every tool that accepts field selector adjustments
fn field_arg_properties() -> serde_json::Value {
    serde_json::json!({
        "fields": {
            "type": "array",
            "items": { "type": "string" },
            "description": "Extra fields to request, as names or dot-paths (e.g., 'project.leader.login')"
        },
        "selector": {
            "type": "string",
            "description": "Selector fragment to merge into the default fields (e.g., 'votes,watchers(hasStar)')"
        },
        "exclude": {
            "type": "array",
            "items": { "type": "string" },
            "description": "Dot-paths to drop from the default fields (e.g., 'customFields')"
        },
        "format": {
            "type": "string",
            "description": "Output format (default: json)",
            "enum": ["json", "text"]
        }
    })
}

/// Merge two JSON objects' properties
fn with_properties(mut base: serde_json::Value, extra: serde_json::Value) -> serde_json::Value {
    if let (Some(base), serde_json::Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
    base
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "youtrack_search_issues".to_string(),
            description: "Search YouTrack issues using YouTrack query syntax (the same syntax as the search box, e.g. 'project: PLT #Unresolved'). Returns id, summary, project, state, priority, assignee, reporter and custom fields. Paginate with limit and skip; the response includes next_skip when more results may exist. Requires YOUTRACK_BASE_URL and YOUTRACK_TOKEN environment variables.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": with_properties(serde_json::json!({
                    "query": {
                        "type": "string",
                        "description": "YouTrack search query (e.g., 'for: me #Unresolved')"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of results to return (default: 10, max: 100)"
                    },
                    "skip": {
                        "type": "number",
                        "description": "Number of results to skip (default: 0)"
                    }
                }), field_arg_properties()),
                "required": ["query"]
            }),
        },
        Tool {
            name: "youtrack_get_issue".to_string(),
            description: "Get a YouTrack issue with its description, tags, custom fields and comments. Requires YOUTRACK_BASE_URL and YOUTRACK_TOKEN environment variables.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": with_properties(serde_json::json!({
                    "issueId": {
                        "type": "string",
                        "description": "Issue ID (e.g., 'PLT-123')"
                    }
                }), field_arg_properties()),
                "required": ["issueId"]
            }),
        },
        Tool {
            name: "youtrack_list_projects".to_string(),
            description: "List YouTrack projects with their short name, leader and archived status. Requires YOUTRACK_BASE_URL and YOUTRACK_TOKEN environment variables.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": with_properties(serde_json::json!({
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of projects to return (default: 10, max: 100)"
                    },
                    "skip": {
                        "type": "number",
                        "description": "Number of projects to skip (default: 0)"
                    }
                }), field_arg_properties()),
                "required": []
            }),
        },
        Tool {
            name: "fields_edit".to_string(),
            description: "Build or edit a YouTrack field selector (the 'fields' parameter syntax, e.g. 'id,project(id,name)') without contacting the server. Operations: 'build' merges selector, preset and fields with root-level de-duplication; 'add' appends a fragment under the field at path; 'remove' deletes the field at path; 'parse' returns the selector as a JSON tree.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "operation": {
                        "type": "string",
                        "description": "Operation to perform",
                        "enum": ["build", "add", "remove", "parse"]
                    },
                    "selector": {
                        "type": "string",
                        "description": "Selector to start from or edit"
                    },
                    "preset": {
                        "type": "string",
                        "description": "Default selector to start from ('build' only)",
                        "enum": ["issue", "issue-detail", "project", "comment"]
                    },
                    "fields": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Fields to add as names or dot-paths ('build' only)"
                    },
                    "path": {
                        "type": "string",
                        "description": "Dot-path of the target field ('add' and 'remove')"
                    },
                    "field": {
                        "type": "string",
                        "description": "Selector fragment to append ('add' only)"
                    }
                },
                "required": ["operation"]
            }),
        },
    ];

    let result = ToolsList { tools };

    serde_json::to_value(result).map_err(internal_error)
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| {
            JsonRpcError::new(JsonRpcError::INVALID_PARAMS, format!("Invalid params: {e}"))
        })?;

    match params.name.as_str() {
        "youtrack_search_issues" => youtrack::handle_search_issues(params.arguments, global).await,
        "youtrack_get_issue" => youtrack::handle_get_issue(params.arguments, global).await,
        "youtrack_list_projects" => youtrack::handle_list_projects(params.arguments, global).await,
        "fields_edit" => fields::handle_fields_edit(params.arguments, global),
        _ => Err(JsonRpcError::new(
            JsonRpcError::INVALID_PARAMS,
            format!("Unknown tool: {}", params.name),
        )),
    }
}
