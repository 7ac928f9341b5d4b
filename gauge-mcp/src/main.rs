//! Gauge MCP Server
//!
//! JSON-RPC 2.0 over stdio, one message per line.
//!
//! Tools:
//! - convert: Convert a value between two units of a category
//! - list_categories: List measurement categories
//! - list_units: List the units of a category
//! - describe: Describe one unit
//! - help: Get documentation for functions
//! - list_functions: List available functions
//!
//! Resources:
//! - gauge://categories/{name} - Unit table of one category

use gauge::{measurement_table, Gauge, GaugeConfig};
use gauge_core::Value;
use gauge_plugin::FunctionMeta;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "gauge";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const RESOURCE_PREFIX: &str = "gauge://categories/";

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError {
            code: INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }
}

impl McpResponse {
    fn new(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        match result {
            Ok(r) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(r),
                error: None,
            },
            Err(e) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(e),
            },
        }
    }
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the protocol, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> ExitCode {
    let config = GaugeConfig::from_env();
    init_logging(config.as_ref().map_or("info", |c| c.log_filter()));

    let gauge = match config.and_then(|c| Gauge::from_config(&c)) {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "failed to start");
            return ExitCode::FAILURE;
        }
    };

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Gauge MCP server started");
    info!(categories = gauge.measurements().len(), "measurement registry ready");

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "received message");

                let Some(response) = handle_line(&gauge, line) else {
                    continue;
                };
                if let Err(e) = write_response(&response) {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("server shutting down");
    ExitCode::SUCCESS
}

/// Handle one line of input. Notifications produce no response.
fn handle_line(gauge: &Gauge, line: &str) -> Option<McpResponse> {
    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "error parsing request");
            return Some(McpResponse::new(
                None,
                Err(McpError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                }),
            ));
        }
    };

    debug!(method = %request.method, "processing");
    let response = handle_request(gauge, &request);

    if request.id.is_none() {
        debug!(method = %request.method, "notification processed (no response)");
        return None;
    }
    Some(response)
}

fn write_response(response: &McpResponse) -> io::Result<()> {
    let response_json = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", response_json)?;
    stdout.flush()
}

fn handle_request(gauge: &Gauge, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(gauge),
        "tools/call" => handle_tool_call(gauge, &request.params),

        // Resources
        "resources/list" => handle_resources_list(gauge),
        "resources/read" => handle_resources_read(gauge, &request.params),

        _ => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    McpResponse::new(request.id.clone(), result)
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion across length, weight, temperature, currency and more"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            },
            "resources": {
                "subscribe": false,
                "listChanged": false
            }
        },
        "instructions": "Gauge converts values between units of the same measurement category. Call 'list_categories' and 'list_units' to discover names, then 'convert'. Unit names accept common short forms such as 'km', 'F' or 'USD'."
    }))
}

/// Input schema of a plugin function, built from its argument metadata
fn input_schema(meta: &FunctionMeta) -> JsonValue {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for arg in meta.args {
        let mut prop = json!({
            "type": arg.json_type(),
            "description": arg.description,
        });
        if let Some(default) = arg.default {
            prop["description"] = json!(format!("{} (default: {})", arg.description, default));
        }
        properties.insert(arg.name.to_string(), prop);
        if !arg.optional {
            required.push(arg.name);
        }
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn handle_tools_list(gauge: &Gauge) -> Result<JsonValue, McpError> {
    let mut tools: Vec<JsonValue> = gauge
        .functions()
        .metas()
        .iter()
        .map(|meta| {
            json!({
                "name": meta.name,
                "description": format!("{}. Usage: {}", meta.description, meta.usage),
                "inputSchema": input_schema(meta),
            })
        })
        .collect();

    tools.push(json!({
        "name": "help",
        "description": "Get documentation for a function, or list all functions when no name is given.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Function name"
                }
            }
        }
    }));
    tools.push(json!({
        "name": "list_functions",
        "description": "List available functions, optionally filtered by category.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Function category (e.g., 'units')"
                }
            }
        }
    }));

    Ok(json!({ "tools": tools }))
}

fn handle_tool_call(gauge: &Gauge, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));
    if !args.is_object() {
        return Err(McpError::invalid_params("Tool arguments must be an object"));
    }

    match name {
        "help" => tool_help(gauge, &args),
        "list_functions" => tool_list_functions(gauge, &args),
        _ => tool_function(gauge, name, &args),
    }
}

/// Call a plugin function, mapping named arguments onto its positional ones
fn tool_function(gauge: &Gauge, name: &str, args: &JsonValue) -> Result<JsonValue, McpError> {
    let meta = gauge
        .functions()
        .get_function(name)
        .map(|f| f.meta())
        .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {}", name)))?;

    let mut values: Vec<Value> = meta
        .args
        .iter()
        .map(|arg| args.get(arg.name).map(json_to_value).unwrap_or(Value::Null))
        .collect();
    // Missing trailing optionals are left off so the arity check applies
    while values.len() > meta.required_args() && values.last().is_some_and(Value::is_null) {
        values.pop();
    }

    let result = gauge.call(name, &values);
    Ok(tool_result(&result))
}

fn tool_help(gauge: &Gauge, args: &JsonValue) -> Result<JsonValue, McpError> {
    let name = args.get("name").and_then(|v| v.as_str());
    let help = gauge.help(name);
    Ok(json!({
        "content": [{ "type": "text", "text": format_help(&help) }],
        "structuredContent": value_to_json(&help),
        "isError": help.is_error()
    }))
}

fn tool_list_functions(gauge: &Gauge, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = args.get("category").and_then(|v| v.as_str());
    let functions = gauge.list_functions(category);
    Ok(tool_result(&functions))
}

fn tool_result(value: &Value) -> JsonValue {
    let json = value_to_json(value);
    let text = match value {
        Value::Error(e) => match &e.suggestion {
            Some(s) => format!("Error [{}]: {} {}", e.code, e.message, s),
            None => format!("Error [{}]: {}", e.code, e.message),
        },
        Value::Number(n) => n.to_string(),
        _ => json.to_string(),
    };
    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": { "result": json },
        "isError": value.is_error()
    })
}

fn format_help(help: &Value) -> String {
    match help {
        Value::Object(map) => {
            let mut out = String::new();
            if let Some(Value::Text(n)) = map.get("name") { out.push_str(&format!("# {}\n\n", n)); }
            if let Some(Value::Text(d)) = map.get("description") { out.push_str(&format!("{}\n\n", d)); }
            if let Some(Value::Text(u)) = map.get("usage") { out.push_str(&format!("**Usage:** `{}`\n\n", u)); }
            if let Some(Value::List(examples)) = map.get("examples") {
                for example in examples {
                    out.push_str(&format!("- `{}`\n", example));
                }
            }
            if let Some(Value::List(functions)) = map.get("functions") {
                let names: Vec<String> = functions.iter().map(|f| f.to_string()).collect();
                out.push_str(&format!("Functions: {}\n", names.join(", ")));
            }
            out
        }
        Value::Error(e) => format!("Error: {}", e.message),
        other => other.to_string(),
    }
}

fn handle_resources_list(gauge: &Gauge) -> Result<JsonValue, McpError> {
    let resources: Vec<JsonValue> = gauge.measurements().measurements().map(|m| {
        json!({
            "uri": format!("{}{}", RESOURCE_PREFIX, urlencoding::encode(m.name())),
            "name": m.name(),
            "description": format!("{} units ({} decimal places)", m.name(), m.decimal_places()),
            "mimeType": "application/json"
        })
    }).collect();

    Ok(json!({ "resources": resources }))
}

fn handle_resources_read(gauge: &Gauge, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let uri = params.as_ref()
        .and_then(|p| p.get("uri"))
        .and_then(|u| u.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing uri parameter"))?;

    let encoded = uri.strip_prefix(RESOURCE_PREFIX)
        .ok_or_else(|| McpError::invalid_params(format!(
            "Invalid URI: {}. Expected {}{{name}}", uri, RESOURCE_PREFIX
        )))?;
    let name = urlencoding::decode(encoded)
        .map_err(|e| McpError::invalid_params(format!("Invalid URI: {}: {}", uri, e)))?;

    let measurement = gauge.measurements().get_measurement(&name).map_err(|e| McpError {
        code: INVALID_PARAMS,
        message: e.to_string(),
        data: Some(json!({ "code": e.code() })),
    })?;

    let table = value_to_json(&measurement_table(measurement));
    let text = serde_json::to_string_pretty(&table).map_err(|e| McpError {
        code: INTERNAL_ERROR,
        message: e.to_string(),
        data: None,
    })?;

    Ok(json!({
        "contents": [{
            "uri": uri,
            "mimeType": "application/json",
            "text": text
        }]
    }))
}

fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or_else(|| Value::Text(n.to_string())),
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(arr) => Value::List(arr.iter().map(json_to_value).collect()),
        JsonValue::Object(obj) => Value::Object(obj.iter().map(|(k, v)| (k.clone(), json_to_value(v))).collect()),
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => json!(n),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::List(l) => JsonValue::Array(l.iter().map(value_to_json).collect()),
        Value::Object(o) => JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect()),
        Value::Error(e) => json!({
            "_error": {
                "code": e.code,
                "message": e.message,
                "suggestion": e.suggestion,
            }
        }),
    }
}
