// src/api/rpc.rs
//! Minimal JSON-RPC 2.0 dispatch
//!
//! Handles single and batch requests. Requests without an `id` member are
//! notifications and get no response. The `jsonrpc` member is optional for
//! compatibility with legacy stats pollers, but when present must be `"2.0"`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// Error object carried in a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcError {
    /// Standard or application error code
    pub code: i64,
    /// Short description
    pub message: String,
}

impl RpcError {
    /// Body was not valid JSON
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    /// JSON was not a valid request object
    pub fn invalid_request() -> Self {
        Self::new(-32600, "Invalid Request")
    }

    /// No handler registered for the method
    pub fn method_not_found(method: &str) -> Self {
        Self::new(-32601, format!("Method not found: {}", method))
    }

    /// The handler failed
    pub fn internal(detail: impl fmt::Display) -> Self {
        Self::new(-32603, format!("Internal error: {}", detail))
    }

    fn new(code: i64, message: impl Into<String>) -> Self {
        RpcError {
            code,
            message: message.into(),
        }
    }
}

/// A single response object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: Value,
}

impl RpcResponse {
    fn success(id: Value, result: Value) -> Self {
        RpcResponse {
            jsonrpc: JSONRPC_VERSION,
            result: Some(result),
            error: None,
            id,
        }
    }

    fn failure(id: Value, error: RpcError) -> Self {
        RpcResponse {
            jsonrpc: JSONRPC_VERSION,
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// Method handler: receives the raw `params` member, if any
pub type Handler = Arc<dyn Fn(Option<&Value>) -> Result<Value, RpcError> + Send + Sync>;

/// Method table
#[derive(Clone, Default)]
pub struct RpcRegistry {
    methods: HashMap<String, Handler>,
}

impl RpcRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `method`, replacing any previous one
    pub fn register<F>(&mut self, method: &str, handler: F)
    where
        F: Fn(Option<&Value>) -> Result<Value, RpcError> + Send + Sync + 'static,
    {
        self.methods.insert(method.to_string(), Arc::new(handler));
    }

    /// Whether `method` has a handler
    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Dispatches a raw request body
    ///
    /// Returns the JSON to send back, or `None` when the body held only
    /// notifications.
    pub fn handle_body(&self, body: &[u8]) -> Option<Value> {
        let request: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) => {
                return Some(to_value(RpcResponse::failure(
                    Value::Null,
                    RpcError::parse_error(),
                )));
            }
        };

        match request {
            Value::Array(batch) if batch.is_empty() => Some(to_value(RpcResponse::failure(
                Value::Null,
                RpcError::invalid_request(),
            ))),
            Value::Array(batch) => {
                let replies: Vec<Value> = batch
                    .into_iter()
                    .filter_map(|request| self.handle_request(request))
                    .map(to_value)
                    .collect();
                (!replies.is_empty()).then_some(Value::Array(replies))
            }
            request => self.handle_request(request).map(to_value),
        }
    }

    fn handle_request(&self, request: Value) -> Option<RpcResponse> {
        let Value::Object(object) = request else {
            return Some(RpcResponse::failure(Value::Null, RpcError::invalid_request()));
        };

        let id = object.get("id").cloned();
        if let Some(id) = &id {
            if !matches!(id, Value::Null | Value::Number(_) | Value::String(_)) {
                return Some(RpcResponse::failure(Value::Null, RpcError::invalid_request()));
            }
        }

        let outcome = self.call(&object);
        let id = id?;
        Some(match outcome {
            Ok(result) => RpcResponse::success(id, result),
            Err(error) => RpcResponse::failure(id, error),
        })
    }

    fn call(&self, object: &Map<String, Value>) -> Result<Value, RpcError> {
        if let Some(version) = object.get("jsonrpc") {
            if version.as_str() != Some(JSONRPC_VERSION) {
                return Err(RpcError::invalid_request());
            }
        }

        let method = object
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(RpcError::invalid_request)?;

        let handler = self
            .methods
            .get(method)
            .ok_or_else(|| RpcError::method_not_found(method))?;

        handler(object.get("params"))
    }
}

fn to_value(response: RpcResponse) -> Value {
    // RpcResponse holds only JSON values and strings; serialization cannot fail.
    serde_json::to_value(response).unwrap_or(Value::Null)
}
