use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// An invocation event, carried as whatever JSON it was.
///
/// Nothing here is validated: API Gateway shaped or not, the event is
/// written back and handed to the function unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct InvocationEvent(pub Value);

impl Default for InvocationEvent {
    /// A bare `GET /api/enterprise` with a JSON content type and no body.
    fn default() -> Self {
        InvocationEvent(json!({
            "httpMethod": "GET",
            "path": "/api/enterprise",
            "headers": { "Content-Type": "application/json" },
            "queryStringParameters": {},
            "body": null
        }))
    }
}

impl InvocationEvent {
    pub fn http_method(&self) -> Option<&str> {
        self.0.get("httpMethod").and_then(Value::as_str)
    }

    pub fn path(&self) -> Option<&str> {
        self.0.get("path").and_then(Value::as_str)
    }

    /// Loads the event at `path`, or the default event when no path is
    /// given or the file can't be read or isn't JSON.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => path,
            None => return Self::default(),
        };
        let loaded = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()));
        match loaded {
            Ok(value) => InvocationEvent(value),
            Err(e) => {
                log::debug!(
                    "using default event, {} not usable: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}
