use std::collections::HashMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::json;

pub const STATUS_OK: u16 = 200;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// API Gateway proxy response. `body` always holds JSON text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

fn default_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_owned(), "application/json".to_owned());
    headers.insert("Access-Control-Allow-Origin".to_owned(), "*".to_owned());
    headers
}

impl ResponseEnvelope {
    /// Serializes `payload` as the body of a response with `status_code`.
    pub fn json<T: Serialize + ?Sized>(
        status_code: u16,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(ResponseEnvelope {
            status_code,
            headers: default_headers(),
            body: serde_json::to_string(payload)?,
        })
    }

    /// A 500 carrying `error`'s message.
    pub fn failure<E: Display + ?Sized>(error: &E, message: &str) -> Self {
        ResponseEnvelope {
            status_code: STATUS_INTERNAL_ERROR,
            headers: default_headers(),
            body: json!({
                "error": error.to_string(),
                "message": message,
            })
            .to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}
