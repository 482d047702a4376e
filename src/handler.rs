//! The `workday-api` Lambda function.
//!
//! A placeholder for the Workday integration: every invocation answers with
//! the same success document and empty collections.

use chrono::Local;
use lambda_runtime::error::HandlerError;
use lambda_runtime::Context;
use serde::Serialize;
use serde_json::Value;

use crate::envelope::{ResponseEnvelope, STATUS_OK};
use crate::event::InvocationEvent;

pub const SUCCESS_MESSAGE: &str = "Workday API integration successful";
pub const FAILURE_MESSAGE: &str = "Workday API integration failed";

#[derive(Serialize, Debug)]
pub struct WorkdayResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub message: &'static str,
    pub data: WorkdayData,
}

#[derive(Serialize, Debug)]
pub struct WorkdayData {
    pub employees: Vec<Value>,
    pub departments: Vec<Value>,
    pub last_sync: String,
}

impl WorkdayResponse {
    pub fn now() -> Self {
        let now = Local::now();
        WorkdayResponse {
            status: "success",
            timestamp: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            message: SUCCESS_MESSAGE,
            data: WorkdayData {
                employees: Vec::new(),
                departments: Vec::new(),
                last_sync: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            },
        }
    }
}

/// Wraps `payload` in a 200, or a 500 if it can't be serialized.
pub fn respond<T: Serialize + ?Sized>(payload: &T) -> ResponseEnvelope {
    match ResponseEnvelope::json(STATUS_OK, payload) {
        Ok(envelope) => envelope,
        Err(e) => {
            log::error!("failed to build response: {}", e);
            ResponseEnvelope::failure(&e, FAILURE_MESSAGE)
        }
    }
}

pub fn handle(_event: &InvocationEvent) -> ResponseEnvelope {
    respond(&WorkdayResponse::now())
}

/// Entry point registered with the Lambda runtime.
pub fn handler(event: InvocationEvent, ctx: Context) -> Result<ResponseEnvelope, HandlerError> {
    log::info!(
        "{} {} (request {})",
        event.http_method().unwrap_or("-"),
        event.path().unwrap_or("-"),
        ctx.aws_request_id
    );
    Ok(handle(&event))
}
