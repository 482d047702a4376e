#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde_json::{json, Value};

use enterprise_lambda::lambda::FunctionInvoker;
use enterprise_lambda::sam::{ApiExit, LocalTool};
use enterprise_lambda::util::Captured;
use enterprise_lambda::{Error, Result};

pub fn spawn_failure(message: &str) -> Error {
    Error::Spawn {
        program: "sam".into(),
        source: io::Error::new(io::ErrorKind::Other, message.to_owned()),
    }
}

/// What the fake saw when asked to invoke a function.
#[derive(Debug, Clone)]
pub struct SeenInvoke {
    pub function_name: String,
    pub event_path: PathBuf,
    pub event: Value,
}

/// Records calls and answers with canned results.
#[derive(Default)]
pub struct FakeTool {
    pub fail_build: bool,
    pub fail_invoke: Option<String>,
    pub api_exit: Option<ApiExit>,
    pub builds: RefCell<usize>,
    pub invocations: RefCell<Vec<SeenInvoke>>,
}

impl LocalTool for FakeTool {
    fn build(&self) -> Result<()> {
        *self.builds.borrow_mut() += 1;
        if self.fail_build {
            Err(spawn_failure("build exploded"))
        } else {
            Ok(())
        }
    }

    fn start_api(&self) -> Result<ApiExit> {
        self.api_exit
            .ok_or_else(|| spawn_failure("port 3000 already in use"))
    }

    fn invoke(&self, function_name: &str, event_path: &Path) -> Result<Captured> {
        let text = fs::read_to_string(event_path)?;
        self.invocations.borrow_mut().push(SeenInvoke {
            function_name: function_name.to_owned(),
            event_path: event_path.to_owned(),
            event: serde_json::from_str(&text)?,
        });
        match &self.fail_invoke {
            Some(message) => Err(spawn_failure(message)),
            None => Ok(Captured {
                stdout: r#"{"statusCode": 200}"#.to_owned(),
                stderr: "START RequestId: 1\nEND RequestId: 1\n".to_owned(),
            }),
        }
    }
}

pub enum Canned {
    Payload(Vec<u8>),
    Fail(String),
}

/// Answers invocations from a table and records the call order.
#[derive(Default)]
pub struct FakeInvoker {
    pub responses: HashMap<String, Canned>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeInvoker {
    pub fn respond(mut self, function_name: &str, status: i64, body: Value) -> Self {
        let payload = json!({
            "statusCode": status,
            "headers": {
                "Content-Type": "application/json",
                "Access-Control-Allow-Origin": "*"
            },
            "body": body.to_string(),
        });
        self.responses.insert(
            function_name.to_owned(),
            Canned::Payload(payload.to_string().into_bytes()),
        );
        self
    }

    pub fn raw(mut self, function_name: &str, payload: &str) -> Self {
        self.responses.insert(
            function_name.to_owned(),
            Canned::Payload(payload.as_bytes().to_vec()),
        );
        self
    }

    pub fn fail(mut self, function_name: &str, message: &str) -> Self {
        self.responses
            .insert(function_name.to_owned(), Canned::Fail(message.to_owned()));
        self
    }
}

impl FunctionInvoker for FakeInvoker {
    fn invoke(&self, function_name: &str) -> Result<Bytes> {
        self.calls.borrow_mut().push(function_name.to_owned());
        match self.responses.get(function_name) {
            Some(Canned::Payload(bytes)) => Ok(Bytes::from(bytes.clone())),
            Some(Canned::Fail(message)) => Err(Error::Invoke {
                function: function_name.to_owned(),
                message: message.clone(),
            }),
            None => Err(Error::Invoke {
                function: function_name.to_owned(),
                message: "Function not found".to_owned(),
            }),
        }
    }
}
