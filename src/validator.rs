//! Post-deploy smoke checks: invoke each function and look for an expected
//! substring in its response body.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::config::CheckConfig;
use crate::envelope::STATUS_OK;
use crate::error::Result;
use crate::lambda::FunctionInvoker;

pub const DEFAULT_FUNCTION: &str = "MyEnterpriseLambda";
pub const DEFAULT_EXPECTED: &str = "Hello from Lambda part 1";

#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub function_name: String,
    pub expected: String,
}

impl Check {
    pub fn new<N: Into<String>, E: Into<String>>(function_name: N, expected: E) -> Self {
        Check {
            function_name: function_name.into(),
            expected: expected.into(),
        }
    }
}

impl Default for Check {
    fn default() -> Self {
        Check::new(DEFAULT_FUNCTION, DEFAULT_EXPECTED)
    }
}

impl From<CheckConfig> for Check {
    fn from(config: CheckConfig) -> Self {
        Check::new(config.function, config.expect)
    }
}

/// Parses `FUNCTION=EXPECTED`. Only the first `=` splits.
impl FromStr for Check {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(name), Some(expected)) if !name.is_empty() => Ok(Check::new(name, expected)),
            _ => Err(format!("expected FUNCTION=SUBSTRING, got `{}`", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub function_name: String,
    pub passed: bool,
    pub detail: String,
    /// Raw payload, when the function answered at all.
    pub response: Option<String>,
}

/// The parts of a proxy response envelope the checks look at.
#[derive(Deserialize, Debug)]
struct Envelope {
    #[serde(rename = "statusCode")]
    status_code: Option<i64>,
    #[serde(default)]
    body: Option<Value>,
}

/// Decides pass/fail for one payload. Errors are parse failures.
fn evaluate(payload: &[u8], expected: &str) -> Result<(bool, String)> {
    let envelope: Envelope = serde_json::from_slice(payload)?;
    match envelope.status_code {
        Some(code) if code == i64::from(STATUS_OK) => {}
        Some(code) => return Ok((false, format!("statusCode {}", code))),
        None => return Ok((false, "no statusCode in response".to_owned())),
    }

    // Proxy bodies are JSON text; tolerate functions that return the
    // document itself.
    let decoded = match envelope.body {
        Some(Value::String(text)) => serde_json::from_str::<Value>(&text)?,
        Some(other) => other,
        None => Value::Null,
    };
    if decoded.to_string().contains(expected) {
        Ok((true, "expected content found".to_owned()))
    } else {
        Ok((false, format!("`{}` not found in body", expected)))
    }
}

pub fn check_one<I: FunctionInvoker + ?Sized>(invoker: &I, check: &Check) -> ValidationResult {
    let mut response = None;
    let outcome = invoker.invoke(&check.function_name).and_then(|payload| {
        let text = String::from_utf8_lossy(&payload).into_owned();
        log::info!("{} response: {}", check.function_name, text);
        response = Some(text);
        evaluate(&payload, &check.expected)
    });
    let (passed, detail) = match outcome {
        Ok(verdict) => verdict,
        Err(e) => (false, format!("error: {}", e)),
    };
    ValidationResult {
        function_name: check.function_name.clone(),
        passed,
        detail,
        response,
    }
}

/// Runs every check in order. A failing check never stops the rest.
pub fn validate<I: FunctionInvoker + ?Sized>(invoker: &I, checks: &[Check]) -> Report {
    Report {
        results: checks.iter().map(|c| check_one(invoker, c)).collect(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub results: Vec<ValidationResult>,
}

impl Report {
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.results {
            let verdict = if r.passed { "PASS" } else { "FAIL" };
            writeln!(f, "{}: {} ({})", r.function_name, verdict, r.detail)?;
            if let Some(response) = &r.response {
                writeln!(f, "  Lambda Response: {}", response)?;
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            "{}/{} functions passed",
            self.passed_count(),
            self.results.len()
        )?;
        if self.all_passed() {
            writeln!(f, "All functions passed")
        } else {
            writeln!(f, "Not all functions passed")
        }
    }
}
