//! A placeholder Workday integration Lambda together with the tooling used
//! to build it, run it locally under the SAM CLI and smoke test a deployment.

pub mod config;
pub mod envelope;
pub mod error;
pub mod event;
pub mod handler;
pub mod harness;
pub mod lambda;
pub mod sam;
pub mod util;
pub mod validator;

pub use crate::error::{Error, Result};
