use std::str::FromStr;

use bytes::Bytes;
use rusoto_core::credential::StaticProvider;
use rusoto_core::{DefaultCredentialsProvider, HttpClient, Region};
use rusoto_lambda::{InvocationRequest, Lambda, LambdaClient};

use crate::error::{Error, Result};

/// Synchronous `RequestResponse` invocation of a deployed function.
pub trait FunctionInvoker {
    /// Returns the raw response payload.
    fn invoke(&self, function_name: &str) -> Result<Bytes>;
}

/// Explicit credentials; the default provider chain is used when absent.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

pub fn create_client(credentials: &Credentials, region: Option<&str>) -> Result<LambdaClient> {
    let dispatcher = HttpClient::new().map_err(|e| Error::Client(e.to_string()))?;
    let region = match region {
        Some(name) => Region::from_str(name).map_err(|e| Error::Client(e.to_string()))?,
        None => Region::default(),
    };
    log::debug!("using region {:?}", region);

    match (&credentials.access_key, &credentials.secret_key) {
        (Some(access_key), Some(secret_key)) => {
            let creds = StaticProvider::new_minimal(access_key.to_owned(), secret_key.to_owned());
            Ok(LambdaClient::new_with(dispatcher, creds, region))
        }
        _ => {
            let creds =
                DefaultCredentialsProvider::new().map_err(|e| Error::Client(e.to_string()))?;
            Ok(LambdaClient::new_with(dispatcher, creds, region))
        }
    }
}

pub struct LambdaInvoker {
    client: LambdaClient,
}

impl LambdaInvoker {
    pub fn new(client: LambdaClient) -> Self {
        LambdaInvoker { client }
    }
}

impl FunctionInvoker for LambdaInvoker {
    fn invoke(&self, function_name: &str) -> Result<Bytes> {
        let req = InvocationRequest {
            function_name: function_name.to_owned(),
            invocation_type: Some("RequestResponse".to_owned()),
            ..Default::default()
        };
        let res = self
            .client
            .invoke(req)
            .sync()
            .map_err(|e| Error::Invoke {
                function: function_name.to_owned(),
                message: e.to_string(),
            })?;
        if let Some(kind) = &res.function_error {
            log::debug!("{} reported a function error: {}", function_name, kind);
        }
        res.payload.ok_or_else(|| Error::EmptyPayload {
            function: function_name.to_owned(),
        })
    }
}
