// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with credential query parameters and JSON body handling.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;

use crate::config::ErpConfig;
use crate::decode::mutation;
use crate::error::ErpError;
use crate::types::Credentials;

/// HTTP client for ERP operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: ErpConfig,
    credentials: RwLock<Option<Credentials>>,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: ErpConfig) -> Result<Self, ErpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            config,
            credentials: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ErpConfig {
        &self.config
    }

    pub fn set_credentials(&self, credentials: Option<Credentials>) {
        *self
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner) = credentials;
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds a request carrying the `UserIdCoded`/`UserName` query parameters.
    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.full_url(path);
        let mut req = self.client.request(method, url);

        if let Some(creds) = self.credentials() {
            if !creds.user_id_coded.is_empty() {
                req = req.query(&[("UserIdCoded", creds.user_id_coded.as_str())]);
            }
            if !creds.user_name.is_empty() {
                req = req.query(&[("UserName", creds.user_name.as_str())]);
            }
        }

        req
    }

    /// Sends a request and reads its body as JSON, whatever the content type.
    ///
    /// # Errors
    ///
    /// Returns [`ErpError::Http`] for a non-success status, with the server's
    /// `MessageError` when the body carries one, and
    /// [`ErpError::MalformedResponse`] when a success body is not JSON.
    pub async fn execute_json(
        &self,
        op: &str,
        req: RequestBuilder,
        timeout: Option<Duration>,
    ) -> Result<Value, ErpError> {
        let req = match timeout {
            Some(t) => req.timeout(t),
            None => req,
        };

        let resp = req.send().await.map_err(|e| {
            tracing::debug!(op, err = %e, "request failed");
            ErpError::from(e)
        })?;
        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(op, %status, len = text.len(), "response received");

        let json = serde_json::from_str::<Value>(&text);
        if !status.is_success() {
            let message = json
                .ok()
                .as_ref()
                .and_then(Value::as_object)
                .and_then(|obj| mutation::MESSAGE.lookup(obj))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map_or_else(|| format!("API {op} HTTP {}", status.as_u16()), String::from);
            return Err(ErpError::Http {
                status: status.as_u16(),
                message,
            });
        }

        json.map_err(|e| ErpError::MalformedResponse(format!("{op}: {e}")))
    }

    fn full_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
