// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! ERP client for job, attendance and work-code operations.

use std::sync::Arc;
use std::time::Duration;

use jiff::civil::Date;
use reqwest::Method;
use serde_json::Value;

use crate::config::ErpConfig;
use crate::decode::{self, LoginFailure, MutationResult};
use crate::error::ErpError;
use crate::http::HttpClient;
use crate::types::{
    AttendanceInterval, CreatedJob, Credentials, Identity, JobId, JobPayload, JobRecord,
    RecordEnvelope, UpdatedJob, WorkCodeItem,
};

/// Client for the ERP work-record API.
///
/// Cloning is cheap: clones share the underlying connection pool and
/// credentials.
///
/// # Example
///
/// ```ignore
/// use workcal_erp::{ErpClient, ErpConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ErpConfig {
///     base_url: "https://erp.example.com".to_string(),
///     ..Default::default()
/// };
///
/// let client = ErpClient::new(config)?;
/// let date = jiff::civil::date(2025, 1, 10);
/// let jobs = client.list_jobs(date, date).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ErpClient {
    http: Arc<HttpClient>,
}

impl ErpClient {
    /// Creates a new ERP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or HTTP client initialization fails.
    pub fn new(config: ErpConfig) -> Result<Self, ErpError> {
        if config.base_url.trim().is_empty() {
            return Err(ErpError::Config("base_url is required".to_string()));
        }
        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ErpConfig {
        self.http.config()
    }

    /// Sets the credentials attached to every subsequent request.
    pub fn set_credentials(&self, credentials: Credentials) {
        self.http.set_credentials(Some(credentials));
    }

    /// Drops the credentials; subsequent requests are anonymous.
    pub fn clear_credentials(&self) {
        self.http.set_credentials(None);
    }

    /// Returns the current credentials, if any.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        self.http.credentials()
    }

    /// Lists the jobs of an inclusive date range.
    ///
    /// Records with a missing id, a date not in `YYYY-MM-DD` form or times
    /// not in `HH:MM` form are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out or the body is not a
    /// JSON array.
    pub async fn list_jobs(&self, from: Date, to: Date) -> Result<Vec<JobRecord>, ErpError> {
        let path = &self.config().endpoints.list_jobs;
        let items = self.get_range("LIST", path, from, to).await?;
        let jobs: Vec<_> = items.iter().filter_map(decode::job_record).collect();
        tracing::debug!(%from, %to, received = items.len(), kept = jobs.len(), "jobs listed");
        Ok(jobs)
    }

    /// Lists the attendance intervals of an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out or the body is not a
    /// JSON array.
    pub async fn list_attendance(
        &self,
        from: Date,
        to: Date,
    ) -> Result<Vec<AttendanceInterval>, ErpError> {
        let path = &self.config().endpoints.list_attendance;
        let items = self.get_range("ATTENDANCE", path, from, to).await?;
        let intervals: Vec<_> = items
            .iter()
            .filter_map(decode::attendance_interval)
            .collect();
        tracing::debug!(%from, %to, received = items.len(), kept = intervals.len(), "attendance listed");
        Ok(intervals)
    }

    /// Searches the work-code directory by free text and/or exact code.
    ///
    /// An empty query with no code lists the whole directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON array.
    pub async fn search_work_codes(
        &self,
        query: &str,
        code: Option<u32>,
    ) -> Result<Vec<WorkCodeItem>, ErpError> {
        let kpld = code.unwrap_or(0).to_string();
        let req = self
            .http
            .build_request(Method::GET, &self.config().endpoints.work_codes)
            .query(&[("q", query), ("kpld", kpld.as_str())]);

        let json = self.http.execute_json("PLD", req, None).await?;
        let items = expect_array("PLD", json)?;
        Ok(items.iter().filter_map(decode::work_code_item).collect())
    }

    /// Creates a job. The payload id, if any, is not sent.
    ///
    /// # Errors
    ///
    /// Returns [`ErpError::ApplicationFailure`] if the server reports failure
    /// or returns no id.
    pub async fn create_job(&self, payload: &JobPayload) -> Result<CreatedJob, ErpError> {
        let payload = payload.without_id();
        let res = self
            .post_record("ADD", &self.config().endpoints.create_job, &payload)
            .await?;
        check_success("ADD", &res)?;

        let id = JobId::new(res.id).ok_or_else(|| {
            ErpError::ApplicationFailure("API ADD: server returned no job id".to_string())
        })?;
        tracing::info!(%id, "job created");
        Ok(CreatedJob {
            id,
            obj_code: res.obj_code,
            task_code: res.task_code,
        })
    }

    /// Updates a job identified by the payload id.
    ///
    /// # Errors
    ///
    /// Returns [`ErpError::ApplicationFailure`] if the server reports failure.
    pub async fn update_job(&self, payload: &JobPayload) -> Result<UpdatedJob, ErpError> {
        let res = self
            .post_record("UPDATE", &self.config().endpoints.update_job, payload)
            .await?;
        check_success("UPDATE", &res)?;
        tracing::info!(id = ?payload.id, "job updated");
        Ok(UpdatedJob {
            obj_code: res.obj_code,
            task_code: res.task_code,
        })
    }

    /// Deletes a job.
    ///
    /// # Errors
    ///
    /// Returns [`ErpError::ApplicationFailure`] if the server reports failure.
    pub async fn delete_job(&self, id: JobId) -> Result<(), ErpError> {
        let id_text = id.to_string();
        let req = self
            .http
            .build_request(Method::POST, &self.config().endpoints.delete_job)
            .query(&[("Id", id_text.as_str())]);

        let json = self.http.execute_json("DELETE", req, None).await?;
        check_success("DELETE", &MutationResult::decode(&json))?;
        tracing::info!(%id, "job deleted");
        Ok(())
    }

    /// Authenticates with login and password.
    ///
    /// The returned identity is not stored; call [`Self::set_credentials`]
    /// with its encoded form.
    ///
    /// # Errors
    ///
    /// Returns [`ErpError::ApplicationFailure`] with the server's failure
    /// reason when the login is rejected.
    pub async fn login(&self, login: &str, password: &str) -> Result<Identity, ErpError> {
        if login.is_empty() || password.is_empty() {
            return Err(ErpError::ApplicationFailure(
                "Login and password are required".to_string(),
            ));
        }

        let body = serde_json::json!({ "login": login, "password": password });
        let req = self
            .http
            .build_request(Method::POST, &self.config().endpoints.login)
            .json(&body);
        let timeout = Duration::from_secs(self.config().login_timeout_secs);

        let json = self.http.execute_json("LOGIN", req, Some(timeout)).await?;
        match decode::identity(&json) {
            Ok(identity) => {
                tracing::info!(user = %identity.user_name, "logged in");
                Ok(identity)
            }
            Err(LoginFailure::Rejected(reason)) if reason.is_empty() => Err(
                ErpError::ApplicationFailure("Invalid login or password".to_string()),
            ),
            Err(LoginFailure::Rejected(reason)) => Err(ErpError::ApplicationFailure(reason)),
            Err(LoginFailure::Malformed) => Err(ErpError::MalformedResponse(
                "LOGIN: response carries no user id or name".to_string(),
            )),
        }
    }

    async fn get_range(
        &self,
        op: &str,
        path: &str,
        from: Date,
        to: Date,
    ) -> Result<Vec<Value>, ErpError> {
        let (from, to) = (from.to_string(), to.to_string());
        let req = self
            .http
            .build_request(Method::GET, path)
            .query(&[("dateFrom", from.as_str()), ("dateTo", to.as_str())]);
        let timeout = Duration::from_secs(self.config().load_timeout_secs);

        let json = self.http.execute_json(op, req, Some(timeout)).await?;
        expect_array(op, json)
    }

    async fn post_record(
        &self,
        op: &str,
        path: &str,
        payload: &JobPayload,
    ) -> Result<MutationResult, ErpError> {
        let req = self
            .http
            .build_request(Method::POST, path)
            .json(&RecordEnvelope { record: payload });
        let json = self.http.execute_json(op, req, None).await?;
        Ok(MutationResult::decode(&json))
    }
}

fn expect_array(op: &str, json: Value) -> Result<Vec<Value>, ErpError> {
    match json {
        Value::Array(items) => Ok(items),
        other => Err(ErpError::MalformedResponse(format!(
            "{op}: expected an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn check_success(op: &str, res: &MutationResult) -> Result<(), ErpError> {
    if res.success {
        return Ok(());
    }
    let message = if res.message.is_empty() {
        format!("API {op}: operation failed")
    } else {
        res.message.clone()
    };
    tracing::warn!(op, %message, "server reported failure");
    Err(ErpError::ApplicationFailure(message))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
