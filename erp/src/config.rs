// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Endpoint paths of the ERP API, relative to [`ErpConfig::base_url`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Job list (`GET`, `dateFrom`/`dateTo`).
    pub list_jobs: String,
    /// Attendance intervals (`GET`, `dateFrom`/`dateTo`).
    pub list_attendance: String,
    /// Work-code directory search (`GET`, `q`/`kpld`).
    pub work_codes: String,
    /// Job creation (`POST`, `{Record: ...}`).
    pub create_job: String,
    /// Job update (`POST`, `{Record: ...}`).
    pub update_job: String,
    /// Job deletion (`POST`, `Id`).
    pub delete_job: String,
    /// Credential login (`POST`, `{login, password}`).
    pub login: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            list_jobs: "/ws/api/_PLUTEST_GET".to_string(),
            list_attendance: "/ws/api/_PLUTEST_GETSKD".to_string(),
            work_codes: "/ws/api/_PLUTEST_GETPLD".to_string(),
            create_job: "/ws/api/_PLUTEST_ADD".to_string(),
            update_job: "/ws/api/_PLUTEST_UPD".to_string(),
            delete_job: "/ws/api/_PLUTEST_DEL".to_string(),
            login: "/ws/api/LOGIN".to_string(),
        }
    }
}

/// ERP server configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErpConfig {
    /// Base URL of the ERP web service, e.g. `https://erp.example.com`.
    pub base_url: String,
    /// Endpoint paths.
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Timeout for mutation and lookup requests, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Deadline for a single range-load request (jobs or attendance), in seconds.
    #[serde(default = "default_load_timeout")]
    pub load_timeout_secs: u64,
    /// Deadline for the login request, in seconds.
    #[serde(default = "default_login_timeout")]
    pub login_timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    30
}

const fn default_load_timeout() -> u64 {
    20
}

const fn default_login_timeout() -> u64 {
    12
}

fn default_user_agent() -> String {
    concat!("workcal-erp/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ErpConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            endpoints: Endpoints::default(),
            timeout_secs: default_timeout(),
            load_timeout_secs: default_load_timeout(),
            login_timeout_secs: default_login_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
