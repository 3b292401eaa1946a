// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use jiff::civil::{Date, DateTime, Time};

/// Server-assigned job identifier.
///
/// The API transports ids both as JSON numbers and as numeric strings; a
/// `JobId` is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(NonZeroU64);

impl JobId {
    /// Creates a `JobId`, rejecting zero.
    #[must_use]
    pub const fn new(id: u64) -> Option<Self> {
        match NonZeroU64::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u64 = s
            .trim()
            .parse()
            .map_err(|e| format!("Invalid job id {s:?}: {e}"))?;
        Self::new(id).ok_or_else(|| format!("Invalid job id {s:?}: must be positive"))
    }
}

/// Authentication parameters attached to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Reversibly encoded user id.
    pub user_id_coded: String,
    /// Display name of the user.
    pub user_name: String,
}

/// A job as returned by the list endpoint, after tolerant decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    /// Server id.
    pub id: JobId,
    /// Calendar day of the job.
    pub date: Date,
    /// Start time of day.
    pub time_from: Time,
    /// End time of day.
    pub time_to: Time,
    /// Work code (`kpld`), zero when absent.
    pub work_code: u32,
    /// Object classification code.
    pub obj_code: String,
    /// Task classification code (`kzajCode`).
    pub task_code: String,
    /// Free-text description.
    pub description: String,
    /// Free-text place of work.
    pub place_of_work: String,
}

/// A check-in/check-out pair from the attendance endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceInterval {
    /// Check-in instant, local wall clock.
    pub from: DateTime,
    /// Check-out instant, local wall clock.
    pub to: DateTime,
}

/// An entry of the work-code directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct WorkCodeItem {
    /// Work code (`kpld`), always positive.
    pub code: u32,
    /// Human-readable name (`npld`).
    pub name: String,
    /// Object classification code.
    pub obj_code: String,
    /// Task classification code.
    pub task_code: String,
}

impl WorkCodeItem {
    /// An item carrying only a code, used when the directory has no match.
    #[must_use]
    pub const fn placeholder(code: u32) -> Self {
        Self {
            code,
            name: String::new(),
            obj_code: String::new(),
            task_code: String::new(),
        }
    }
}

/// Body of a create or update request, sent as `{"Record": payload}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct JobPayload {
    /// Numeric id; omitted on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Start time, `HH:MM`.
    pub time_from: String,
    /// End time, `HH:MM`.
    pub time_to: String,
    /// Day, `YYYY-MM-DD`.
    pub date: String,
    /// Work code.
    pub kpld: u32,
    /// Free-text description.
    pub description: String,
    /// Object classification code.
    #[serde(rename = "objCode")]
    pub obj_code: String,
    /// Task classification code.
    #[serde(rename = "kzajCode")]
    pub task_code: String,
    /// Place of work.
    #[serde(rename = "placeWork")]
    pub place_of_work: String,
}

impl JobPayload {
    /// Returns a copy without the id, as required by the create endpoint.
    #[must_use]
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct RecordEnvelope<'a> {
    #[serde(rename = "Record")]
    pub record: &'a JobPayload,
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedJob {
    /// Server-assigned id.
    pub id: JobId,
    /// Object classification code derived by the server.
    pub obj_code: String,
    /// Task classification code derived by the server.
    pub task_code: String,
}

/// Result of a successful update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatedJob {
    /// Object classification code derived by the server, may be empty.
    pub obj_code: String,
    /// Task classification code derived by the server, may be empty.
    pub task_code: String,
}

/// Identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Internal user id.
    pub id: String,
    /// Display name.
    pub user_name: String,
}
