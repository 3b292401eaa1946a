// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Tolerant decoding of API records.
//!
//! The server is inconsistent about key casing, so every logical field is
//! described by a [`Field`]: the keys accepted for it, in lookup order. The
//! first key holding a non-null value wins.

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use serde_json::{Map, Value};

use crate::types::{AttendanceInterval, Identity, JobId, JobRecord, WorkCodeItem};

/// A logical field and the JSON keys accepted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Logical name, used in logs.
    pub name: &'static str,
    /// Accepted keys, in lookup order.
    pub keys: &'static [&'static str],
}

impl Field {
    const fn new(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self { name, keys }
    }

    /// Returns the first non-null value among the accepted keys.
    #[must_use]
    pub fn lookup<'a>(&self, obj: &'a Map<String, Value>) -> Option<&'a Value> {
        self.keys
            .iter()
            .filter_map(|key| obj.get(*key))
            .find(|v| !v.is_null())
    }

    fn text(&self, obj: &Map<String, Value>) -> String {
        self.lookup(obj).map(text).unwrap_or_default()
    }

    fn number(&self, obj: &Map<String, Value>) -> u64 {
        self.lookup(obj).map_or(0, number)
    }
}

/// Job record fields.
pub mod job {
    use super::Field;

    /// Server id.
    pub const ID: Field = Field::new("id", &["id", "Id"]);
    /// Start time of day.
    pub const TIME_FROM: Field = Field::new("time_from", &["time_from", "Time_From", "timeFrom"]);
    /// End time of day.
    pub const TIME_TO: Field = Field::new("time_to", &["time_to", "Time_To", "timeTo"]);
    /// Day.
    pub const DATE: Field = Field::new("date", &["date", "Date"]);
    /// Work code.
    pub const WORK_CODE: Field = Field::new("kpld", &["kpld", "KPLD", "Kpld"]);
    /// Object classification code.
    pub const OBJ_CODE: Field = Field::new("objCode", &["objCode"]);
    /// Task classification code.
    pub const TASK_CODE: Field = Field::new("kzajCode", &["kzajCode"]);
    /// Description.
    pub const DESCRIPTION: Field = Field::new("description", &["description", "Description"]);
    /// Place of work.
    pub const PLACE_OF_WORK: Field =
        Field::new("placeWork", &["placeWork", "PlaceWork", "place_work"]);
}

/// Attendance interval fields.
pub mod attendance {
    use super::Field;

    /// Check-in instant.
    pub const FROM: Field = Field::new("DateFrom", &["DateFrom", "dateFrom", "from"]);
    /// Check-out instant.
    pub const TO: Field = Field::new("DateTo", &["DateTo", "dateTo", "to"]);
}

/// Work-code directory fields.
pub mod work_code {
    use super::Field;

    /// Code.
    pub const CODE: Field = Field::new("kpld", &["kpld", "KPLD", "Kpld"]);
    /// Name.
    pub const NAME: Field = Field::new("npld", &["npld", "NPLD", "Npld", "name", "text"]);
    /// Object classification code.
    pub const OBJ_CODE: Field = Field::new(
        "pldObjCode",
        &["pldObjCode", "PldObjCode", "PLDOBJCODE", "objCode"],
    );
    /// Task classification code.
    pub const TASK_CODE: Field = Field::new(
        "pldKzaj",
        &["pldKzaj", "PldKzaj", "PLDKZAJ", "pldKZAJ", "kzajCode"],
    );
}

/// Mutation result fields (create, update, delete).
pub mod mutation {
    use super::Field;

    /// Success flag.
    pub const SUCCESS: Field = Field::new("Success", &["Success", "success"]);
    /// Created id.
    pub const ID: Field = Field::new("Id", &["Id", "id"]);
    /// Error message.
    pub const MESSAGE: Field = Field::new("MessageError", &["MessageError", "messageError", "error"]);
    /// Nested object carrying the classification codes.
    pub const NESTED: &str = "PluObj";
    /// Object classification code.
    pub const OBJ_CODE: Field = Field::new("objCode", &["objCode"]);
    /// Task classification code.
    pub const TASK_CODE: Field = Field::new("kzajCode", &["kzajCode"]);
}

/// Login result fields.
pub mod login {
    use super::Field;

    /// Success flag.
    pub const SUCCESS: Field = Field::new("Success", &["Success", "success"]);
    /// User id.
    pub const ID: Field = Field::new("Id", &["Id", "id"]);
    /// Display name.
    pub const USER_NAME: Field = Field::new("UserName", &["UserName", "userName"]);
    /// Failure reason.
    pub const FAIL_REASON: Field = Field::new("FailReason", &["FailReason", "FailCode"]);
}

/// Normalized mutation response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MutationResult {
    pub success: bool,
    pub id: u64,
    pub message: String,
    pub obj_code: String,
    pub task_code: String,
}

impl MutationResult {
    pub fn decode(json: &Value) -> Self {
        let Some(obj) = json.as_object() else {
            return Self {
                message: "Invalid server response".to_string(),
                ..Default::default()
            };
        };

        let nested = obj.get(mutation::NESTED).and_then(Value::as_object);
        let code = |field: &Field| {
            nested
                .and_then(|n| field.lookup(n))
                .or_else(|| field.lookup(obj))
                .map(text)
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        Self {
            success: mutation::SUCCESS.lookup(obj).is_some_and(truthy),
            id: mutation::ID.number(obj),
            message: mutation::MESSAGE.text(obj).trim().to_string(),
            obj_code: code(&mutation::OBJ_CODE),
            task_code: code(&mutation::TASK_CODE),
        }
    }
}

pub(crate) fn job_record(value: &Value) -> Option<JobRecord> {
    let obj = value.as_object()?;

    let id = JobId::new(job::ID.number(obj));
    let date = parse_date(&job::DATE.text(obj));
    let time_from = parse_time(&job::TIME_FROM.text(obj));
    let time_to = parse_time(&job::TIME_TO.text(obj));
    let (Some(id), Some(date), Some(time_from), Some(time_to)) = (id, date, time_from, time_to)
    else {
        tracing::warn!(record = %value, "dropping malformed job record");
        return None;
    };

    Some(JobRecord {
        id,
        date,
        time_from,
        time_to,
        work_code: u32::try_from(job::WORK_CODE.number(obj)).unwrap_or(0),
        obj_code: job::OBJ_CODE.text(obj),
        task_code: job::TASK_CODE.text(obj),
        description: job::DESCRIPTION.text(obj),
        place_of_work: job::PLACE_OF_WORK.text(obj).trim().to_string(),
    })
}

pub(crate) fn attendance_interval(value: &Value) -> Option<AttendanceInterval> {
    let obj = value.as_object()?;
    let from = attendance::FROM.lookup(obj).and_then(Value::as_str);
    let to = attendance::TO.lookup(obj).and_then(Value::as_str);
    match (from.and_then(parse_instant), to.and_then(parse_instant)) {
        (Some(from), Some(to)) => Some(AttendanceInterval { from, to }),
        _ => {
            tracing::warn!(record = %value, "dropping attendance interval with bad timestamps");
            None
        }
    }
}

pub(crate) fn work_code_item(value: &Value) -> Option<WorkCodeItem> {
    let obj = value.as_object()?;
    let code = u32::try_from(work_code::CODE.number(obj)).ok()?;
    if code == 0 {
        return None;
    }

    Some(WorkCodeItem {
        code,
        name: work_code::NAME.text(obj).trim().to_string(),
        obj_code: work_code::OBJ_CODE.text(obj).trim().to_string(),
        task_code: work_code::TASK_CODE.text(obj).trim().to_string(),
    })
}

/// Decodes a login response into an identity, or the server's failure reason.
pub(crate) fn identity(json: &Value) -> Result<Identity, LoginFailure> {
    let obj = json.as_object().ok_or(LoginFailure::Malformed)?;
    if !login::SUCCESS.lookup(obj).is_some_and(truthy) {
        let reason = login::FAIL_REASON.text(obj).trim().to_string();
        return Err(LoginFailure::Rejected(reason));
    }

    let id = login::ID.text(obj).trim().to_string();
    let user_name = login::USER_NAME.text(obj).trim().to_string();
    if id.is_empty() || user_name.is_empty() {
        return Err(LoginFailure::Malformed);
    }
    Ok(Identity { id, user_name })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoginFailure {
    Rejected(String),
    Malformed,
}

/// Parses an attendance timestamp into a local wall-clock date-time.
///
/// Accepts RFC 3339 instants (converted to the system time zone), civil
/// `YYYY-MM-DD[T ]HH:MM[:SS]`, and the day-first `DD.MM.YYYY HH:MM[:SS]` and
/// `DD/MM/YYYY HH:MM[:SS]` forms. Day-first is a guess for the slash form;
/// `03/04/2025` is read as the 3rd of April.
#[must_use]
pub fn parse_instant(s: &str) -> Option<DateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ts) = s.parse::<jiff::Timestamp>() {
        return Some(ts.to_zoned(TimeZone::system()).datetime());
    }
    if let Ok(dt) = s.parse::<DateTime>() {
        return Some(dt);
    }
    parse_day_first(s)
}

fn parse_day_first(s: &str) -> Option<DateTime> {
    let (date, time) = s.split_once([' ', 'T'])?;
    let mut parts = date.split(['.', '/']);
    let day: i8 = parts.next()?.parse().ok()?;
    let month: i8 = parts.next()?.parse().ok()?;
    let year: i16 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let mut parts = time.trim().split(':');
    let hour: i8 = parts.next()?.parse().ok()?;
    let minute: i8 = parts.next()?.parse().ok()?;
    let second: i8 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };

    let date = Date::new(year, month, day).ok()?;
    let time = Time::new(hour, minute, second, 0).ok()?;
    Some(date.to_datetime(time))
}

/// Parses a strict `YYYY-MM-DD` date.
pub(crate) fn parse_date(s: &str) -> Option<Date> {
    if !matches_shape(s, "dddd-dd-dd") {
        return None;
    }
    let year = s.get(0..4)?.parse().ok()?;
    let month = s.get(5..7)?.parse().ok()?;
    let day = s.get(8..10)?.parse().ok()?;
    Date::new(year, month, day).ok()
}

/// Parses a strict `HH:MM` time of day.
pub(crate) fn parse_time(s: &str) -> Option<Time> {
    if !matches_shape(s, "dd:dd") {
        return None;
    }
    let hour = s.get(0..2)?.parse().ok()?;
    let minute = s.get(3..5)?.parse().ok()?;
    Time::new(hour, minute, 0, 0).ok()
}

/// `d` in the shape matches an ASCII digit, anything else matches itself.
fn matches_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            p => c == p,
        })
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Non-negative integer value of a number or numeric string; anything else is 0.
fn number(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}
