// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use jiff::civil::{Date, DateTime};
use workcal_erp::JobId;

/// Default length of the short form of an error message.
pub const DEFAULT_ERROR_SUMMARY_LEN: usize = 120;

const TEMP_PREFIX: &str = "tmp-";

/// Local placeholder id of an entry the server has not confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TempId(String);

impl TempId {
    /// Allocates a fresh temporary id.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{TEMP_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    /// Returns the string form, `tmp-<uuid>`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an entry: local until the server assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryId {
    /// Not yet confirmed by the server.
    Local(TempId),
    /// Server-assigned id.
    Confirmed(JobId),
}

impl EntryId {
    /// Whether the entry is still local.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Returns the server id of a confirmed entry.
    #[must_use]
    pub const fn server_id(&self) -> Option<JobId> {
        match self {
            Self::Confirmed(id) => Some(*id),
            Self::Local(_) => None,
        }
    }
}

impl From<JobId> for EntryId {
    fn from(id: JobId) -> Self {
        Self::Confirmed(id)
    }
}

impl From<TempId> for EntryId {
    fn from(id: TempId) -> Self {
        Self::Local(id)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(id) => id.fmt(f),
            Self::Confirmed(id) => id.fmt(f),
        }
    }
}

impl FromStr for EntryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix(TEMP_PREFIX) {
            Some(rest) if !rest.is_empty() => Ok(Self::Local(TempId(s.to_string()))),
            Some(_) => Err(format!("Invalid temporary id: {s:?}")),
            None => s.parse::<JobId>().map(Self::Confirmed),
        }
    }
}

/// Which operation an error slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Failed create.
    Create,
    /// Failed update.
    Update,
    /// Failed delete.
    Delete,
}

/// Last error of one operation, in full and shortened form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ErrorSlot {
    /// Full message.
    pub full: String,
    /// Whitespace-normalized, truncated message for compact display.
    pub short: String,
}

impl ErrorSlot {
    /// Builds a slot from a message, shortening it to `max_len` characters.
    #[must_use]
    pub fn new(message: &str, max_len: usize) -> Self {
        Self {
            full: message.to_string(),
            short: shorten_error(message, max_len),
        }
    }

    /// Whether the slot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

/// Independent error slots for create, update and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ErrorState {
    pub create: ErrorSlot,
    pub update: ErrorSlot,
    pub delete: ErrorSlot,
}

impl ErrorState {
    #[must_use]
    pub const fn get(&self, kind: ErrorKind) -> &ErrorSlot {
        match kind {
            ErrorKind::Create => &self.create,
            ErrorKind::Update => &self.update,
            ErrorKind::Delete => &self.delete,
        }
    }

    pub fn set(&mut self, kind: ErrorKind, slot: ErrorSlot) {
        *self.slot_mut(kind) = slot;
    }

    pub fn clear(&mut self, kind: ErrorKind) {
        *self.slot_mut(kind) = ErrorSlot::default();
    }

    /// Whether any slot holds an error.
    #[must_use]
    pub fn any(&self) -> bool {
        !(self.create.is_empty() && self.update.is_empty() && self.delete.is_empty())
    }

    const fn slot_mut(&mut self, kind: ErrorKind) -> &mut ErrorSlot {
        match kind {
            ErrorKind::Create => &mut self.create,
            ErrorKind::Update => &mut self.update,
            ErrorKind::Delete => &mut self.delete,
        }
    }
}

/// A work record as held by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    /// Start, local wall clock.
    pub start: DateTime,
    /// End, local wall clock, on the same day as `start`.
    pub end: DateTime,
    /// Work code, required positive before submission.
    pub work_code: Option<u32>,
    /// Server-derived object classification code.
    pub obj_code: String,
    /// Server-derived task classification code.
    pub task_code: String,
    pub place_of_work: String,
    pub description: String,
    pub errors: ErrorState,
    /// True while a local entry waits for its create call.
    pub pending_create: bool,
}

impl Entry {
    /// Creates an entry for a time span, with a fresh temporary id.
    #[must_use]
    pub fn draft(start: DateTime, end: DateTime) -> Self {
        Self {
            id: EntryId::Local(TempId::generate()),
            start,
            end,
            work_code: None,
            obj_code: String::new(),
            task_code: String::new(),
            place_of_work: String::new(),
            description: String::new(),
            errors: ErrorState::default(),
            pending_create: false,
        }
    }

    /// Calendar day of the entry.
    #[must_use]
    pub fn date(&self) -> Date {
        self.start.date()
    }

    /// Display label, `"<obj> <task> <description>"` with empty parts skipped.
    #[must_use]
    pub fn label(&self) -> String {
        [&self.obj_code, &self.task_code, &self.description]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Copies the user-editable fields from `other`.
    pub fn apply_fields(&mut self, other: &Entry) {
        self.start = other.start;
        self.end = other.end;
        self.work_code = other.work_code;
        self.place_of_work.clone_from(&other.place_of_work);
        self.description.clone_from(&other.description);
    }
}

/// Normalizes whitespace and truncates to `max_len` characters, appending `…`.
#[must_use]
pub fn shorten_error(message: &str, max_len: usize) -> String {
    let normalized = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= max_len {
        return normalized;
    }

    let mut short: String = normalized.chars().take(max_len).collect();
    short.push('…');
    short
}
