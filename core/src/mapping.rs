// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Conversions between entries, API records and rendered calendar items.

use jiff::civil::DateTime;
use workcal_erp::{AttendanceInterval, JobPayload, JobRecord};

use crate::datetime::{add_minutes, format_date, format_time, unix_seconds};
use crate::entry::{Entry, EntryId, ErrorState};

/// Kind of an attendance marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    CheckIn,
    CheckOut,
}

impl MarkerKind {
    const fn id_prefix(self) -> &'static str {
        match self {
            Self::CheckIn => "att-in",
            Self::CheckOut => "att-out",
        }
    }

    const fn label_prefix(self) -> &'static str {
        match self {
            Self::CheckIn => "Check-in",
            Self::CheckOut => "Check-out",
        }
    }
}

/// Read-only check-in or check-out overlay derived from an attendance interval.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AttendanceMarker {
    pub id: String,
    pub kind: MarkerKind,
    /// Instant of the check-in or check-out.
    pub at: DateTime,
    pub label: String,
}

/// What a calendar item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    /// An editable work record.
    Job,
    /// A read-only attendance marker.
    Marker(MarkerKind),
}

/// A rendered calendar item with all state needed to re-render it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CalendarItem {
    /// `tmp-…`, the numeric server id, or a marker id.
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub start: DateTime,
    pub end: DateTime,
    /// Whether the item may be dragged or resized.
    pub editable: bool,
    pub work_code: Option<u32>,
    pub obj_code: String,
    pub task_code: String,
    pub description: String,
    pub place_of_work: String,
    /// Absent on items that never carried error state.
    pub errors: Option<ErrorState>,
    pub pending_create: bool,
    pub saving: bool,
}

/// Builds an entry from a list record.
///
/// Returns `None` when the record does not span a positive duration.
#[must_use]
pub fn entry_from_record(record: &JobRecord) -> Option<Entry> {
    if record.time_to <= record.time_from {
        tracing::warn!(id = %record.id, "dropping job record with non-positive duration");
        return None;
    }

    Some(Entry {
        id: EntryId::Confirmed(record.id),
        start: record.date.to_datetime(record.time_from),
        end: record.date.to_datetime(record.time_to),
        work_code: (record.work_code > 0).then_some(record.work_code),
        obj_code: record.obj_code.trim().to_string(),
        task_code: record.task_code.trim().to_string(),
        place_of_work: record.place_of_work.clone(),
        description: record.description.clone(),
        errors: ErrorState::default(),
        pending_create: false,
    })
}

/// Renders an entry.
#[must_use]
pub fn item_from_entry(entry: &Entry, saving: bool) -> CalendarItem {
    CalendarItem {
        id: entry.id.to_string(),
        kind: ItemKind::Job,
        title: entry.label(),
        start: entry.start,
        end: entry.end,
        editable: true,
        work_code: entry.work_code,
        obj_code: entry.obj_code.clone(),
        task_code: entry.task_code.clone(),
        description: entry.description.clone(),
        place_of_work: entry.place_of_work.clone(),
        errors: Some(entry.errors.clone()),
        pending_create: entry.pending_create,
        saving,
    }
}

/// Recovers an entry from a rendered item. Marker items and items with an
/// unrecognized id yield `None`.
#[must_use]
pub fn entry_from_item(item: &CalendarItem) -> Option<Entry> {
    if item.kind != ItemKind::Job {
        return None;
    }
    let id = item.id.parse::<EntryId>().ok()?;

    Some(Entry {
        id,
        start: item.start,
        end: item.end,
        work_code: item.work_code.filter(|&c| c > 0),
        obj_code: item.obj_code.clone(),
        task_code: item.task_code.clone(),
        place_of_work: item.place_of_work.clone(),
        description: item.description.clone(),
        errors: item.errors.clone().unwrap_or_default(),
        pending_create: item.pending_create,
    })
}

/// Builds the request payload of an entry. Temporary ids map to `0`.
#[must_use]
pub fn payload_from_entry(entry: &Entry) -> JobPayload {
    JobPayload {
        id: Some(entry.id.server_id().map_or(0, |id| id.get())),
        time_from: format_time(entry.start.time()),
        time_to: format_time(entry.end.time()),
        date: format_date(entry.start.date()),
        kpld: entry.work_code.unwrap_or(0),
        description: entry.description.clone(),
        obj_code: entry.obj_code.clone(),
        task_code: entry.task_code.clone(),
        place_of_work: entry.place_of_work.clone(),
    }
}

/// Expands attendance intervals into check-in and check-out markers.
#[must_use]
pub fn markers_from_intervals(intervals: &[AttendanceInterval]) -> Vec<AttendanceMarker> {
    intervals
        .iter()
        .enumerate()
        .flat_map(|(idx, interval)| {
            [
                marker(idx, MarkerKind::CheckIn, interval.from),
                marker(idx, MarkerKind::CheckOut, interval.to),
            ]
        })
        .collect()
}

fn marker(idx: usize, kind: MarkerKind, at: DateTime) -> AttendanceMarker {
    AttendanceMarker {
        id: format!("{}-{idx}-{}", kind.id_prefix(), unix_seconds(at)),
        kind,
        at,
        label: format!("{} {}", kind.label_prefix(), format_time(at.time())),
    }
}

/// Renders an attendance marker as a one-minute, non-editable item.
#[must_use]
pub fn item_from_marker(marker: &AttendanceMarker) -> CalendarItem {
    CalendarItem {
        id: marker.id.clone(),
        kind: ItemKind::Marker(marker.kind),
        title: marker.label.clone(),
        start: marker.at,
        end: add_minutes(marker.at, 1),
        editable: false,
        work_code: None,
        obj_code: String::new(),
        task_code: String::new(),
        description: String::new(),
        place_of_work: String::new(),
        errors: None,
        pending_create: false,
        saving: false,
    }
}
