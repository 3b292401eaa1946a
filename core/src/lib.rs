// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Optimistic client-side model of an ERP day calendar.
//!
//! Entries are shown immediately and reconciled with the server in the
//! background; failures stay visible on the entry they belong to.

mod config;
mod datetime;
mod engine;
mod entry;
mod error;
mod lookup;
mod mapping;
mod recent;
mod session;
mod store;
mod view;
mod workflow;

pub use crate::config::{APP_NAME, Config, STATE_DB_NAME};
pub use crate::datetime::{
    add_minutes, format_date, format_minutes, format_time, minutes_between, parse_date,
    parse_time, unix_seconds, week_of,
};
pub use crate::engine::SyncEngine;
pub use crate::entry::{
    DEFAULT_ERROR_SUMMARY_LEN, Entry, EntryId, ErrorKind, ErrorSlot, ErrorState, TempId,
    shorten_error,
};
pub use crate::error::{LoadError, SessionError, StoreError, SyncError};
pub use crate::lookup::{WorkCodeCache, code_from_label, label};
pub use crate::mapping::{
    AttendanceMarker, CalendarItem, ItemKind, MarkerKind, entry_from_item, entry_from_record,
    item_from_entry, item_from_marker, markers_from_intervals, payload_from_entry,
};
pub use crate::recent::{DEFAULT_RECENT_CAPACITY, RecentEntries, RecentEntry};
pub use crate::session::{Session, decode_user_id, encode_user_id};
pub use crate::store::LocalStore;
pub use crate::view::{AuthState, CalendarView, Confirm, MemoryView};
pub use crate::workflow::{
    CreateDefaults, DeleteOutcome, Draft, EditController, EditForm, FormMode, MoveOutcome,
    SubmitOutcome, ValidationError, describe_error, validate_and_build_draft,
};
