// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Optimistic synchronization of the entry collection with the ERP API.
//!
//! Every mutation is applied locally first and reconciled when the API call
//! completes. The collection lives behind a `std::sync::Mutex` that is never
//! held across an `.await`. Range reloads replace the whole collection; they
//! hold the range gate exclusively, and optimistic inserts take it shared, so
//! an insert issued while a reload is in flight lands after the reload.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jiff::civil::{Date, DateTime};
use tokio::sync::RwLock;
use workcal_erp::{ErpClient, JobId, UpdatedJob};

use crate::entry::{DEFAULT_ERROR_SUMMARY_LEN, Entry, EntryId, ErrorKind, ErrorSlot, TempId};
use crate::error::{LoadError, SyncError};
use crate::mapping::{
    AttendanceMarker, CalendarItem, entry_from_record, item_from_entry, item_from_marker,
    markers_from_intervals, payload_from_entry,
};
use crate::view::CalendarView;

/// Owner of the active entry collection and its synchronization protocol.
pub struct SyncEngine {
    client: ErpClient,
    state: Mutex<State>,
    range_gate: RwLock<()>,
    view: Option<Arc<dyn CalendarView>>,
    error_summary_len: usize,
}

#[derive(Debug, Default)]
struct State {
    entries: Vec<Entry>,
    markers: Vec<AttendanceMarker>,
    saving: HashSet<EntryId>,
    range: Option<(Date, Date)>,
}

impl State {
    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    fn get_mut(&mut self, id: &EntryId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    fn get_or_insert(&mut self, entry: Entry) -> &mut Entry {
        let idx = self.position(&entry.id).unwrap_or_else(|| {
            self.entries.push(entry);
            self.entries.len() - 1
        });
        &mut self.entries[idx]
    }

    /// Whether an entry belongs in the collection: already held, or dated
    /// inside the loaded range. Anything goes before the first load.
    fn tracks(&self, entry: &Entry) -> bool {
        let day = entry.start.date();
        self.position(&entry.id).is_some()
            || self.range.is_none_or(|(from, to)| from <= day && day <= to)
    }

    fn upsert(&mut self, entry: Entry) {
        match self.get_mut(&entry.id) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    fn remove(&mut self, id: &EntryId) -> Option<Entry> {
        self.saving.remove(id);
        self.position(id).map(|idx| self.entries.remove(idx))
    }

    fn item(&self, entry: &Entry) -> CalendarItem {
        item_from_entry(entry, self.saving.contains(&entry.id))
    }

    fn items(&self) -> Vec<CalendarItem> {
        self.entries
            .iter()
            .map(|e| self.item(e))
            .chain(self.markers.iter().map(item_from_marker))
            .collect()
    }
}

/// A change to push to the attached view once the state lock is released.
enum Render {
    Upsert(CalendarItem),
    Remove(String),
    Reset(Vec<CalendarItem>),
}

impl SyncEngine {
    /// Creates an engine with an empty collection.
    pub fn new(client: ErpClient) -> Self {
        Self {
            client,
            state: Mutex::new(State::default()),
            range_gate: RwLock::new(()),
            view: None,
            error_summary_len: DEFAULT_ERROR_SUMMARY_LEN,
        }
    }

    /// Attaches a view that receives every state change.
    #[must_use]
    pub fn with_view(mut self, view: Arc<dyn CalendarView>) -> Self {
        self.view = Some(view);
        self
    }

    /// Sets the length of the short form of error messages.
    #[must_use]
    pub fn with_error_summary_len(mut self, len: usize) -> Self {
        self.error_summary_len = len;
        self
    }

    pub fn client(&self) -> &ErpClient {
        &self.client
    }

    /// Snapshot of the entries, in collection order.
    pub fn entries(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    pub fn entry(&self, id: &EntryId) -> Option<Entry> {
        self.lock().entries.iter().find(|e| &e.id == id).cloned()
    }

    /// Snapshot of the attendance markers of the loaded range.
    pub fn markers(&self) -> Vec<AttendanceMarker> {
        self.lock().markers.clone()
    }

    /// Whether an API call for the entry is in flight.
    pub fn is_saving(&self, id: &EntryId) -> bool {
        self.lock().saving.contains(id)
    }

    /// The last successfully loaded range.
    pub fn range(&self) -> Option<(Date, Date)> {
        self.lock().range
    }

    /// Creates an entry on the server.
    ///
    /// The entry is inserted locally under a temporary id first. An entry
    /// whose temporary id is already in the collection is resubmitted in
    /// place. Returns the server id, or `None` when the create failed; the
    /// failure is recorded on the temporary entry.
    pub async fn submit_create(&self, entry: Entry) -> Option<JobId> {
        let local = {
            let _gate = self.range_gate.read().await;
            let (local, item) = {
                let mut state = self.lock();
                let temp = match &entry.id {
                    EntryId::Local(temp) if state.position(&entry.id).is_some() => temp.clone(),
                    _ => TempId::generate(),
                };

                let mut local = entry;
                local.id = EntryId::Local(temp);
                local.obj_code.clear();
                local.task_code.clear();
                local.pending_create = true;
                local.errors.clear(ErrorKind::Create);

                state.upsert(local.clone());
                state.saving.insert(local.id.clone());
                let item = state.item(&local);
                (local, item)
            };
            self.render(Render::Upsert(item));
            local
        };

        tracing::debug!(id = %local.id, "submitting create");
        let result = self.client.create_job(&payload_from_entry(&local)).await;

        let temp_id = local.id.clone();
        match result {
            Ok(created) => {
                let mut confirmed = local;
                confirmed.id = EntryId::Confirmed(created.id);
                confirmed.obj_code = created.obj_code;
                confirmed.task_code = created.task_code;
                confirmed.pending_create = false;
                confirmed.errors.clear(ErrorKind::Create);

                let item = {
                    let mut state = self.lock();
                    state.remove(&temp_id);
                    state.upsert(confirmed.clone());
                    state.item(&confirmed)
                };
                self.render(Render::Remove(temp_id.to_string()));
                self.render(Render::Upsert(item));

                tracing::info!(temp = %temp_id, id = %created.id, "entry created");
                Some(created.id)
            }
            Err(e) => {
                tracing::warn!(id = %temp_id, err = %e, "create failed");
                let slot = ErrorSlot::new(&e.to_string(), self.error_summary_len);
                let item = {
                    let mut state = self.lock();
                    state.saving.remove(&temp_id);
                    let entry = state.get_or_insert(local);
                    entry.pending_create = false;
                    entry.errors.set(ErrorKind::Create, slot);
                    let entry = entry.clone();
                    state.item(&entry)
                };
                self.render(Render::Upsert(item));
                None
            }
        }
    }

    /// Updates a confirmed entry on the server.
    ///
    /// The new field values are applied locally first and kept even when the
    /// call fails; the failure is recorded on the entry and `None` returned.
    /// An entry neither held nor dated inside the loaded range is sent
    /// without being added to the collection.
    /// Entries without a server id are recorded as failed without a call.
    pub async fn submit_update(&self, entry: Entry) -> Option<UpdatedJob> {
        if entry.id.server_id().is_none() {
            tracing::warn!(id = %entry.id, "update of an unconfirmed entry");
            let message = SyncError::NotConfirmed(entry.id.clone()).to_string();
            self.record_error(&entry.id, ErrorKind::Update, &message);
            return None;
        }

        let attempted = {
            let _gate = self.range_gate.read().await;
            let (attempted, item) = {
                let mut state = self.lock();
                if state.tracks(&entry) {
                    let current = state.get_or_insert(entry.clone());
                    current.apply_fields(&entry);
                    let attempted = current.clone();
                    state.saving.insert(attempted.id.clone());
                    let item = state.item(&attempted);
                    (attempted, Some(item))
                } else {
                    tracing::debug!(id = %entry.id, "updating an entry outside the loaded range");
                    (entry, None)
                }
            };
            if let Some(item) = item {
                self.render(Render::Upsert(item));
            }
            attempted
        };

        tracing::debug!(id = %attempted.id, "submitting update");
        let result = self.client.update_job(&payload_from_entry(&attempted)).await;

        let id = attempted.id.clone();
        let (item, outcome) = {
            let mut state = self.lock();
            state.saving.remove(&id);
            match result {
                Ok(updated) => {
                    let item = state.get_mut(&id).map(|current| {
                        if !updated.obj_code.is_empty() {
                            current.obj_code.clone_from(&updated.obj_code);
                        }
                        if !updated.task_code.is_empty() {
                            current.task_code.clone_from(&updated.task_code);
                        }
                        current.errors.clear(ErrorKind::Update);
                        current.clone()
                    });
                    (item.map(|e| state.item(&e)), Ok(updated))
                }
                Err(e) if state.tracks(&attempted) => {
                    let slot = ErrorSlot::new(&e.to_string(), self.error_summary_len);
                    let current = state.get_or_insert(attempted.clone());
                    current.apply_fields(&attempted);
                    current.errors.set(ErrorKind::Update, slot);
                    let current = current.clone();
                    (Some(state.item(&current)), Err(e))
                }
                Err(e) => (None, Err(e)),
            }
        };
        if let Some(item) = item {
            self.render(Render::Upsert(item));
        }

        match outcome {
            Ok(updated) => {
                tracing::info!(%id, "entry updated");
                Some(updated)
            }
            Err(e) => {
                tracing::warn!(%id, err = %e, "update failed");
                None
            }
        }
    }

    /// Deletes a confirmed entry on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is local or not loaded, or if the call
    /// fails; a failed call is also recorded on the entry.
    pub async fn submit_delete(&self, id: &EntryId) -> Result<(), SyncError> {
        let Some(server_id) = id.server_id() else {
            return Err(SyncError::NotConfirmed(id.clone()));
        };

        let item = {
            let mut state = self.lock();
            let Some(entry) = state.entries.iter().find(|e| &e.id == id).cloned() else {
                return Err(SyncError::NotFound(id.clone()));
            };
            state.saving.insert(id.clone());
            state.item(&entry)
        };
        self.render(Render::Upsert(item));

        tracing::debug!(%id, "submitting delete");
        match self.client.delete_job(server_id).await {
            Ok(()) => {
                self.lock().remove(id);
                self.render(Render::Remove(id.to_string()));
                tracing::info!(%id, "entry deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%id, err = %e, "delete failed");
                self.lock().saving.remove(id);
                self.record_error(id, ErrorKind::Delete, &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Removes a temporary entry locally, without an API call.
    pub fn discard_local(&self, id: &TempId) -> bool {
        let id = EntryId::Local(id.clone());
        let removed = self.lock().remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "local entry discarded");
            self.render(Render::Remove(id.to_string()));
        }
        removed
    }

    /// Moves a temporary entry to a new span locally, without an API call.
    ///
    /// The span is kept for the next resubmission of the create.
    pub fn apply_local(&self, id: &TempId, start: DateTime, end: DateTime) -> bool {
        let id = EntryId::Local(id.clone());
        let item = {
            let mut state = self.lock();
            let Some(current) = state.get_mut(&id) else {
                return false;
            };
            current.start = start;
            current.end = end;
            let current = current.clone();
            state.item(&current)
        };
        tracing::debug!(%id, %start, %end, "local entry moved");
        self.render(Render::Upsert(item));
        true
    }

    /// Reloads jobs and attendance for an inclusive date range and replaces
    /// the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails; the previous collection is
    /// kept.
    pub async fn reconcile_after_range_change(&self, from: Date, to: Date) -> Result<(), LoadError> {
        let _gate = self.range_gate.write().await;
        tracing::debug!(%from, %to, "reloading range");

        let (jobs, intervals) = tokio::try_join!(
            self.client.list_jobs(from, to),
            self.client.list_attendance(from, to),
        )
        .map_err(|e| {
            tracing::warn!(%from, %to, err = %e, "range reload failed");
            LoadError::from(e)
        })?;

        let items = {
            let mut state = self.lock();
            state.entries = jobs.iter().filter_map(entry_from_record).collect();
            state.markers = markers_from_intervals(&intervals);
            state.range = Some((from, to));
            state.items()
        };
        tracing::info!(%from, %to, jobs = jobs.len(), markers = intervals.len() * 2, "range loaded");
        self.render(Render::Reset(items));
        Ok(())
    }

    /// Waits until no range reload is in flight.
    pub async fn settle_range_load(&self) {
        drop(self.range_gate.read().await);
    }

    /// Empties the collection and the view, e.g. after logout.
    pub async fn clear(&self) {
        let _gate = self.range_gate.write().await;
        *self.lock() = State::default();
        self.render(Render::Reset(Vec::new()));
    }

    fn record_error(&self, id: &EntryId, kind: ErrorKind, message: &str) {
        let slot = ErrorSlot::new(message, self.error_summary_len);
        let item = {
            let mut state = self.lock();
            let entry = state.get_mut(id).map(|entry| {
                entry.errors.set(kind, slot);
                entry.clone()
            });
            entry.map(|entry| state.item(&entry))
        };
        if let Some(item) = item {
            self.render(Render::Upsert(item));
        }
    }

    fn render(&self, change: Render) {
        let Some(view) = &self.view else {
            return;
        };
        match change {
            Render::Upsert(item) => view.update_event(item),
            Render::Remove(id) => view.remove_event(&id),
            Render::Reset(items) => view.set_events(items),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("client", &self.client)
            .field("state", &self.state)
            .field("has_view", &self.view.is_some())
            .finish_non_exhaustive()
    }
}
