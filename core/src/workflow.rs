// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Editing workflow: opening, validating and submitting the entry form, and
//! the calendar widget callbacks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jiff::civil::{Date, DateTime};
use workcal_erp::{JobId, UpdatedJob};

use crate::datetime::{format_date, format_time, parse_date, parse_time};
use crate::engine::SyncEngine;
use crate::entry::{Entry, EntryId, ErrorKind, ErrorSlot, TempId};
use crate::error::{LoadError, SyncError};
use crate::lookup::{WorkCodeCache, code_from_label, label};
use crate::recent::{RecentEntries, RecentEntry};
use crate::store::LocalStore;
use crate::view::{AuthState, Confirm};

/// Client-side validation failure; never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Choose a work code from the directory")]
    MissingWorkCode,

    #[error("Invalid date or time")]
    InvalidDateTime,

    #[error("The entry must stay within one day")]
    CrossesDayBoundary,

    #[error("The end time must be after the start time")]
    NonPositiveDuration,
}

/// What submitting a form does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Create a new entry, or resubmit the bound temporary entry.
    Create { bound: Option<TempId> },
    /// Update a confirmed entry.
    Edit { id: JobId },
}

/// Entry form state, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub mode: FormMode,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `HH:MM`.
    pub time_from: String,
    /// `YYYY-MM-DD`.
    pub end_date: String,
    /// `HH:MM`.
    pub time_to: String,
    pub work_code: Option<u32>,
    /// Work-code input text, see [`label`].
    pub work_code_label: String,
    pub description: String,
    pub place_of_work: String,
    /// Error shown when the form opens.
    pub error: Option<ErrorSlot>,
    /// `(work_code, description)` of the entry being edited.
    pub original: Option<(Option<u32>, String)>,
}

impl EditForm {
    fn new(mode: FormMode, start: DateTime, end: DateTime) -> Self {
        Self {
            mode,
            start_date: format_date(start.date()),
            time_from: format_time(start.time()),
            end_date: format_date(end.date()),
            time_to: format_time(end.time()),
            work_code: None,
            work_code_label: String::new(),
            description: String::new(),
            place_of_work: String::new(),
            error: None,
            original: None,
        }
    }

    /// Moves the entry to another day, keeping its times.
    pub fn set_date(&mut self, date: Date) {
        self.start_date = format_date(date);
        self.end_date.clone_from(&self.start_date);
    }

    /// Sets the work code from free-typed input; the code is its leading number.
    pub fn set_work_code_text(&mut self, text: &str) {
        self.work_code = code_from_label(text);
        self.work_code_label = text.trim().to_string();
    }

    /// Whether the work code or description differs from the edited entry.
    #[must_use]
    pub fn code_or_description_changed(&self) -> bool {
        match &self.original {
            Some((code, description)) => {
                *code != self.work_code || description.trim() != self.description.trim()
            }
            None => true,
        }
    }
}

/// Values seeding a create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDefaults {
    pub work_code: Option<u32>,
    pub description: String,
    /// Defaults to the last used place of work.
    pub place_of_work: Option<String>,
}

/// A validated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub start: DateTime,
    pub end: DateTime,
    pub work_code: u32,
    pub description: String,
    pub place_of_work: String,
}

impl Draft {
    fn apply_to(&self, entry: &mut Entry) {
        entry.start = self.start;
        entry.end = self.end;
        entry.work_code = Some(self.work_code);
        entry.description.clone_from(&self.description);
        entry.place_of_work.clone_from(&self.place_of_work);
    }
}

/// Validates a form.
///
/// # Errors
///
/// Returns the first failing check, in the order work code, date-time
/// syntax, single day, positive duration.
pub fn validate_and_build_draft(form: &EditForm) -> Result<Draft, ValidationError> {
    let work_code = form
        .work_code
        .filter(|&c| c > 0)
        .ok_or(ValidationError::MissingWorkCode)?;

    let parse = |date: &str, time: &str| -> Result<DateTime, ValidationError> {
        let date = parse_date(date).map_err(|_| ValidationError::InvalidDateTime)?;
        let time = parse_time(time).map_err(|_| ValidationError::InvalidDateTime)?;
        Ok(date.to_datetime(time))
    };
    let start = parse(&form.start_date, &form.time_from)?;
    let end = parse(&form.end_date, &form.time_to)?;

    if start.date() != end.date() {
        return Err(ValidationError::CrossesDayBoundary);
    }
    if end <= start {
        return Err(ValidationError::NonPositiveDuration);
    }

    Ok(Draft {
        start,
        end,
        work_code,
        description: form.description.trim().to_string(),
        place_of_work: form.place_of_work.trim().to_string(),
    })
}

/// Result of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Create call finished; `None` when it failed and the error is on the
    /// temporary entry.
    Created(Option<JobId>),
    /// Update call finished; `None` when it failed and the error is on the
    /// entry.
    Updated(Option<UpdatedJob>),
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined.
    Cancelled,
    /// A temporary entry was removed locally.
    Discarded,
    /// The server deleted the entry.
    Deleted,
}

/// Result of a drag or resize in the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The widget must put the item back.
    Revert,
    /// Not synchronized: attendance markers.
    Ignored,
    /// The new span was submitted as an update, or kept locally for a
    /// temporary entry.
    Applied,
}

/// Translates user intent into engine calls.
pub struct EditController {
    engine: Arc<SyncEngine>,
    codes: Arc<WorkCodeCache>,
    store: LocalStore,
    auth: Arc<dyn AuthState>,
    confirm: Arc<dyn Confirm>,
    recent: Mutex<RecentEntries>,
    open_form: Mutex<Option<EditForm>>,
}

impl EditController {
    pub fn new(
        engine: Arc<SyncEngine>,
        codes: Arc<WorkCodeCache>,
        store: LocalStore,
        auth: Arc<dyn AuthState>,
        confirm: Arc<dyn Confirm>,
        recent_capacity: usize,
    ) -> Self {
        Self {
            engine,
            codes,
            store,
            auth,
            confirm,
            recent: Mutex::new(RecentEntries::new(recent_capacity)),
            open_form: Mutex::new(None),
        }
    }

    /// Loads the stored recent entries. A corrupted record is dropped.
    pub async fn load_recent(&self) {
        match self.store.recent_entries().await {
            Ok(items) => {
                let mut recent = lock(&self.recent);
                let capacity = recent.capacity();
                *recent = RecentEntries::from_items(capacity, items);
            }
            Err(e) => tracing::warn!(err = %e, "failed to load recent entries"),
        }
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    /// Recent entries, oldest first.
    pub fn recent(&self) -> Vec<RecentEntry> {
        lock(&self.recent).to_vec()
    }

    /// The form of the current edit session.
    pub fn current_form(&self) -> Option<EditForm> {
        lock(&self.open_form).clone()
    }

    /// Opens a create form for a time span.
    pub async fn open_for_create(
        &self,
        range: (DateTime, DateTime),
        defaults: CreateDefaults,
    ) -> EditForm {
        let mut form = EditForm::new(FormMode::Create { bound: None }, range.0, range.1);
        form.description = defaults.description;
        form.place_of_work = match defaults.place_of_work {
            Some(place) => place,
            None => self.last_place_of_work().await,
        };
        self.prefill_work_code(&mut form, defaults.work_code).await;

        self.open(form)
    }

    /// Opens a form seeded from an entry.
    ///
    /// A temporary entry opens in create mode bound to it, so submitting
    /// resubmits the create.
    pub async fn open_for_edit(&self, entry: &Entry) -> EditForm {
        let mode = match &entry.id {
            EntryId::Local(temp) => FormMode::Create {
                bound: Some(temp.clone()),
            },
            EntryId::Confirmed(id) => FormMode::Edit { id: *id },
        };

        let mut form = EditForm::new(mode, entry.start, entry.end);
        form.description.clone_from(&entry.description);
        form.place_of_work.clone_from(&entry.place_of_work);
        form.original = Some((entry.work_code, entry.description.clone()));
        form.error = match &entry.id {
            EntryId::Local(_) => Some(entry.errors.create.clone()),
            EntryId::Confirmed(_) if !entry.errors.delete.is_empty() => {
                Some(entry.errors.delete.clone())
            }
            EntryId::Confirmed(_) => Some(entry.errors.update.clone()),
        }
        .filter(|slot| !slot.is_empty());
        self.prefill_work_code(&mut form, entry.work_code).await;

        self.open(form)
    }

    /// Validates and submits a form, closing the edit session.
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the server; the edit
    /// session stays open in that case.
    pub async fn submit(&self, form: EditForm) -> Result<SubmitOutcome, ValidationError> {
        let draft = validate_and_build_draft(&form)?;
        self.cancel();

        let pushes_recent = form.code_or_description_changed();
        let outcome = match &form.mode {
            FormMode::Create { bound } => {
                let bound = bound
                    .as_ref()
                    .and_then(|temp| self.engine.entry(&EntryId::Local(temp.clone())));
                let mut entry = bound.unwrap_or_else(|| Entry::draft(draft.start, draft.end));
                draft.apply_to(&mut entry);

                self.remember_place_of_work(&draft.place_of_work).await;
                self.push_recent(&draft).await;
                SubmitOutcome::Created(self.engine.submit_create(entry).await)
            }
            FormMode::Edit { id } => {
                let id = EntryId::Confirmed(*id);
                let mut entry = self
                    .engine
                    .entry(&id)
                    .unwrap_or_else(|| Entry { id, ..Entry::draft(draft.start, draft.end) });
                draft.apply_to(&mut entry);

                if pushes_recent {
                    self.push_recent(&draft).await;
                }
                SubmitOutcome::Updated(self.engine.submit_update(entry).await)
            }
        };
        Ok(outcome)
    }

    /// Deletes an entry after confirmation. Temporary entries are discarded
    /// locally.
    ///
    /// # Errors
    ///
    /// Returns the delete failure; it is also recorded on the entry.
    pub async fn request_delete(&self, id: &EntryId) -> Result<DeleteOutcome, SyncError> {
        if !self.confirm.confirm("Delete this entry?").await {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.cancel();

        match id {
            EntryId::Local(temp) => {
                self.engine.discard_local(temp);
                Ok(DeleteOutcome::Discarded)
            }
            EntryId::Confirmed(_) => {
                self.engine.submit_delete(id).await?;
                Ok(DeleteOutcome::Deleted)
            }
        }
    }

    /// Closes the edit session without side effects.
    pub fn cancel(&self) {
        lock(&self.open_form).take();
    }

    /// The widget now shows another range.
    ///
    /// # Errors
    ///
    /// Returns the load failure; previously loaded entries are kept.
    pub async fn on_range_changed(&self, from: Date, to: Date) -> Result<(), LoadError> {
        if !self.auth.is_logged_in() {
            self.engine.clear().await;
            return Ok(());
        }
        self.engine.reconcile_after_range_change(from, to).await
    }

    /// The user selected an empty span. `None` when logged out.
    pub async fn on_create_requested(&self, start: DateTime, end: DateTime) -> Option<EditForm> {
        if !self.auth.is_logged_in() {
            tracing::debug!("create requested while logged out");
            return None;
        }
        Some(
            self.open_for_create((start, end), CreateDefaults::default())
                .await,
        )
    }

    /// The user clicked an item. `None` for markers, unknown items or when
    /// logged out.
    pub async fn on_edit_requested(&self, id: &str) -> Option<EditForm> {
        let id = id.parse::<EntryId>().ok()?;
        if !self.auth.is_logged_in() {
            tracing::debug!(%id, "edit requested while logged out");
            return None;
        }
        let entry = self.engine.entry(&id)?;
        Some(self.open_for_edit(&entry).await)
    }

    /// The user dragged or resized an item.
    pub async fn on_event_moved_or_resized(
        &self,
        id: &str,
        start: DateTime,
        end: DateTime,
    ) -> MoveOutcome {
        if !self.auth.is_logged_in() {
            return MoveOutcome::Revert;
        }
        let Ok(id) = id.parse::<EntryId>() else {
            return MoveOutcome::Ignored;
        };
        if start.date() != end.date() || end <= start {
            return MoveOutcome::Revert;
        }
        if let EntryId::Local(temp) = &id {
            return match self.engine.apply_local(temp, start, end) {
                true => MoveOutcome::Applied,
                false => MoveOutcome::Revert,
            };
        }
        let Some(mut entry) = self.engine.entry(&id) else {
            return MoveOutcome::Revert;
        };

        entry.start = start;
        entry.end = end;
        self.engine.submit_update(entry).await;
        MoveOutcome::Applied
    }

    /// The login state changed: reload the last range, or clear it.
    ///
    /// # Errors
    ///
    /// Returns the reload failure.
    pub async fn on_login_changed(&self) -> Result<(), LoadError> {
        if !self.auth.is_logged_in() {
            self.cancel();
            self.engine.clear().await;
            return Ok(());
        }
        match self.engine.range() {
            Some((from, to)) => self.engine.reconcile_after_range_change(from, to).await,
            None => Ok(()),
        }
    }

    fn open(&self, form: EditForm) -> EditForm {
        *lock(&self.open_form) = Some(form.clone());
        form
    }

    async fn prefill_work_code(&self, form: &mut EditForm, code: Option<u32>) {
        let Some(code) = code.filter(|&c| c > 0) else {
            return;
        };
        form.work_code = Some(code);
        form.work_code_label = match self.codes.resolve_by_code(&code.to_string()).await {
            Some(item) => label(&item),
            None => code.to_string(),
        };
    }

    async fn last_place_of_work(&self) -> String {
        match self.store.last_place_of_work().await {
            Ok(place) => place.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(err = %e, "failed to read last place of work");
                String::new()
            }
        }
    }

    async fn remember_place_of_work(&self, place: &str) {
        if let Err(e) = self.store.set_last_place_of_work(place).await {
            tracing::warn!(err = %e, "failed to store last place of work");
        }
    }

    async fn push_recent(&self, draft: &Draft) {
        let items = {
            let mut recent = lock(&self.recent);
            recent.push(RecentEntry {
                work_code: draft.work_code,
                description: draft.description.clone(),
            });
            recent.to_vec()
        };
        if let Err(e) = self.store.set_recent_entries(&items).await {
            tracing::warn!(err = %e, "failed to store recent entries");
        }
    }
}

impl std::fmt::Debug for EditController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditController")
            .field("engine", &self.engine)
            .field("recent", &self.recent)
            .field("open_form", &self.open_form)
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks an entry's error kind for display, e.g. `update failed: …`.
#[must_use]
pub fn describe_error(kind: ErrorKind, slot: &ErrorSlot) -> String {
    let what = match kind {
        ErrorKind::Create => "create failed",
        ErrorKind::Update => "update failed",
        ErrorKind::Delete => "delete failed",
    };
    format!("{what}: {}", slot.short)
}
