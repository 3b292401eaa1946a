// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Interfaces of the presentation layer, the login state and the
//! confirmation prompt.

use std::sync::{Mutex, PoisonError};

use crate::mapping::CalendarItem;

/// A calendar widget that renders items.
///
/// Implementations must not call back into the engine from these methods.
pub trait CalendarView: Send + Sync {
    /// Replaces every rendered item.
    fn set_events(&self, items: Vec<CalendarItem>);

    /// Adds an item.
    fn add_event(&self, item: CalendarItem);

    /// Replaces the item with the same id, or adds it.
    fn update_event(&self, item: CalendarItem);

    /// Returns the item with the given id.
    fn get_event(&self, id: &str) -> Option<CalendarItem>;

    /// Removes the item with the given id, if present.
    fn remove_event(&self, id: &str);
}

/// Whether a user is currently signed in.
pub trait AuthState: Send + Sync {
    fn is_logged_in(&self) -> bool;
}

/// Yes/no confirmation prompt.
#[async_trait::async_trait]
pub trait Confirm: Send + Sync {
    /// Asks the user; `true` means proceed.
    async fn confirm(&self, message: &str) -> bool;
}

/// In-process [`CalendarView`] that keeps items in insertion order.
#[derive(Debug, Default)]
pub struct MemoryView {
    items: Mutex<Vec<CalendarItem>>,
}

impl MemoryView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the rendered items.
    pub fn items(&self) -> Vec<CalendarItem> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CalendarItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CalendarView for MemoryView {
    fn set_events(&self, items: Vec<CalendarItem>) {
        *self.lock() = items;
    }

    fn add_event(&self, item: CalendarItem) {
        self.update_event(item);
    }

    fn update_event(&self, item: CalendarItem) {
        let mut items = self.lock();
        match items.iter_mut().find(|a| a.id == item.id) {
            Some(slot) => *slot = item,
            None => items.push(item),
        }
    }

    fn get_event(&self, id: &str) -> Option<CalendarItem> {
        self.lock().iter().find(|a| a.id == id).cloned()
    }

    fn remove_event(&self, id: &str) {
        self.lock().retain(|a| a.id != id);
    }
}
