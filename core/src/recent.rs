// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;

/// Default number of recent entries kept.
pub const DEFAULT_RECENT_CAPACITY: usize = 10;

/// A work code and description pair the user submitted recently.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub work_code: u32,
    pub description: String,
}

/// Bounded, deduplicated history of recent entries, most recent last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntries {
    capacity: usize,
    items: VecDeque<RecentEntry>,
}

impl RecentEntries {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            items: VecDeque::new(),
        }
    }

    /// Builds a history from stored items, oldest first, keeping the newest
    /// ones that fit.
    #[must_use]
    pub fn from_items(capacity: usize, items: impl IntoIterator<Item = RecentEntry>) -> Self {
        let mut recent = Self::new(capacity);
        for item in items {
            recent.push(item);
        }
        recent
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends an entry, moving an equal one to the end instead of
    /// duplicating it.
    pub fn push(&mut self, entry: RecentEntry) {
        self.items.retain(|a| a != &entry);
        self.items.push_back(entry);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &RecentEntry> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<RecentEntry> {
        self.items.iter().cloned().collect()
    }
}

impl Default for RecentEntries {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAPACITY)
    }
}
