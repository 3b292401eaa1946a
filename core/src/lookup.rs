// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use workcal_erp::{ErpClient, ErpError, WorkCodeItem};

/// Session cache of the work-code directory.
///
/// Keyed by the normalized numeric code; filled by every search and
/// resolution and never evicted.
#[derive(Debug)]
pub struct WorkCodeCache {
    client: ErpClient,
    items: Mutex<HashMap<String, WorkCodeItem>>,
}

impl WorkCodeCache {
    pub fn new(client: ErpClient) -> Self {
        Self {
            client,
            items: Mutex::new(HashMap::new()),
        }
    }

    /// Searches the directory by free text; an empty query lists everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote search fails.
    pub async fn search_by_text(&self, query: &str) -> Result<Vec<WorkCodeItem>, ErpError> {
        let items = self.client.search_work_codes(query.trim(), None).await?;
        self.remember(&items);
        tracing::debug!(query, hits = items.len(), "work codes searched");
        Ok(items)
    }

    /// Resolves a work code to its directory item.
    ///
    /// Returns `None` only for an empty or zero code. When neither the
    /// cache nor the server knows the code, a placeholder carrying only the
    /// code is returned.
    pub async fn resolve_by_code(&self, code: &str) -> Option<WorkCodeItem> {
        let code = normalize_code(code)?;
        let key = code.to_string();
        if let Some(item) = self.lock().get(&key) {
            return Some(item.clone());
        }

        match self.client.search_work_codes("", Some(code)).await {
            Ok(items) => {
                self.remember(&items);
                if let Some(hit) = pick(&items, code) {
                    return Some(hit);
                }
            }
            Err(e) => tracing::debug!(code, err = %e, "exact work code lookup failed"),
        }

        match self.client.search_work_codes(&key, None).await {
            Ok(items) => {
                self.remember(&items);
                if let Some(hit) = pick(&items, code) {
                    return Some(hit);
                }
            }
            Err(e) => tracing::warn!(code, err = %e, "work code lookup failed"),
        }

        tracing::debug!(code, "work code not found, using placeholder");
        Some(WorkCodeItem::placeholder(code))
    }

    /// Returns a cached item without contacting the server.
    pub fn cached(&self, code: u32) -> Option<WorkCodeItem> {
        self.lock().get(&code.to_string()).cloned()
    }

    fn remember(&self, items: &[WorkCodeItem]) {
        let mut cache = self.lock();
        for item in items {
            cache.insert(item.code.to_string(), item.clone());
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, WorkCodeItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Only an exact match counts; fuzzy text hits never stand in for a code.
fn pick(items: &[WorkCodeItem], code: u32) -> Option<WorkCodeItem> {
    items.iter().find(|a| a.code == code).cloned()
}

fn normalize_code(code: &str) -> Option<u32> {
    code.trim().parse::<u32>().ok().filter(|&c| c > 0)
}

/// Input-field text of an item: `"<code>  <obj>  <task> — <name>"`, empty
/// parts skipped.
#[must_use]
pub fn label(item: &WorkCodeItem) -> String {
    let code = if item.code > 0 {
        item.code.to_string()
    } else {
        String::new()
    };
    let head = [code.as_str(), item.obj_code.trim(), item.task_code.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("  ");
    let name = item.name.trim();

    match (head.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => head,
        (false, false) => format!("{head} — {name}"),
    }
}

/// Extracts the work code from free-typed input: the leading number.
#[must_use]
pub fn code_from_label(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(text.len(), |(i, _)| i);
    text.get(..end)?.parse().ok().filter(|&c| c > 0)
}
