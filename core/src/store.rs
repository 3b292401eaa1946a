// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Persisted client state: last place of work, login record and recent
//! entries, kept as JSON values in a SQLite key-value table.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use workcal_erp::Credentials;

use crate::error::StoreError;
use crate::recent::RecentEntry;

static IN_MEMORY_DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

const KEY_LAST_PLACE: &str = "last_place_of_work";
const KEY_AUTH: &str = "auth";
const KEY_RECENT: &str = "recent_entries";

#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Opens the state database.
    /// If `filename` is `None`, it opens a private in-memory database.
    pub async fn open(filename: Option<&Path>) -> Result<Self, StoreError> {
        let (options, pool_options) = if let Some(filename) = filename {
            tracing::info!(path = %filename.display(), "connecting to SQLite database");
            let filename = filename
                .to_str()
                .ok_or_else(|| StoreError::Path(filename.display().to_string()))?;
            let options = SqliteConnectOptions::new()
                .filename(filename)
                .create_if_missing(true);
            (options, SqlitePoolOptions::new())
        } else {
            tracing::info!("connecting to in-memory SQLite database");
            let id = IN_MEMORY_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
            let options = SqliteConnectOptions::new()
                .filename(format!("file:workcal-memdb-{id}"))
                .in_memory(true)
                .shared_cache(true);
            // the database lives as long as one connection is open
            let pool_options = SqlitePoolOptions::new()
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (options, pool_options)
        };

        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("src/store/migrations") // relative path from the crate root
            .run(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Reads a JSON value.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        const SQL: &str = "SELECT value FROM kv WHERE key = ?;";

        let value: Option<String> = sqlx::query_scalar(SQL)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        value
            .map(|v| serde_json::from_str(&v))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Writes a JSON value, replacing any previous one.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        const SQL: &str = "
INSERT INTO kv (key, value)
VALUES (?, ?)
ON CONFLICT(key) DO UPDATE SET
    value = excluded.value,
    updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now');
";

        let value = serde_json::to_string(value)?;
        sqlx::query(SQL)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        const SQL: &str = "DELETE FROM kv WHERE key = ?;";

        sqlx::query(SQL).bind(key).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn last_place_of_work(&self) -> Result<Option<String>, StoreError> {
        self.get(KEY_LAST_PLACE).await
    }

    pub async fn set_last_place_of_work(&self, place: &str) -> Result<(), StoreError> {
        self.set(KEY_LAST_PLACE, place).await
    }

    /// Stored login record, `{userIdCoded, userName}`.
    pub async fn auth(&self) -> Result<Option<Credentials>, StoreError> {
        self.get(KEY_AUTH).await
    }

    pub async fn set_auth(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.set(KEY_AUTH, credentials).await
    }

    pub async fn clear_auth(&self) -> Result<(), StoreError> {
        self.remove(KEY_AUTH).await
    }

    /// Recent entries, oldest first.
    pub async fn recent_entries(&self) -> Result<Vec<RecentEntry>, StoreError> {
        Ok(self.get(KEY_RECENT).await?.unwrap_or_default())
    }

    pub async fn set_recent_entries(&self, entries: &[RecentEntry]) -> Result<(), StoreError> {
        self.set(KEY_RECENT, entries).await
    }

    pub async fn close(self) {
        tracing::debug!("closing database connection");
        self.pool.close().await;
    }
}
