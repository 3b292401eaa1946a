// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use workcal_erp::ErpError;

use crate::entry::EntryId;

/// Failure of a submission that is reported to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The API call failed.
    #[error(transparent)]
    Erp(#[from] ErpError),

    /// The entry has no server id yet.
    #[error("Entry {0} is not saved on the server yet")]
    NotConfirmed(EntryId),

    /// The entry is not in the loaded collection.
    #[error("Entry {0} is not loaded")]
    NotFound(EntryId),
}

/// Failure of a range reload. Previously loaded entries are kept.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A list request exceeded its deadline.
    #[error("Loading timed out: {0}")]
    Timeout(#[source] ErpError),

    /// The server could not be reached.
    #[error("Server unreachable: {0}")]
    Connectivity(#[source] ErpError),

    /// Any other failure.
    #[error("Failed to load entries: {0}")]
    Other(#[source] ErpError),
}

impl LoadError {
    /// Text of the load-error banner.
    #[must_use]
    pub fn banner(&self) -> String {
        let (hint, cause) = match self {
            Self::Timeout(e) => ("The server did not answer in time.", e),
            Self::Connectivity(e) => ("No connection to the server.", e),
            Self::Other(e) => ("The server rejected the request.", e),
        };
        format!(
            "Failed to load entries and attendance. {hint}\nShowing previously loaded data.\nError: {cause}"
        )
    }
}

impl From<ErpError> for LoadError {
    fn from(e: ErpError) -> Self {
        if e.is_timeout() {
            Self::Timeout(e)
        } else if e.is_unreachable() {
            Self::Connectivity(e)
        } else {
            Self::Other(e)
        }
    }
}

/// Local persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupted stored value: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    Path(String),
}

/// Login or logout failure.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Erp(#[from] ErpError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
