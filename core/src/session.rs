// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::{PoisonError, RwLock};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use workcal_erp::{Credentials, ErpClient, Identity};

use crate::error::{SessionError, StoreError};
use crate::store::LocalStore;
use crate::view::AuthState;

/// Login state, persisted across runs and mirrored into the API client.
#[derive(Debug)]
pub struct Session {
    client: ErpClient,
    store: LocalStore,
    current: RwLock<Option<Credentials>>,
}

impl Session {
    /// Restores the stored login, if any, and attaches it to the client.
    ///
    /// A stored record whose user id does not decode is ignored.
    pub async fn restore(client: ErpClient, store: LocalStore) -> Result<Self, StoreError> {
        let current = store.auth().await?.filter(|creds| {
            let valid = decode_user_id(&creds.user_id_coded).is_some()
                && !creds.user_name.trim().is_empty();
            if !valid {
                tracing::warn!("ignoring invalid stored login");
            }
            valid
        });

        match &current {
            Some(creds) => {
                tracing::debug!(user = %creds.user_name, "restored login");
                client.set_credentials(creds.clone());
            }
            None => client.clear_credentials(),
        }

        Ok(Self {
            client,
            store,
            current: RwLock::new(current),
        })
    }

    /// Logs in and persists the encoded identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the login or the record cannot
    /// be stored; the previous state is kept in both cases.
    pub async fn login(&self, login: &str, password: &str) -> Result<Identity, SessionError> {
        let identity = self.client.login(login.trim(), password).await?;
        let creds = Credentials {
            user_id_coded: encode_user_id(&identity.id),
            user_name: identity.user_name.clone(),
        };

        self.store.set_auth(&creds).await?;
        self.client.set_credentials(creds.clone());
        *self.write() = Some(creds);
        Ok(identity)
    }

    /// Forgets the login.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be removed.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.clear_auth().await?;
        self.client.clear_credentials();
        *self.write() = None;
        tracing::info!("logged out");
        Ok(())
    }

    /// Display name of the signed-in user.
    pub fn user_name(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|creds| creds.user_name.clone())
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Credentials>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuthState for Session {
    fn is_logged_in(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Reversible encoding of a user id: base64 of its UTF-8 bytes.
///
/// NOTE: this is what the server expects in `UserIdCoded`, not a secret.
#[must_use]
pub fn encode_user_id(id: &str) -> String {
    STANDARD.encode(id.trim().as_bytes())
}

/// Inverse of [`encode_user_id`]; `None` for invalid or empty input.
#[must_use]
pub fn decode_user_id(coded: &str) -> Option<String> {
    let bytes = STANDARD.decode(coded.trim()).ok()?;
    String::from_utf8(bytes).ok().filter(|id| !id.is_empty())
}
