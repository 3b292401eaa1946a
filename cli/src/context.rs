// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::sync::Arc;

use jiff::civil::Date;
use workcal_core::{
    AuthState, Config, Confirm, EditController, LocalStore, MemoryView, Session, SyncEngine,
    WorkCodeCache,
};
use workcal_erp::ErpClient;

/// Everything a command needs, wired together for one run.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub store: LocalStore,
    pub session: Arc<Session>,
    pub view: Arc<MemoryView>,
    pub engine: Arc<SyncEngine>,
    pub codes: Arc<WorkCodeCache>,
    pub controller: EditController,
}

impl Context {
    pub async fn new(config: Config, confirm: Arc<dyn Confirm>) -> Result<Self, Box<dyn Error>> {
        if let Some(dir) = &config.state_dir {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| format!("Failed to create state directory {}: {e}", dir.display()))?;
        }

        let store = LocalStore::open(config.state_db_path().as_deref()).await?;
        let client = ErpClient::new(config.api.clone())?;
        let session = Arc::new(Session::restore(client.clone(), store.clone()).await?);

        let view = Arc::new(MemoryView::new());
        let engine = Arc::new(
            SyncEngine::new(client.clone())
                .with_view(view.clone())
                .with_error_summary_len(config.error_summary_len),
        );
        let codes = Arc::new(WorkCodeCache::new(client));
        let controller = EditController::new(
            engine.clone(),
            codes.clone(),
            store.clone(),
            session.clone(),
            confirm,
            config.recent_capacity,
        );
        controller.load_recent().await;

        Ok(Self {
            config,
            store,
            session,
            view,
            engine,
            codes,
            controller,
        })
    }

    /// Fails unless a user is signed in.
    pub fn require_login(&self) -> Result<(), Box<dyn Error>> {
        match self.session.is_logged_in() {
            true => Ok(()),
            false => Err("Not logged in, run `workcal login` first".into()),
        }
    }

    /// Loads one day into the engine so its entries can be addressed by id.
    pub async fn load_day(&self, day: Date) -> Result<(), Box<dyn Error>> {
        self.require_login()?;
        self.controller
            .on_range_changed(day, day)
            .await
            .map_err(|e| e.banner().into())
    }

    pub async fn close(self) {
        self.store.close().await;
    }
}
