// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for integration tests.
//!
//! Helpers to mount ERP endpoints on a mock server and to build engines,
//! controllers and entries on top of it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use jiff::civil::{self, Date};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workcal_core::{
    AuthState, Confirm, EditController, Entry, LocalStore, MemoryView, SyncEngine, WorkCodeCache,
};
use workcal_erp::{ErpClient, ErpConfig};

pub const PATH_LIST: &str = "/ws/api/_PLUTEST_GET";
pub const PATH_ATTENDANCE: &str = "/ws/api/_PLUTEST_GETSKD";
pub const PATH_WORK_CODES: &str = "/ws/api/_PLUTEST_GETPLD";
pub const PATH_CREATE: &str = "/ws/api/_PLUTEST_ADD";
pub const PATH_UPDATE: &str = "/ws/api/_PLUTEST_UPD";
pub const PATH_DELETE: &str = "/ws/api/_PLUTEST_DEL";
pub const PATH_LOGIN: &str = "/ws/api/LOGIN";

/// The day most tests work on.
pub fn day() -> Date {
    civil::date(2025, 1, 10)
}

/// Creates a client for the mock server.
pub fn client_for(server: &MockServer) -> ErpClient {
    client_with(server, ErpConfig::default())
}

/// Creates a client for the mock server with custom settings.
pub fn client_with(server: &MockServer, config: ErpConfig) -> ErpClient {
    let config = ErpConfig {
        base_url: server.uri(),
        ..config
    };
    ErpClient::new(config).expect("Failed to create client")
}

/// Creates an engine rendering into a fresh in-memory view.
pub fn engine_for(server: &MockServer) -> (Arc<SyncEngine>, Arc<MemoryView>) {
    let view = Arc::new(MemoryView::new());
    let engine = SyncEngine::new(client_for(server)).with_view(view.clone());
    (Arc::new(engine), view)
}

/// An unsaved entry on [`day`] from 09:00 to 10:30.
pub fn draft_entry() -> Entry {
    let mut entry = Entry::draft(day().at(9, 0, 0, 0), day().at(10, 30, 0, 0));
    entry.work_code = Some(42);
    entry.description = "Review".to_string();
    entry.place_of_work = "Office".to_string();
    entry
}

/// A list record as the server returns it.
pub fn job_record(id: u64, from: &str, to: &str) -> Value {
    json!({
        "id": id,
        "date": "2025-01-10",
        "time_from": from,
        "time_to": to,
        "kpld": 42,
        "description": "Review",
        "objCode": "OB",
        "kzajCode": "TK",
        "placeWork": "Office",
    })
}

/// Mounts the list endpoints with the given jobs and no attendance.
pub async fn mount_range(server: &MockServer, jobs: Value) {
    Mock::given(method("GET"))
        .and(path(PATH_LIST))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(PATH_ATTENDANCE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

/// Mounts a successful create returning `id`.
pub async fn mount_create_ok(server: &MockServer, id: u64, delay: Duration) {
    Mock::given(method("POST"))
        .and(path(PATH_CREATE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "Success": true,
                    "Id": id,
                    "PluObj": {"objCode": "OB", "kzajCode": "TK"},
                }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Mounts an endpoint that fails with HTTP 500 and a server message.
pub async fn mount_failure(server: &MockServer, verb: &str, at: &str, message: &str) {
    Mock::given(method(verb))
        .and(path(at))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"MessageError": message})))
        .mount(server)
        .await;
}

/// Login state switch.
#[derive(Debug)]
pub struct FakeAuth(pub AtomicBool);

impl FakeAuth {
    pub fn new(logged_in: bool) -> Arc<Self> {
        Arc::new(Self(AtomicBool::new(logged_in)))
    }

    pub fn set(&self, logged_in: bool) {
        self.0.store(logged_in, Ordering::SeqCst);
    }
}

impl AuthState for FakeAuth {
    fn is_logged_in(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Prompt with a fixed answer.
#[derive(Debug)]
pub struct FixedConfirm(pub bool);

#[async_trait::async_trait]
impl Confirm for FixedConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// Builds a controller over an in-memory store.
pub async fn controller_for(
    engine: Arc<SyncEngine>,
    auth: Arc<FakeAuth>,
    confirm: bool,
) -> (EditController, LocalStore) {
    let store = LocalStore::open(None).await.expect("Failed to open store");
    let codes = Arc::new(WorkCodeCache::new(engine.client().clone()));
    let controller = EditController::new(
        engine,
        codes,
        store.clone(),
        auth,
        Arc::new(FixedConfirm(confirm)),
        10,
    );
    (controller, store)
}
