// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use wiremock::MockServer;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};
use workcal_core::{EntryId, ErrorKind};
use workcal_erp::JobId;

use crate::common::{PATH_CREATE, draft_entry, engine_for, mount_create_ok};

#[tokio::test]
async fn create_replaces_temporary_entry_with_server_id() {
    // Arrange
    let server = MockServer::start().await;
    mount_create_ok(&server, 9001, Duration::ZERO).await;
    let (engine, view) = engine_for(&server);

    // Act
    let id = engine.submit_create(draft_entry()).await;

    // Assert
    let id = id.expect("create should succeed");
    assert_eq!(id, JobId::new(9001).unwrap());

    let entries = engine.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, EntryId::Confirmed(id));
    assert_eq!(entries[0].obj_code, "OB");
    assert_eq!(entries[0].task_code, "TK");
    assert!(!entries[0].pending_create);
    assert!(!engine.is_saving(&entries[0].id));

    let items = view.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "9001");
    assert!(!items[0].saving);
}

#[tokio::test]
async fn create_failure_keeps_temporary_entry_with_error() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PATH_CREATE))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "MessageError": "Database is down",
        })))
        .mount(&server)
        .await;
    let (engine, view) = engine_for(&server);

    // Act
    let id = engine.submit_create(draft_entry()).await;

    // Assert
    assert_eq!(id, None);
    let entries = engine.entries();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert!(entry.id.is_local());
    assert!(!entry.pending_create);
    assert!(entry.errors.get(ErrorKind::Create).full.contains("Database is down"));
    assert_eq!(entry.description, "Review");

    let items = view.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, entry.id.to_string());
    assert!(items[0].errors.as_ref().is_some_and(|e| e.any()));
}

#[tokio::test]
async fn create_resubmission_reuses_temporary_entry() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PATH_CREATE))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_create_ok(&server, 9001, Duration::ZERO).await;
    let (engine, view) = engine_for(&server);

    let first = engine.submit_create(draft_entry()).await;
    assert_eq!(first, None);
    let mut failed = engine.entries().remove(0);
    let temp_id = failed.id.clone();

    // Act
    failed.description = "Review, second try".to_string();
    let second = engine.submit_create(failed).await;

    // Assert
    assert_eq!(second, JobId::new(9001));
    let entries = engine.entries();
    assert_eq!(entries.len(), 1, "resubmission must not duplicate the entry");
    assert_eq!(entries[0].id.server_id(), JobId::new(9001));
    assert_eq!(entries[0].description, "Review, second try");
    assert!(!entries[0].errors.any());

    let items = view.items();
    assert_eq!(items.len(), 1);
    assert!(items.iter().all(|a| a.id != temp_id.to_string()));
}

#[tokio::test]
async fn create_zero_id_is_a_failure() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PATH_CREATE))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"Success": true, "Id": 0})),
        )
        .mount(&server)
        .await;
    let (engine, _view) = engine_for(&server);

    // Act
    let id = engine.submit_create(draft_entry()).await;

    // Assert
    assert_eq!(id, None);
    let entries = engine.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].id.is_local());
    assert!(!entries[0].errors.get(ErrorKind::Create).is_empty());
}

#[tokio::test]
async fn create_discarded_locally_without_request() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PATH_CREATE))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let (engine, view) = engine_for(&server);
    engine.submit_create(draft_entry()).await;
    let EntryId::Local(temp) = engine.entries()[0].id.clone() else {
        panic!("entry should be local");
    };

    // Act
    let removed = engine.discard_local(&temp);

    // Assert
    assert!(removed);
    assert!(engine.entries().is_empty());
    assert!(view.items().is_empty());
    assert!(!engine.discard_local(&temp));
}
