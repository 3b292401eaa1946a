// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workcal_core::{EntryId, ErrorKind, SyncError};
use workcal_erp::JobId;

use crate::common::{
    PATH_CREATE, PATH_DELETE, PATH_UPDATE, day, draft_entry, engine_for, job_record,
    mount_failure, mount_range,
};

fn confirmed(id: u64) -> EntryId {
    EntryId::Confirmed(JobId::new(id).expect("Failed to build job id"))
}

#[tokio::test]
async fn update_success_applies_fields_and_server_codes() {
    // Arrange
    let server = MockServer::start().await;
    mount_range(&server, json!([job_record(7, "09:00", "10:00")])).await;
    Mock::given(method("POST"))
        .and(path(PATH_UPDATE))
        .and(body_partial_json(json!({"Record": {"id": 7, "description": "Audit"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Success": true,
            "PluObj": {"objCode": "OB2", "kzajCode": ""},
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (engine, _view) = engine_for(&server);
    engine
        .reconcile_after_range_change(day(), day())
        .await
        .expect("Failed to load range");

    // Act
    let mut entry = engine.entry(&confirmed(7)).expect("entry should be loaded");
    entry.description = "Audit".to_string();
    let updated = engine.submit_update(entry).await;

    // Assert
    assert!(updated.is_some());
    let entry = engine.entry(&confirmed(7)).unwrap();
    assert_eq!(entry.description, "Audit");
    assert_eq!(entry.obj_code, "OB2");
    assert_eq!(entry.task_code, "TK", "empty codes must not overwrite");
    assert!(!entry.errors.any());
    assert!(!engine.is_saving(&entry.id));
}

#[tokio::test]
async fn update_failure_keeps_attempted_values() {
    // Arrange
    let server = MockServer::start().await;
    mount_range(&server, json!([job_record(7, "09:00", "10:00")])).await;
    mount_failure(&server, "POST", PATH_UPDATE, "Period is closed").await;
    let (engine, view) = engine_for(&server);
    engine
        .reconcile_after_range_change(day(), day())
        .await
        .expect("Failed to load range");

    // Act
    let mut entry = engine.entry(&confirmed(7)).unwrap();
    entry.end = day().at(11, 15, 0, 0);
    entry.description = "Longer review".to_string();
    let updated = engine.submit_update(entry).await;

    // Assert
    assert_eq!(updated, None);
    let entry = engine.entry(&confirmed(7)).unwrap();
    assert_eq!(entry.end, day().at(11, 15, 0, 0));
    assert_eq!(entry.description, "Longer review");
    let slot = entry.errors.get(ErrorKind::Update);
    assert!(slot.full.contains("Period is closed"), "{slot:?}");
    assert!(!engine.is_saving(&entry.id));

    let item = view
        .items()
        .into_iter()
        .find(|a| a.id == "7")
        .expect("item should be rendered");
    assert_eq!(item.end, day().at(11, 15, 0, 0));
    assert!(!item.saving);
}

#[tokio::test]
async fn update_retry_success_clears_previous_failure() {
    // Arrange
    let server = MockServer::start().await;
    mount_range(&server, json!([job_record(7, "09:00", "10:00")])).await;
    Mock::given(method("POST"))
        .and(path(PATH_UPDATE))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"MessageError": "Period is closed"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PATH_UPDATE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let (engine, view) = engine_for(&server);
    engine
        .reconcile_after_range_change(day(), day())
        .await
        .expect("Failed to load range");
    let mut entry = engine.entry(&confirmed(7)).unwrap();
    entry.description = "Audit".to_string();
    let failed = engine.submit_update(entry).await;
    let failed_entry = engine.entry(&confirmed(7)).unwrap();

    // Act
    let retried = engine.submit_update(failed_entry.clone()).await;

    // Assert
    assert_eq!(failed, None);
    assert!(!failed_entry.errors.get(ErrorKind::Update).is_empty());
    assert!(retried.is_some());
    let entry = engine.entry(&confirmed(7)).unwrap();
    assert_eq!(entry.description, "Audit");
    assert!(entry.errors.get(ErrorKind::Update).is_empty());
    assert!(!entry.errors.any());
    assert!(!engine.is_saving(&entry.id));
    let item = view
        .items()
        .into_iter()
        .find(|a| a.id == "7")
        .expect("item should be rendered");
    assert!(!item.saving);
}

#[tokio::test]
async fn update_outside_loaded_range_is_not_added() {
    // Arrange
    let server = MockServer::start().await;
    mount_range(&server, json!([job_record(7, "09:00", "10:00")])).await;
    Mock::given(method("POST"))
        .and(path(PATH_UPDATE))
        .and(body_partial_json(json!({"Record": {"id": 8}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let (engine, view) = engine_for(&server);
    engine
        .reconcile_after_range_change(day(), day())
        .await
        .expect("Failed to load range");
    let later = day().tomorrow().expect("Failed to get next day");
    let mut entry = draft_entry();
    entry.id = confirmed(8);
    entry.start = later.at(9, 0, 0, 0);
    entry.end = later.at(10, 0, 0, 0);

    // Act
    let updated = engine.submit_update(entry).await;

    // Assert
    assert!(updated.is_some());
    assert_eq!(engine.entry(&confirmed(8)), None);
    assert_eq!(engine.entries().len(), 1);
    assert!(!engine.is_saving(&confirmed(8)));
    assert!(view.items().iter().all(|a| a.id != "8"));
}

#[tokio::test]
async fn update_of_temporary_entry_records_error_without_request() {
    // Arrange
    let server = MockServer::start().await;
    mount_failure(&server, "POST", PATH_CREATE, "nope").await;
    Mock::given(method("POST"))
        .and(path(PATH_UPDATE))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let (engine, _view) = engine_for(&server);
    engine.submit_create(draft_entry()).await;
    let temp = engine.entries().remove(0);

    // Act
    let updated = engine.submit_update(temp.clone()).await;

    // Assert
    assert_eq!(updated, None);
    let entry = engine.entry(&temp.id).unwrap();
    assert!(!entry.errors.get(ErrorKind::Update).is_empty());
    assert!(!entry.errors.get(ErrorKind::Create).is_empty());
}

#[tokio::test]
async fn delete_success_removes_entry() {
    // Arrange
    let server = MockServer::start().await;
    mount_range(&server, json!([job_record(7, "09:00", "10:00")])).await;
    Mock::given(method("POST"))
        .and(path(PATH_DELETE))
        .and(query_param("Id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let (engine, view) = engine_for(&server);
    engine
        .reconcile_after_range_change(day(), day())
        .await
        .expect("Failed to load range");

    // Act
    let result = engine.submit_delete(&confirmed(7)).await;

    // Assert
    assert!(result.is_ok(), "{result:?}");
    assert!(engine.entries().is_empty());
    assert!(view.items().is_empty());
}

#[tokio::test]
async fn delete_failure_keeps_entry_and_reports_error() {
    // Arrange
    let server = MockServer::start().await;
    mount_range(&server, json!([job_record(7, "09:00", "10:00")])).await;
    mount_failure(&server, "POST", PATH_DELETE, "Entry is locked").await;
    let (engine, view) = engine_for(&server);
    engine
        .reconcile_after_range_change(day(), day())
        .await
        .expect("Failed to load range");

    // Act
    let result = engine.submit_delete(&confirmed(7)).await;

    // Assert
    let err = result.unwrap_err();
    assert!(matches!(err, SyncError::Erp(_)), "{err:?}");
    let entry = engine.entry(&confirmed(7)).expect("entry must survive");
    assert!(entry.errors.get(ErrorKind::Delete).full.contains("Entry is locked"));
    assert!(!engine.is_saving(&entry.id));
    assert_eq!(view.items().len(), 1);
}

#[tokio::test]
async fn delete_rejects_unknown_and_temporary_entries() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PATH_DELETE))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let (engine, _view) = engine_for(&server);

    // Act
    let unknown = engine.submit_delete(&confirmed(99)).await;
    let temp = engine.submit_delete(&draft_entry().id).await;

    // Assert
    assert!(matches!(unknown, Err(SyncError::NotFound(_))), "{unknown:?}");
    assert!(matches!(temp, Err(SyncError::NotConfirmed(_))), "{temp:?}");
}
