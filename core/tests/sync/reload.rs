// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workcal_core::{ItemKind, LoadError, MarkerKind, SyncEngine};
use workcal_erp::{ErpConfig, JobId};

use crate::common::{
    PATH_ATTENDANCE, PATH_LIST, client_with, day, draft_entry, engine_for, job_record,
    mount_create_ok, mount_range,
};

#[tokio::test]
async fn reload_replaces_entries_and_markers() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_LIST))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            job_record(7, "09:00", "10:00"),
            job_record(8, "12:00", "12:00"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PATH_ATTENDANCE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"DateFrom": "2025-01-10T08:55:00", "DateTo": "2025-01-10T17:10:00"},
        ])))
        .mount(&server)
        .await;
    let (engine, view) = engine_for(&server);

    // Act
    let result = engine.reconcile_after_range_change(day(), day()).await;

    // Assert
    assert!(result.is_ok(), "{result:?}");
    let entries = engine.entries();
    assert_eq!(entries.len(), 1, "zero-length records are dropped");
    assert_eq!(entries[0].id.server_id(), JobId::new(7));
    assert_eq!(engine.range(), Some((day(), day())));

    let markers = engine.markers();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].kind, MarkerKind::CheckIn);
    assert_eq!(markers[0].at, day().at(8, 55, 0, 0));
    assert_eq!(markers[1].kind, MarkerKind::CheckOut);

    let items = view.items();
    assert_eq!(items.len(), 3);
    assert!(
        items
            .iter()
            .filter(|a| matches!(a.kind, ItemKind::Marker(_)))
            .all(|a| !a.editable)
    );
}

#[tokio::test]
async fn reload_failure_keeps_previous_entries() {
    // Arrange
    let server = MockServer::start().await;
    mount_range(&server, json!([job_record(7, "09:00", "10:00")])).await;
    let (engine, view) = engine_for(&server);
    engine
        .reconcile_after_range_change(day(), day())
        .await
        .expect("Failed to load range");

    server.reset().await;
    Mock::given(method("GET"))
        .and(path(PATH_LIST))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PATH_ATTENDANCE))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    // Act
    let next = day().tomorrow().expect("Failed to get next day");
    let err = engine
        .reconcile_after_range_change(next, next)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, LoadError::Other(_)), "{err:?}");
    assert!(err.banner().contains("previously loaded"));
    assert_eq!(engine.entries().len(), 1);
    assert_eq!(engine.range(), Some((day(), day())));
    assert_eq!(view.items().len(), 1);
}

#[tokio::test]
async fn reload_timeout_is_reported_as_timeout() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_LIST))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PATH_ATTENDANCE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let config = ErpConfig {
        load_timeout_secs: 1,
        ..Default::default()
    };
    let engine = SyncEngine::new(client_with(&server, config));

    // Act
    let err = engine
        .reconcile_after_range_change(day(), day())
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, LoadError::Timeout(_)), "{err:?}");
}

#[tokio::test]
async fn reload_in_flight_does_not_wipe_optimistic_create() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_LIST))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PATH_ATTENDANCE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    mount_create_ok(&server, 9001, Duration::from_millis(300)).await;
    let (engine, view) = engine_for(&server);

    // Act
    let reload = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.reconcile_after_range_change(day(), day()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let create = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.submit_create(draft_entry()).await })
    };

    reload
        .await
        .expect("Failed to join reload")
        .expect("Failed to reload");
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Assert
    let entries = engine.entries();
    assert_eq!(entries.len(), 1, "temporary entry must survive the reload");
    assert!(entries[0].id.is_local());
    assert!(entries[0].pending_create);

    let id = create.await.expect("Failed to join create");
    assert_eq!(id, JobId::new(9001));
    let entries = engine.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id.server_id(), JobId::new(9001));
    assert_eq!(view.items().len(), 1);
}

#[tokio::test]
async fn settle_waits_for_reload_and_clear_empties_everything() {
    // Arrange
    let server = MockServer::start().await;
    mount_range(&server, json!([job_record(7, "09:00", "10:00")])).await;
    let (engine, view) = engine_for(&server);
    let reload = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.reconcile_after_range_change(day(), day()).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Act
    engine.settle_range_load().await;
    let loaded = engine.entries().len();
    engine.clear().await;

    // Assert
    reload
        .await
        .expect("Failed to join reload")
        .expect("Failed to reload");
    assert_eq!(loaded, 1);
    assert!(engine.entries().is_empty());
    assert!(engine.markers().is_empty());
    assert_eq!(engine.range(), None);
    assert!(view.items().is_empty());
}
