// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workcal_core::{AuthState, LocalStore, Session, SessionError};
use workcal_erp::{Credentials, ErpError};

use crate::common::{PATH_LIST, PATH_LOGIN, client_for, day};

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(PATH_LOGIN))
        .and(body_json(json!({"login": "olena", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Success": true,
            "Id": 42,
            "UserName": "Olena",
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(PATH_LOGIN))
        .and(body_json(json!({"login": "olena", "password": "wrong"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Success": false})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn session_login_persists_and_restores() {
    // Arrange
    let server = MockServer::start().await;
    mount_login(&server).await;
    let store = LocalStore::open(None).await.expect("Failed to open store");
    let session = Session::restore(client_for(&server), store.clone())
        .await
        .expect("Failed to restore session");
    assert!(!session.is_logged_in());

    // Act
    let identity = session
        .login(" olena ", "secret")
        .await
        .expect("Failed to log in");

    // Assert
    assert_eq!(identity.user_name, "Olena");
    assert!(session.is_logged_in());
    assert_eq!(session.user_name().as_deref(), Some("Olena"));
    let stored = store.auth().await.expect("Failed to read auth");
    assert_eq!(
        stored,
        Some(Credentials {
            user_id_coded: "NDI=".to_string(),
            user_name: "Olena".to_string(),
        })
    );

    let client = client_for(&server);
    let restored = Session::restore(client.clone(), store)
        .await
        .expect("Failed to restore session");
    assert!(restored.is_logged_in());
    assert_eq!(client.credentials().map(|a| a.user_name), Some("Olena".to_string()));
}

#[tokio::test]
async fn session_rejected_login_keeps_state() {
    // Arrange
    let server = MockServer::start().await;
    mount_login(&server).await;
    let store = LocalStore::open(None).await.expect("Failed to open store");
    let session = Session::restore(client_for(&server), store.clone())
        .await
        .expect("Failed to restore session");

    // Act
    let err = session.login("olena", "wrong").await.unwrap_err();

    // Assert
    match err {
        SessionError::Erp(ErpError::ApplicationFailure(reason)) => {
            assert_eq!(reason, "Invalid login or password");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!session.is_logged_in());
    assert_eq!(store.auth().await.expect("Failed to read auth"), None);
}

#[tokio::test]
async fn session_logout_clears_credentials() {
    // Arrange
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path(PATH_LIST))
        .and(query_param("UserName", "Olena"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let store = LocalStore::open(None).await.expect("Failed to open store");
    let client = client_for(&server);
    let session = Session::restore(client.clone(), store.clone())
        .await
        .expect("Failed to restore session");
    session
        .login("olena", "secret")
        .await
        .expect("Failed to log in");
    client
        .list_jobs(day(), day())
        .await
        .expect("Failed to list jobs");

    // Act
    session.logout().await.expect("Failed to log out");

    // Assert
    assert!(!session.is_logged_in());
    assert_eq!(session.user_name(), None);
    assert_eq!(client.credentials(), None);
    assert_eq!(store.auth().await.expect("Failed to read auth"), None);
}

#[tokio::test]
async fn session_ignores_invalid_stored_login() {
    // Arrange
    let server = MockServer::start().await;
    let store = LocalStore::open(None).await.expect("Failed to open store");
    store
        .set_auth(&Credentials {
            user_id_coded: "%%%".to_string(),
            user_name: "Olena".to_string(),
        })
        .await
        .expect("Failed to store auth");

    // Act
    let session = Session::restore(client_for(&server), store)
        .await
        .expect("Failed to restore session");

    // Assert
    assert!(!session.is_logged_in());
}
