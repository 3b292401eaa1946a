// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workcal_core::{WorkCodeCache, label};

use crate::common::{PATH_WORK_CODES, client_for};

#[tokio::test]
async fn lookup_resolves_exact_code_once_then_from_cache() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_WORK_CODES))
        .and(query_param("kpld", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"kpld": 41, "npld": "Planning", "pldObjCode": "OB", "pldKzaj": "PL"},
            {"kpld": 42, "npld": "Support", "pldObjCode": "OB", "pldKzaj": "TK"},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let cache = WorkCodeCache::new(client_for(&server));

    // Act
    let first = cache.resolve_by_code("42").await;
    let second = cache.resolve_by_code(" 42 ").await;

    // Assert
    let item = first.expect("code should resolve");
    assert_eq!(item.code, 42);
    assert_eq!(item.name, "Support");
    assert_eq!(second, Some(item.clone()));
    assert_eq!(label(&item), "42  OB  TK — Support");
    assert!(cache.cached(41).is_some(), "every hit is cached");
}

#[tokio::test]
async fn lookup_falls_back_to_text_search() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_WORK_CODES))
        .and(query_param("kpld", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PATH_WORK_CODES))
        .and(query_param("q", "77"))
        .and(query_param("kpld", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"kpld": 77, "npld": "Training"},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let cache = WorkCodeCache::new(client_for(&server));

    // Act
    let item = cache.resolve_by_code("77").await;

    // Assert
    let item = item.expect("code should resolve");
    assert_eq!(item.code, 77);
    assert_eq!(item.name, "Training");
}

#[tokio::test]
async fn lookup_fuzzy_text_hit_does_not_stand_in_for_code() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_WORK_CODES))
        .and(query_param("kpld", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PATH_WORK_CODES))
        .and(query_param("q", "500"))
        .and(query_param("kpld", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"kpld": 1500, "npld": "Other"},
        ])))
        .mount(&server)
        .await;
    let cache = WorkCodeCache::new(client_for(&server));

    // Act
    let item = cache.resolve_by_code("500").await;

    // Assert
    let item = item.expect("placeholder expected");
    assert_eq!(item.code, 500);
    assert!(item.name.is_empty());
    assert_eq!(cache.cached(500), None);
    assert_eq!(cache.cached(1500).map(|a| a.name), Some("Other".to_string()));
}

#[tokio::test]
async fn lookup_unknown_code_yields_uncached_placeholder() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_WORK_CODES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let cache = WorkCodeCache::new(client_for(&server));

    // Act
    let item = cache.resolve_by_code("500").await;

    // Assert
    let item = item.expect("placeholder expected");
    assert_eq!(item.code, 500);
    assert!(item.name.is_empty());
    assert!(item.obj_code.is_empty());
    assert!(item.task_code.is_empty());
    assert_eq!(cache.cached(500), None);
    assert_eq!(cache.resolve_by_code("0").await, None);
    assert_eq!(cache.resolve_by_code("abc").await, None);
}

#[tokio::test]
async fn lookup_search_failure_is_reported() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_WORK_CODES))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"MessageError": "down"})))
        .mount(&server)
        .await;
    let cache = WorkCodeCache::new(client_for(&server));

    // Act
    let search = cache.search_by_text("supp").await;
    let resolved = cache.resolve_by_code("42").await;

    // Assert
    assert!(search.is_err());
    assert_eq!(resolved.map(|a| a.code), Some(42), "lookup degrades to a placeholder");
}
