mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{delete, get, patch, post, put};

#[tokio::test]
async fn create_with_a_sequence_key() {
    let client = tests_common::create_client().await;

    let res = post(&client, "/tenants", json!({ "name": "delta", "unknown": true })).await;
    assert_eq!(res.status, StatusCode::OK);
    // seeded tenants use keys up to 3
    assert_eq!(res.body, json!(4));

    let res = get(&client, "/tenants/4").await;
    assert_eq!(res.body, json!({ "id": 4, "name": "delta" }));
}

#[tokio::test]
async fn create_a_batch_keeps_supplied_keys() {
    let client = tests_common::create_client().await;

    let res = post(
        &client,
        "/users",
        json!([
            { "loginId": "eve", "tenantId": 1 },
            { "id": "custom", "loginId": "fay", "tenantId": 2 }
        ]),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    let keys = res.body.as_array().cloned().unwrap_or_default();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].as_str().map(str::len), Some(36));
    assert_eq!(keys[1], json!("custom"));

    let res = get(&client, "/users/custom?fields=loginId,tenant.name").await;
    assert_eq!(res.body, json!({ "loginId": "fay", "tenant": { "name": "bolt" } }));

    let res = get(&client, "/metrics").await;
    let text = res.body.as_str().unwrap_or_default().to_string();
    assert!(
        text.contains("rest_store_generated_identifiers_total 2"),
        "{text}"
    );
}

#[tokio::test]
async fn create_a_duplicate_key_fails() {
    let client = tests_common::create_client().await;

    let res = post(&client, "/users", json!({ "id": "u1", "loginId": "again" })).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);

    // nothing of a failed batch is written
    let res = post(
        &client,
        "/users",
        json!([{ "id": "u9", "loginId": "new" }, { "id": "u2", "loginId": "again" }]),
    )
    .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    let res = get(&client, "/users/u9").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_are_rejected() {
    let client = tests_common::create_client().await;
    let res = post(&client, "/users", json!(42)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_by_route_key() {
    let client = tests_common::create_client().await;

    let res = put(&client, "/users/u1", json!({ "id": "u7", "nickname": "annie" })).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!("ok"));

    let res = get(&client, "/users/u1?fields=id,nickname,age").await;
    assert_eq!(res.body, json!({ "id": "u1", "nickname": "annie", "age": 30 }));
}

#[tokio::test]
async fn update_by_record_keys() {
    let client = tests_common::create_client().await;

    let res = put(
        &client,
        "/tenants",
        json!([{ "id": 2, "name": "bolts" }, { "id": 3, "name": "acorns" }]),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = get(&client, "/tenants?fields=name").await;
    assert_eq!(
        res.body,
        json!([{ "name": "acme" }, { "name": "bolts" }, { "name": "acorns" }])
    );

    let res = put(&client, "/tenants", json!({ "name": "nobody" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn readonly_entities_reject_mutations() {
    let client = tests_common::create_client().await;

    let res = post(&client, "/regions", json!({ "code": "ap", "name": "Asia Pacific" })).await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);

    let res = put(&client, "/regions/eu", json!({ "name": "Europa" })).await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);

    let res = delete(&client, "/regions/eu").await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);

    let res = get(&client, "/regions/eu").await;
    assert_eq!(res.body, json!({ "code": "eu", "name": "Europe" }));
}

#[tokio::test]
async fn delete_needs_a_removable_entity() {
    let client = tests_common::create_client().await;

    let res = delete(&client, "/tenants/3").await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);

    let res = delete(&client, "/users/u3").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!("ok"));

    let res = get(&client, "/users/u3").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_by_conditions() {
    let client = tests_common::create_client().await;

    let res = delete(&client, "/users?age=(20,35)").await;
    assert_eq!(res.status, StatusCode::OK);

    let res = get(&client, "/users?fields=loginId").await;
    assert_eq!(res.body, json!([{ "loginId": "dee" }]));
}

#[tokio::test]
async fn delete_with_an_association_condition() {
    let client = tests_common::create_client().await;

    let res = get(&client, "/users?fields=loginId&tenant.name=nobody").await;
    assert_eq!(res.body, json!([]));

    let res = delete(&client, "/users?tenant.name=nobody").await;
    assert_eq!(res.status, StatusCode::OK);

    let res = get(&client, "/users?fields=loginId").await;
    assert_eq!(res.body.as_array().map(Vec::len), Some(3));

    let res = delete(&client, "/users?tenant.name=ac*").await;
    assert_eq!(res.status, StatusCode::OK);

    let res = get(&client, "/users?fields=loginId").await;
    assert_eq!(res.body, json!([{ "loginId": "ann" }]));
}

#[tokio::test]
async fn only_listed_methods_are_served() {
    let client = tests_common::create_client().await;

    let res = get(&client, "/notes/1").await;
    assert_eq!(res.body, json!({ "id": 1, "text": "hello" }));

    let res = post(&client, "/notes", json!({ "id": 2, "text": "again" })).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = patch(&client, "/notes/2", json!({ "text": "edited" })).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = put(&client, "/notes/2", json!({ "text": "replaced" })).await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);

    let res = delete(&client, "/notes/1").await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);

    let res = delete(&client, "/notes?text=hello").await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);

    let res = get(&client, "/notes?fields=text").await;
    assert_eq!(res.body, json!([{ "text": "hello" }, { "text": "edited" }]));
}
