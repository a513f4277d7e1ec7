//! Common functions used across test cases.

use axum::http::StatusCode;
use axum_test_helper::TestClient;

/// A response status and its body, read as JSON when it is JSON.
pub struct Response {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

async fn read(response: axum_test_helper::TestResponse) -> Response {
    let status = response.status();
    let text = response.text().await;
    let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
    Response { status, body }
}

pub async fn get(client: &TestClient, url: &str) -> Response {
    read(client.get(url).send().await).await
}

pub async fn post(client: &TestClient, url: &str, body: serde_json::Value) -> Response {
    read(
        client
            .post(url)
            .body(body.to_string())
            .header("Content-Type", "application/json")
            .send()
            .await,
    )
    .await
}

pub async fn put(client: &TestClient, url: &str, body: serde_json::Value) -> Response {
    read(
        client
            .put(url)
            .body(body.to_string())
            .header("Content-Type", "application/json")
            .send()
            .await,
    )
    .await
}

pub async fn patch(client: &TestClient, url: &str, body: serde_json::Value) -> Response {
    read(
        client
            .patch(url)
            .body(body.to_string())
            .header("Content-Type", "application/json")
            .send()
            .await,
    )
    .await
}

pub async fn delete(client: &TestClient, url: &str) -> Response {
    read(client.delete(url).send().await).await
}
