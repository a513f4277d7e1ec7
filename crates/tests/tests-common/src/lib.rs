//! Common functions used across test cases.

use std::path::PathBuf;

use axum_test_helper::TestClient;

use rest_store::routes;
use rest_store::state::{self, SeedData, ServerState};

/// The directory of the test configuration and its data.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Creates a fresh state from the test configuration, seeded with the test data.
pub async fn create_state() -> anyhow::Result<ServerState> {
    let _ = env_logger::builder().is_test(true).try_init();

    let parsed_configuration =
        rest_store_configuration::parse_configuration(fixtures_dir().join("configuration"))
            .await?;
    let configuration = rest_store_configuration::make_runtime_configuration(parsed_configuration)?;

    let data = tokio::fs::read_to_string(fixtures_dir().join("data.json")).await?;
    let seed: SeedData = serde_json::from_str(&data)?;

    Ok(state::create_state(configuration, seed).await?)
}

/// Creates a router with a fresh state from the test configuration.
pub async fn create_router() -> axum::Router {
    let state = create_state()
        .await
        .expect("unable to create the test state");
    routes::create_router(state)
}

/// Creates a client for a router with a fresh state.
pub async fn create_client() -> TestClient {
    TestClient::new(create_router().await)
}
