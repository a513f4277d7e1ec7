mod delete_record;
mod delete_records;
mod get_health;
mod get_metrics;
mod get_record;
mod get_records;
mod post_records;
mod put_record;
mod put_records;

use axum::{
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};

use crate::state::ServerState;

pub use delete_record::delete_record;
pub use delete_records::delete_records;
pub use get_health::get_health;
pub use get_metrics::get_metrics;
pub use get_record::get_record;
pub use get_records::get_records;
pub use post_records::post_records;
pub use put_record::put_record;
pub use put_records::put_records;

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/metrics", get(get_metrics))
        .route(
            "/:path",
            get(get_records)
                .post(post_records)
                .put(put_records)
                .patch(put_records)
                .delete(delete_records),
        )
        .route(
            "/:path/:id",
            get(get_record)
                .put(put_record)
                .patch(put_record)
                .delete(delete_record),
        )
        .layer(middleware::from_fn_with_state(state.clone(), count_errors))
        .with_state(state)
}

async fn count_errors<B>(
    State(state): State<ServerState>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    let response = next.run(request).await;
    if response.status().is_client_error() || response.status().is_server_error() {
        state.metrics.error_total.inc();
    }
    response
}
