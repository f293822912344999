pub mod household;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/household", household_routes())
        // Health check
        .route("/health", get(health))
}

fn household_routes() -> Router<AppState> {
    Router::new()
        .route("/io-re-ps", get(household::io_re_ps))
        .route("/demands-deployment", get(household::demands_deployment))
        .route("/sf-class", get(household::sf_class))
        .route("/revenue-c3mr", get(household::revenue_c3mr))
        .route("/revenue-c3mr-channel", get(household::revenue_c3mr_channel))
        .route("/funnel", get(household::funnel))
}

async fn health() -> &'static str {
    "OK"
}
