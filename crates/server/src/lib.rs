mod auth;
mod config;
mod error;
mod routes;
mod state;

pub use auth::AddonAuth;
pub use config::{AuthConfig, ClockifyConfig, Config, DatabaseConfig, InstallationConfig, ServerConfig, TrialConfig};
pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// HTTP routes of the add-on backend
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/clients", get(routes::clients::list_clients))
        .route("/reports", post(routes::reports::generate_report))
        .route("/lifecycle/installed", post(routes::lifecycle::installed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
