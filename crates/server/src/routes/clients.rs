use crate::auth::AddonAuth;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

/// `GET /clients`: the workspace's active clients, as Clockify returns them
pub async fn list_clients(
    State(state): State<AppState>,
    auth: AddonAuth,
) -> Result<Json<Value>, ApiError> {
    let clients = state.reports.clients(&auth.claims, &auth.token).await?;
    Ok(Json(clients))
}
