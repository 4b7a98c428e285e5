use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledEvent {
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub auth_token: String,
}

/// `POST /lifecycle/installed`: store the workspace's installation token
pub async fn installed(
    State(state): State<AppState>,
    payload: Result<Json<InstalledEvent>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(event) = payload?;
    state
        .installations
        .install(&event.workspace_id, &event.auth_token)
        .await?;
    Ok(Json(json!({ "message": "Installation successful." })))
}
