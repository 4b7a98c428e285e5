use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clockbill_core::report::PaypalLinkError;
use clockbill_core::{AuthError, ClockifyError, InstallationError, ReportError, TrialError};
use clockbill_db::DbError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authorization header missing or malformed")]
    MissingAuthorization,

    #[error("invalid token: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("{0}")]
    BadRequest(String),

    #[error("trial limit of {limit} downloads reached")]
    TrialLimitReached { limit: i64 },

    #[error("installation record missing for workspace {0}")]
    MissingInstallation(String),

    #[error("installation failed: {0}")]
    Installation(InstallationError),

    #[error("report failed: {0}")]
    Report(#[from] ReportError),

    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl From<TrialError> for ApiError {
    fn from(err: TrialError) -> Self {
        match err {
            TrialError::LimitReached { limit } => Self::TrialLimitReached { limit },
            TrialError::MissingInstallation(workspace_id) => Self::MissingInstallation(workspace_id),
            TrialError::Db(e) => Self::Database(e),
        }
    }
}

impl From<InstallationError> for ApiError {
    fn from(err: InstallationError) -> Self {
        match err {
            InstallationError::MissingField(field) => {
                Self::BadRequest(format!("Missing required field: {field}"))
            }
            InstallationError::Db(DbError::InvalidWorkspaceId(msg)) => {
                Self::BadRequest(format!("Invalid workspaceId: {msg}"))
            }
            other => Self::Installation(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PaypalLinkError> for ApiError {
    fn from(err: PaypalLinkError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Authorization header missing or malformed" }),
            ),
            ApiError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid or expired token." }),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::TrialLimitReached { limit } => (
                StatusCode::FORBIDDEN,
                json!({
                    "error": "Trial limit reached",
                    "message": format!(
                        "You hit the limit of {limit} PDF downloads. Subscribe to the paid version to continue."
                    ),
                }),
            ),
            ApiError::MissingInstallation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Installation record missing" }),
            ),
            ApiError::Installation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to save installation" }),
            ),
            ApiError::Report(ReportError::Clockify(ClockifyError::Status { status, .. })) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("Clockify API returned status {status}") }),
            ),
            ApiError::Report(ReportError::MissingUrl(what)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("Token does not carry a {what}") }),
            ),
            // Transport errors name the upstream URL; only the log gets them.
            ApiError::Report(ReportError::Clockify(ClockifyError::Request(_))) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to fetch data from Clockify" }),
            ),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_auth_errors_are_opaque() {
        let (status, body) = body_of(ApiError::Unauthorized(AuthError::UnknownKey("k".into()))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Invalid or expired token." }));

        let (status, body) = body_of(ApiError::MissingAuthorization).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authorization header missing or malformed");
    }

    #[tokio::test]
    async fn test_trial_limit_body() {
        let (status, body) = body_of(TrialError::LimitReached { limit: 3 }.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Trial limit reached");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("You hit the limit of 3 PDF downloads."));
        assert_eq!(
            body["message"],
            "You hit the limit of 3 PDF downloads. Subscribe to the paid version to continue."
        );
    }

    #[tokio::test]
    async fn test_upstream_transport_details_are_not_leaked() {
        let transport = reqwest::Client::new()
            .get("http://127.0.0.1:1/api/v1/workspaces/ws-secret/clients")
            .send()
            .await
            .unwrap_err();
        let err: ApiError = ReportError::Clockify(ClockifyError::Request(transport)).into();

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch data from Clockify" }));
    }

    #[tokio::test]
    async fn test_store_details_are_not_leaked() {
        let err: ApiError = TrialError::Db(DbError::NotFound("ws-secret".into())).into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("ws-secret"));
    }

    #[tokio::test]
    async fn test_installation_validation_is_bad_request() {
        let err: ApiError = InstallationError::MissingField("authToken").into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: authToken");
    }
}
