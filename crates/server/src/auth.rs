use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use clockbill_core::AddonClaims;

/// Verified add-on token of the calling workspace
///
/// Usage in handlers:
/// ```ignore
/// async fn handler(auth: AddonAuth) -> Result<Json<Value>, ApiError> {
///     // auth.claims.workspace_id identifies the caller
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AddonAuth {
    pub claims: AddonClaims,
    /// Raw token, forwarded to Clockify as `X-Addon-Token`
    pub token: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AddonAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::MissingAuthorization)?;
        let claims = state.verifier.verify(token).await?;

        Ok(Self {
            claims,
            token: token.to_string(),
        })
    }
}
