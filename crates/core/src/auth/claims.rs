use serde::{Deserialize, Serialize};

/// Issuer every add-on token must carry
pub const EXPECTED_ISSUER: &str = "clockify";

/// Token type every add-on token must carry
pub const EXPECTED_TOKEN_TYPE: &str = "addon";

/// Claims of a Clockify add-on token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonClaims {
    #[serde(default)]
    pub iss: String,

    #[serde(rename = "type", default)]
    pub token_type: String,

    /// Add-on key from the manifest
    #[serde(default)]
    pub sub: String,

    pub workspace_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_url: Option<String>,

    /// Legacy name of `backendUrl` used by some environments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Another legacy name of `backendUrl`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl AddonClaims {
    /// Whether the token was issued by Clockify for an add-on
    #[must_use]
    pub fn is_addon_token(&self) -> bool {
        self.iss == EXPECTED_ISSUER && self.token_type == EXPECTED_TOKEN_TYPE
    }

    /// Backend API base URL, falling back to the legacy claim names
    #[must_use]
    pub fn backend_url(&self) -> Option<&str> {
        [&self.backend_url, &self.api_url, &self.backend]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/'))
    }

    /// Reports API base URL
    #[must_use]
    pub fn reports_url(&self) -> Option<&str> {
        self.reports_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: serde_json::Value) -> AddonClaims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_backend_url_fallbacks() {
        let c = claims(json!({
            "workspaceId": "ws",
            "backendUrl": "https://api.clockify.me/api/",
            "apiUrl": "https://legacy.example"
        }));
        assert_eq!(c.backend_url(), Some("https://api.clockify.me/api"));

        let c = claims(json!({ "workspaceId": "ws", "apiUrl": "https://legacy.example" }));
        assert_eq!(c.backend_url(), Some("https://legacy.example"));

        let c = claims(json!({ "workspaceId": "ws", "backendUrl": "", "backend": "https://b.example" }));
        assert_eq!(c.backend_url(), Some("https://b.example"));

        let c = claims(json!({ "workspaceId": "ws" }));
        assert_eq!(c.backend_url(), None);
    }

    #[test]
    fn test_is_addon_token() {
        let c = claims(json!({ "workspaceId": "ws", "iss": "clockify", "type": "addon" }));
        assert!(c.is_addon_token());

        let c = claims(json!({ "workspaceId": "ws", "iss": "someone", "type": "addon" }));
        assert!(!c.is_addon_token());

        let c = claims(json!({ "workspaceId": "ws", "iss": "clockify", "type": "user" }));
        assert!(!c.is_addon_token());

        let c = claims(json!({ "workspaceId": "ws" }));
        assert!(!c.is_addon_token());
    }
}
