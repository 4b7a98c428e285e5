use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Add-on installation for a single workspace
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Installation {
    pub workspace_id: String,
    /// Encrypted installation token as stored (JSON envelope)
    pub installation_token: String,
    pub pdf_downloads_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
