use crate::error::{validate_workspace_id, DbError, Result};
use crate::models::Installation;
use crate::Database;

/// Repository for installation records and their download counters
pub struct InstallationRepository<'a> {
    db: &'a Database,
}

impl<'a> InstallationRepository<'a> {
    /// Create a new `InstallationRepository`
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert or replace the installation token for a workspace
    ///
    /// An existing record keeps its download counter and creation time.
    pub async fn upsert(&self, workspace_id: &str, installation_token: &str) -> Result<Installation> {
        validate_workspace_id(workspace_id)?;

        let now = chrono::Utc::now().timestamp_millis();

        sqlx::query_as::<_, Installation>(
            "INSERT INTO installations
                (workspace_id, installation_token, pdf_downloads_count, created_at, updated_at)
             VALUES (?, ?, 0, ?, ?)
             ON CONFLICT(workspace_id) DO UPDATE SET
                installation_token = excluded.installation_token,
                updated_at = excluded.updated_at
             RETURNING *",
        )
        .bind(workspace_id)
        .bind(installation_token)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db.pool)
        .await
        .map_err(Into::into)
    }

    /// Get installation by workspace id
    pub async fn get(&self, workspace_id: &str) -> Result<Option<Installation>> {
        sqlx::query_as::<_, Installation>("SELECT * FROM installations WHERE workspace_id = ?")
            .bind(workspace_id)
            .fetch_optional(&self.db.pool)
            .await
            .map_err(Into::into)
    }

    /// Current download counter, `None` if the workspace is not installed
    pub async fn download_count(&self, workspace_id: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT pdf_downloads_count FROM installations WHERE workspace_id = ?",
        )
        .bind(workspace_id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(row.map(|(count,)| count))
    }

    /// Atomically add one download and return the new counter
    pub async fn increment_downloads(&self, workspace_id: &str) -> Result<i64> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE installations
             SET pdf_downloads_count = pdf_downloads_count + 1, updated_at = ?
             WHERE workspace_id = ?
             RETURNING pdf_downloads_count",
        )
        .bind(chrono::Utc::now().timestamp_millis())
        .bind(workspace_id)
        .fetch_optional(&self.db.pool)
        .await?;

        row.map(|(count,)| count)
            .ok_or_else(|| DbError::NotFound(format!("installation for workspace {workspace_id}")))
    }

    /// Atomically add one download only while the counter is below `limit`
    ///
    /// Returns the new counter, or `None` when the counter had already
    /// reached `limit` (or the workspace is not installed).
    pub async fn increment_downloads_below(
        &self,
        workspace_id: &str,
        limit: i64,
    ) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE installations
             SET pdf_downloads_count = pdf_downloads_count + 1, updated_at = ?
             WHERE workspace_id = ? AND pdf_downloads_count < ?
             RETURNING pdf_downloads_count",
        )
        .bind(chrono::Utc::now().timestamp_millis())
        .bind(workspace_id)
        .bind(limit)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(row.map(|(count,)| count))
    }
}
