use clockbill_db::{Database, DbError};
use thiserror::Error;
use tracing::{debug, warn};

/// Free PDF downloads per workspace
pub const DEFAULT_DOWNLOAD_LIMIT: i64 = 3;

#[derive(Error, Debug)]
pub enum TrialError {
    #[error("Trial limit of {limit} downloads reached")]
    LimitReached { limit: i64 },

    #[error("Installation record missing for workspace {0}")]
    MissingInstallation(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Meters PDF downloads against the trial limit
#[derive(Clone)]
pub struct TrialService {
    db: Database,
    limit: i64,
}

impl TrialService {
    #[must_use]
    pub fn new(db: Database, limit: i64) -> Self {
        Self { db, limit }
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Take one download from the workspace's allowance
    ///
    /// Returns the new count. The increment is a single guarded update, so
    /// concurrent callers can never push the count past the limit.
    pub async fn consume_download(&self, workspace_id: &str) -> Result<i64, TrialError> {
        let installations = self.db.installations();

        let count = installations
            .download_count(workspace_id)
            .await?
            .ok_or_else(|| TrialError::MissingInstallation(workspace_id.to_string()))?;

        if count >= self.limit {
            warn!(workspace_id, count, limit = self.limit, "Trial limit reached");
            return Err(TrialError::LimitReached { limit: self.limit });
        }

        match installations
            .increment_downloads_below(workspace_id, self.limit)
            .await?
        {
            Some(count) => {
                debug!(workspace_id, count, "Download recorded");
                Ok(count)
            }
            None => {
                warn!(workspace_id, limit = self.limit, "Trial limit reached concurrently");
                Err(TrialError::LimitReached { limit: self.limit })
            }
        }
    }
}
