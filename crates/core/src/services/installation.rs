use crate::crypto::{CipherError, EncryptedToken, TokenCipher};
use clockbill_db::{Database, DbError, Installation};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum InstallationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Service for the add-on installation lifecycle
///
/// Installation tokens are stored encrypted; the plaintext never reaches
/// the database.
#[derive(Clone)]
pub struct InstallationService {
    db: Database,
    cipher: TokenCipher,
}

impl InstallationService {
    #[must_use]
    pub fn new(db: Database, cipher: TokenCipher) -> Self {
        Self { db, cipher }
    }

    /// Record an installation, replacing the token of an existing one
    ///
    /// The download counter of a re-installed workspace is preserved.
    pub async fn install(
        &self,
        workspace_id: &str,
        auth_token: &str,
    ) -> Result<Installation, InstallationError> {
        if workspace_id.trim().is_empty() {
            return Err(InstallationError::MissingField("workspaceId"));
        }
        if auth_token.trim().is_empty() {
            return Err(InstallationError::MissingField("authToken"));
        }

        let encrypted = self.cipher.encrypt(auth_token)?.to_json()?;
        let installation = self.db.installations().upsert(workspace_id, &encrypted).await?;
        info!(workspace_id, "Add-on installed");
        Ok(installation)
    }

    /// Plaintext installation token of a workspace
    pub async fn installation_token(
        &self,
        workspace_id: &str,
    ) -> Result<Option<String>, InstallationError> {
        let Some(installation) = self.db.installations().get(workspace_id).await? else {
            return Ok(None);
        };
        let encrypted = EncryptedToken::from_json(&installation.installation_token)?;
        Ok(Some(self.cipher.decrypt(&encrypted)?))
    }
}
