use crate::config::Config;
use anyhow::{Context, Result};
use clockbill_core::{
    ClockifyClient, InstallationService, JwksClient, ReportService, TokenCipher, TokenVerifier,
    TrialService,
};
use clockbill_db::Database;
use std::time::Duration;

/// Shared handler state, cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub verifier: TokenVerifier,
    pub installations: InstallationService,
    pub trial: TrialService,
    pub reports: ReportService,
}

impl AppState {
    /// Wire services from configuration around an already migrated database
    pub fn from_config(config: &Config, db: Database) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.clockify.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let jwks = config
            .auth
            .jwks()
            .map(|jwks| JwksClient::new(http.clone(), jwks));
        if let Some(jwks) = &jwks {
            tracing::info!("Key set verification enabled via {}", jwks.url());
        } else {
            tracing::info!("No key set configured; tokens with kid will be rejected");
        }

        let verifier = match &config.auth.static_public_key_path {
            Some(path) => {
                let pem = std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read static public key: {}", path.display())
                })?;
                TokenVerifier::with_static_key_pem(&pem, jwks)?
            }
            None => TokenVerifier::new(jwks)?,
        };

        let cipher = TokenCipher::from_hex(&config.installation.encryption_key)
            .context("installation.encryption_key (or ENCRYPTION_KEY) must be 64 hex characters")?;

        Ok(Self {
            verifier,
            installations: InstallationService::new(db.clone(), cipher),
            trial: TrialService::new(db, config.trial.download_limit),
            reports: ReportService::new(ClockifyClient::new(http)),
        })
    }
}
