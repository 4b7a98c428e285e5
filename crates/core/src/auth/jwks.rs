//! Signing keys resolved from a remote JWKS endpoint.
//!
//! Keys are cached per `kid`. A cache miss triggers a fetch of the whole set,
//! and fetches are capped per rolling minute so that tokens naming unknown
//! keys cannot make us hammer the endpoint.

use super::AuthError;
use dashmap::DashMap;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Key-set client settings
#[derive(Debug, Clone)]
pub struct JwksConfig {
    pub url: String,
    pub cache_ttl: Duration,
    pub requests_per_minute: usize,
}

impl JwksConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cache_ttl: Duration::from_secs(600),
            requests_per_minute: 10,
        }
    }
}

struct CachedKey {
    key: DecodingKey,
    fetched_at: Instant,
}

/// Cached, rate-limited JWKS client
#[derive(Clone)]
pub struct JwksClient {
    http: reqwest::Client,
    config: Arc<JwksConfig>,
    keys: Arc<DashMap<String, CachedKey>>,
    /// Start times of recent fetches; the lock also serialises fetches.
    fetches: Arc<Mutex<VecDeque<Instant>>>,
}

impl JwksClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: JwksConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
            keys: Arc::new(DashMap::new()),
            fetches: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn cached(&self, kid: &str) -> Option<DecodingKey> {
        self.keys
            .get(kid)
            .filter(|cached| cached.fetched_at.elapsed() < self.config.cache_ttl)
            .map(|cached| cached.key.clone())
    }

    /// Resolve the decoding key for `kid`, fetching the key set on a miss
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cached(kid) {
            return Ok(key);
        }

        let mut fetches = self.fetches.lock().await;

        // A fetch that finished while we waited may already have the key.
        if let Some(key) = self.cached(kid) {
            return Ok(key);
        }

        let now = Instant::now();
        while fetches
            .front()
            .is_some_and(|at| now.duration_since(*at) >= RATE_WINDOW)
        {
            fetches.pop_front();
        }
        if fetches.len() >= self.config.requests_per_minute {
            warn!(kid = %kid, "JWKS fetch rate limit reached");
            return Err(AuthError::RateLimited(self.config.requests_per_minute));
        }
        fetches.push_back(now);

        info!(jwks_url = %self.config.url, kid = %kid, "Fetching JWKS keys");
        let set: JwkSet = self
            .http
            .get(&self.config.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let fetched_at = Instant::now();
        let mut found = None;
        for jwk in &set.keys {
            let Some(id) = jwk.common.key_id.as_ref() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    if id == kid {
                        found = Some(key.clone());
                    }
                    self.keys.insert(id.clone(), CachedKey { key, fetched_at });
                }
                Err(e) => debug!(kid = %id, "Skipping unusable JWK: {}", e),
            }
        }

        // A stale entry absent from the fresh set was rotated away.
        found.ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }
}
