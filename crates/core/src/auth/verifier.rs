use super::claims::AddonClaims;
use super::jwks::JwksClient;
use super::AuthError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tracing::{debug, warn};

/// Clockify's published add-on signing key
pub const CLOCKIFY_PUBLIC_KEY: &str = include_str!("clockify_public_key.pem");

/// Where the signing key of a token comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// No `kid` in the header: the fixed public key
    Static,
    /// `kid` in the header: the matching key of the remote key set
    Jwks { kid: String },
}

impl KeySource {
    /// Pick the key source from the unverified token header
    pub fn for_token(token: &str) -> Result<Self, AuthError> {
        let header = decode_header(token)?;
        Ok(match header.kid {
            Some(kid) if !kid.is_empty() => Self::Jwks { kid },
            _ => Self::Static,
        })
    }
}

/// Verifies Clockify add-on tokens
#[derive(Clone)]
pub struct TokenVerifier {
    static_key: DecodingKey,
    jwks: Option<JwksClient>,
    validation: Validation,
}

impl TokenVerifier {
    /// Verifier using the embedded Clockify key for tokens without `kid`
    pub fn new(jwks: Option<JwksClient>) -> Result<Self, AuthError> {
        Self::with_static_key_pem(CLOCKIFY_PUBLIC_KEY, jwks)
    }

    /// Verifier using a custom RSA public key (PEM) for tokens without `kid`
    pub fn with_static_key_pem(pem: &str, jwks: Option<JwksClient>) -> Result<Self, AuthError> {
        let static_key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AuthError::InvalidStaticKey(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        // Add-on tokens are not always issued with `exp`; it is still checked when present.
        validation.required_spec_claims.clear();
        validation.validate_aud = false;

        Ok(Self {
            static_key,
            jwks,
            validation,
        })
    }

    /// Verify the signature and the issuer/type of an add-on token
    pub async fn verify(&self, token: &str) -> Result<AddonClaims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let result = self.verify_inner(token).await;
        if let Err(e) = &result {
            warn!("Token verification failed: {}", e);
        }
        result
    }

    async fn verify_inner(&self, token: &str) -> Result<AddonClaims, AuthError> {
        let source = KeySource::for_token(token)?;
        debug!(?source, "Verifying add-on token");

        let claims = match source {
            KeySource::Static => {
                decode::<AddonClaims>(token, &self.static_key, &self.validation)?.claims
            }
            KeySource::Jwks { kid } => {
                let jwks = self
                    .jwks
                    .as_ref()
                    .ok_or_else(|| AuthError::KeySetNotConfigured(kid.clone()))?;
                let key = jwks.decoding_key(&kid).await?;
                decode::<AddonClaims>(token, &key, &self.validation)?.claims
            }
        };

        if !claims.is_addon_token() {
            return Err(AuthError::UnexpectedIssuer {
                iss: claims.iss,
                token_type: claims.token_type,
            });
        }

        Ok(claims)
    }
}
