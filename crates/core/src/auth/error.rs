use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("token is missing")]
    MissingToken,

    #[error("token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("invalid token issuer or type (iss: '{iss}', type: '{token_type}')")]
    UnexpectedIssuer { iss: String, token_type: String },

    #[error("token names key '{0}' but no key set is configured")]
    KeySetNotConfigured(String),

    #[error("no key '{0}' in key set")]
    UnknownKey(String),

    #[error("key set fetch failed: {0}")]
    KeySetFetch(#[from] reqwest::Error),

    #[error("key set fetches exceeded {0} per minute")]
    RateLimited(usize),

    #[error("invalid static public key: {0}")]
    InvalidStaticKey(String),
}
