//! Add-on token verification.
//!
//! Tokens whose header names a `kid` are checked against the remote key set;
//! all others against the static Clockify public key.

mod claims;
mod error;
mod jwks;
mod verifier;

pub use claims::{AddonClaims, EXPECTED_ISSUER, EXPECTED_TOKEN_TYPE};
pub use error::AuthError;
pub use jwks::{JwksClient, JwksConfig};
pub use verifier::{KeySource, TokenVerifier, CLOCKIFY_PUBLIC_KEY};
