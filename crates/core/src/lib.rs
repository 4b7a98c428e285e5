//! Domain logic of the clockbill add-on: token verification, the trial
//! gate, Clockify report fetching and invoice rendering.

pub mod auth;
pub mod clockify;
pub mod crypto;
pub mod pdf;
pub mod report;
pub mod services;

pub use auth::{AddonClaims, AuthError, JwksClient, JwksConfig, KeySource, TokenVerifier};
pub use clockify::{ClockifyClient, ClockifyError, Workspace};
pub use crypto::{CipherError, EncryptedToken, TokenCipher};
pub use services::{
    ClockifyContext, InstallationError, InstallationService, InvoiceDetails, ReportError,
    ReportPreview, ReportService, TrialError, TrialService, DEFAULT_DOWNLOAD_LIMIT,
};
