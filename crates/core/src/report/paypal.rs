use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static PAYPAL_ME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^paypal\.me/[A-Za-z0-9._-]+(/?[0-9.,]*)?$").expect("valid PayPal link pattern")
});

static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://").expect("valid scheme pattern"));

static WWW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^www\.").expect("valid www pattern"));

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaypalLinkError {
    #[error("Invalid PayPal link")]
    Empty,

    #[error("Invalid PayPal link format")]
    Format,
}

/// Normalise a user supplied paypal.me link to `https://paypal.me/...`
///
/// Only `paypal.me/<name>` with an optional amount suffix is accepted.
pub fn sanitize_paypal_link(link: &str) -> Result<String, PaypalLinkError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(PaypalLinkError::Empty);
    }

    let cleaned = WWW.replace(&SCHEME.replace(link, ""), "").into_owned();
    let link = cleaned.strip_suffix('/').unwrap_or(&cleaned);

    if !PAYPAL_ME.is_match(link) || link.contains(|c: char| matches!(c, '<' | '>' | '{' | '}' | '(' | ')')) {
        return Err(PaypalLinkError::Format);
    }

    Ok(format!("https://{link}"))
}
