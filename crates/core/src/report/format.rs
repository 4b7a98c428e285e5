use super::entries::Amounts;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Workspace duration display setting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DurationFormat {
    /// `HH:MM:SS`
    #[default]
    Full,
    /// `H:MM`
    Compact,
    /// Hours with two decimals
    Decimal,
}

impl DurationFormat {
    /// Parse a workspace setting, falling back to `Full` for unknown values
    #[must_use]
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting.map(str::to_ascii_uppercase).as_deref() {
            Some("COMPACT") => Self::Compact,
            Some("DECIMAL") => Self::Decimal,
            _ => Self::Full,
        }
    }
}

/// Seconds of a duration given as seconds or an ISO-8601 `PT#H#M#S` string
#[must_use]
pub fn parse_duration(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => parse_iso_duration(s),
        _ => 0,
    }
}

/// Seconds of an ISO-8601 time duration such as `PT1H30M` (0 when unparseable)
#[must_use]
pub fn parse_iso_duration(iso: &str) -> u64 {
    let Some(rest) = iso.trim().strip_prefix("PT") else {
        return 0;
    };

    let mut total = 0u64;
    let mut digits = String::new();
    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let Ok(n) = digits.parse::<u64>() else {
            return 0;
        };
        digits.clear();
        let unit = match c {
            'H' => 3600,
            'M' => 60,
            'S' => 1,
            _ => return 0,
        };
        let Some(sum) = n.checked_mul(unit).and_then(|secs| total.checked_add(secs)) else {
            return 0;
        };
        total = sum;
    }

    if digits.is_empty() {
        total
    } else {
        0
    }
}

#[must_use]
pub fn format_duration(seconds: u64, format: DurationFormat) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;

    match format {
        DurationFormat::Full => format!("{h:02}:{m:02}:{s:02}"),
        DurationFormat::Compact => format!("{h}:{m:02}"),
        DurationFormat::Decimal => format!("{:.2}", seconds as f64 / 3600.0),
    }
}

/// `DD/MM/YYYY` of an RFC 3339 timestamp, `-` when absent or unparseable
#[must_use]
pub fn format_date(iso: Option<&str>) -> String {
    iso.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or_else(|| "-".to_string(), |d| d.format("%d/%m/%Y").to_string())
}

/// `12.50` for 1250 minor units
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// `12.50 EUR, 3.00 USD`
#[must_use]
pub fn format_amounts(amounts: &Amounts) -> String {
    amounts
        .iter()
        .map(|(currency, cents)| format!("{} {currency}", format_cents(*cents)))
        .collect::<Vec<_>>()
        .join(", ")
}
