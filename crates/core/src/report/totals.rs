use super::entries::{Amounts, TimeEntry};
use super::format::{format_amounts, format_duration, DurationFormat};
use serde::Serialize;

/// Summed duration and per-currency amounts of a set of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub duration_seconds: u64,
    pub amounts: Amounts,
}

impl Totals {
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a TimeEntry>) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            totals.duration_seconds = totals.duration_seconds.saturating_add(entry.duration_seconds);
            for (currency, cents) in &entry.amounts {
                let sum = totals.amounts.entry(currency.clone()).or_insert(0);
                *sum = sum.saturating_add(*cents);
            }
        }
        totals
    }

    #[must_use]
    pub fn duration_display(&self, format: DurationFormat) -> String {
        format_duration(self.duration_seconds, format)
    }

    /// Amounts as `12.50 EUR, 3.00 USD`, or `0.00 USD` when nothing was earned
    #[must_use]
    pub fn amounts_display(&self) -> String {
        if self.amounts.is_empty() {
            "0.00 USD".to_string()
        } else {
            format_amounts(&self.amounts)
        }
    }
}
