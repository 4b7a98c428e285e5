//! Time entries of a detailed report: extraction, filtering, totals and
//! display formatting.

mod entries;
mod filter;
mod format;
mod paypal;
mod totals;

pub use entries::{collect_entries, entry_amounts, extract_entries, Amounts, TimeEntry};
pub use filter::{BillableFilter, ReportFilter};
pub use format::{
    format_amounts, format_cents, format_date, format_duration, parse_duration,
    parse_iso_duration, DurationFormat,
};
pub use paypal::{sanitize_paypal_link, PaypalLinkError};
pub use totals::Totals;
