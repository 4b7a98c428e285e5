use super::format::parse_duration;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-currency amounts in minor units (cents)
pub type Amounts = BTreeMap<String, i64>;

const DEFAULT_CURRENCY: &str = "USD";

/// A single time entry extracted from a detailed report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    /// Start of the entry as reported (RFC 3339)
    pub start: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub task_id: Option<String>,
    pub task_name: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub billable: Option<bool>,
    pub amounts: Amounts,
    pub duration_seconds: u64,
}

/// Collect every entry array found anywhere in a report response
///
/// Arrays under `entries` or `timeentries` contribute their elements; every
/// nested object and array is searched as well.
#[must_use]
pub fn collect_entries(node: &Value) -> Vec<Value> {
    let mut acc = Vec::new();
    collect_into(node, &mut acc);
    acc
}

fn collect_into(node: &Value, acc: &mut Vec<Value>) {
    let map = match node {
        Value::Object(map) => map,
        Value::Array(children) => {
            children.iter().for_each(|child| collect_into(child, acc));
            return;
        }
        _ => return,
    };

    for key in ["entries", "timeentries"] {
        if let Some(Value::Array(items)) = map.get(key) {
            acc.extend(items.iter().cloned());
        }
    }

    for value in map.values() {
        if value.is_array() || value.is_object() {
            collect_into(value, acc);
        }
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Interpret a raw amount (number or numeric string) as minor units
fn raw_amount(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Null => return None,
        _ => 0.0,
    };
    Some(number.round() as i64)
}

fn add_amount(amounts: &mut Amounts, currency: Option<&str>, raw: Option<&Value>) {
    let Some(cents) = raw.and_then(raw_amount) else {
        return;
    };
    let currency = currency
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_uppercase();
    *amounts.entry(currency).or_insert(0) += cents;
}

fn non_null<'a>(item: &'a Value, key: &str) -> Option<&'a Value> {
    item.get(key).filter(|v| !v.is_null())
}

/// Amounts of an entry, from the first of the known shapes present
#[must_use]
pub fn entry_amounts(entry: &Value) -> Amounts {
    let mut amounts = Amounts::new();
    let entry_currency = entry.get("currency").and_then(Value::as_str);

    if let Some(items) = entry.get("amounts").and_then(Value::as_array) {
        for item in items.iter().filter(|i| !i.is_null()) {
            let currency = item.get("currency").and_then(Value::as_str).or(entry_currency);
            let raw = non_null(item, "amount").or_else(|| non_null(item, "value"));
            add_amount(&mut amounts, currency, raw);
        }
        return amounts;
    }

    if let Some(items) = entry.get("amountByCurrency").and_then(Value::as_array) {
        for item in items.iter().filter(|i| !i.is_null()) {
            let currency = item
                .get("currency")
                .and_then(Value::as_str)
                .or_else(|| item.get("code").and_then(Value::as_str));
            let raw = non_null(item, "amount").or_else(|| non_null(item, "value"));
            add_amount(&mut amounts, currency, raw);
        }
        return amounts;
    }

    add_amount(&mut amounts, entry_currency, non_null(entry, "amount"));
    add_amount(&mut amounts, entry_currency, non_null(entry, "totalAmount"));
    amounts
}

impl TimeEntry {
    /// Build an entry from a raw report item, tolerating missing fields
    #[must_use]
    pub fn from_value(entry: &Value) -> Self {
        let interval = entry.get("timeInterval");

        Self {
            start: interval.and_then(|i| str_field(i, "start")),
            description: str_field(entry, "description"),
            project_id: str_field(entry, "projectId"),
            project_name: str_field(entry, "projectName"),
            task_id: str_field(entry, "taskId"),
            task_name: str_field(entry, "taskName"),
            client_id: str_field(entry, "clientId"),
            client_name: str_field(entry, "clientName"),
            billable: entry.get("billable").and_then(Value::as_bool),
            amounts: entry_amounts(entry),
            duration_seconds: interval
                .and_then(|i| i.get("duration"))
                .map_or(0, parse_duration),
        }
    }
}

/// Collect and parse all entries of a report response
#[must_use]
pub fn extract_entries(report: &Value) -> Vec<TimeEntry> {
    collect_entries(report)
        .iter()
        .map(TimeEntry::from_value)
        .collect()
}
