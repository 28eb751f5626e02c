//! Parameter merging and encoding.
//!
//! Query strings (GET/DELETE) take the common parameters first and let the
//! caller override them; bodies (POST/PUT) start from the caller's data and
//! only add common parameters the caller did not set. Either way `null`,
//! `""`, `[]` and `{}` never reach the server.

use serde_json::Value;

use super::Params;

/// Common parameters overlaid with the caller's; caller wins.
pub fn merge_for_query(common: Params, params: Params) -> Params {
    let mut merged = common;
    for (key, value) in params {
        merged.insert(key, value);
    }
    retain_present(merged)
}

/// Caller data extended with common parameters; caller wins.
pub fn merge_for_body(data: Params, common: Params) -> Params {
    let mut merged = data;
    for (key, value) in common {
        let caller_has_value = merged.get(&key).is_some_and(is_present);
        if !caller_has_value {
            merged.insert(key, value);
        }
    }
    retain_present(merged)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

fn retain_present(params: Params) -> Params {
    params.into_iter().filter(|(_, v)| is_present(v)).collect()
}

/// Query-string rendering of one value, as a browser form encoder would write it.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(query_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `key=value&...` in map order, percent-encoded. Empty when there is nothing to send.
pub fn encode_query(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&query_value(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Appends `query` to `url`, respecting a query string the path may already carry.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}
