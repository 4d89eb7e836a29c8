//! Extracts rate mappings from provider payloads and snapshot files.
//!
//! Both documents are JSON objects. Provider payloads nest the rates under
//! `conversion_rates`; snapshots keep them at the top level. Only requested
//! codes are extracted, and entries whose value is not a positive number are
//! dropped without failing the whole document.

use crate::core::currency::RateMapping;
use crate::core::error::{RateError, RateResult};
use serde_json::{Map, Value};
use tracing::debug;

/// Parses `body` into a JSON object.
///
/// Older snapshots were written with a comma after the last entry, so a
/// document that fails strict parsing is retried with trailing commas removed.
pub fn parse_document(body: &str) -> RateResult<Map<String, Value>> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(strict_err) => serde_json::from_str(&strip_trailing_commas(body))
            .map_err(|_| RateError::ParseFailure(strict_err.to_string()))?,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(RateError::ParseFailure(format!(
            "Expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

/// Returns the object holding the rate entries of `document`.
pub fn rate_entries(document: &Map<String, Value>) -> &Map<String, Value> {
    match document.get("conversion_rates") {
        Some(Value::Object(rates)) => rates,
        _ => document,
    }
}

/// Collects the rates of `codes` found in `entries`.
pub fn extract_rates(entries: &Map<String, Value>, codes: &[&str]) -> RateMapping {
    let mut rates = RateMapping::new();
    for code in codes {
        let Some(value) = entries.get(*code) else {
            continue;
        };
        let inserted = value.as_f64().is_some_and(|rate| rates.insert(code, rate));
        if !inserted {
            debug!("Dropping unusable rate for {}: {}", code, value);
        }
    }
    rates
}

/// Parses `body` and extracts the rates of `codes`.
///
/// Fails with `ParseFailure` when `body` is not a JSON object, and with
/// `ProviderError` when the document is a provider payload reporting
/// `"result": "error"`. A readable document without any usable entry yields
/// an empty mapping.
pub fn try_parse_rates(body: &str, codes: &[&str]) -> RateResult<RateMapping> {
    let document = parse_document(body)?;
    if let Some(error_type) = provider_error(&document) {
        return Err(RateError::ProviderError(error_type));
    }
    Ok(extract_rates(rate_entries(&document), codes))
}

/// Like [`try_parse_rates`], but an unreadable document yields an empty
/// mapping.
pub fn parse_rates(body: &str, codes: &[&str]) -> RateMapping {
    try_parse_rates(body, codes).unwrap_or_else(|e| {
        debug!(error = %e, "Could not parse rate document");
        RateMapping::new()
    })
}

/// Returns the provider's `error-type` when the payload reports a failure.
fn provider_error(document: &Map<String, Value>) -> Option<String> {
    match document.get("result").and_then(Value::as_str) {
        Some("error") => Some(
            document
                .get("error-type")
                .and_then(Value::as_str)
                .unwrap_or("unknown-error")
                .to_string(),
        ),
        _ => None,
    }
}

fn strip_trailing_commas(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
