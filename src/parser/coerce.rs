//! Typing of raw sheet cells.
//!
//! Each value cell is decided once, at ingestion, into a [`ConfigValue`].
//! Precedence (first match wins):
//! 1. absent cell -> empty string
//! 2. `true` / `false`, any case -> Bool
//! 3. `null`, lowercase only -> Null
//! 4. base-10 integer fitting i64 -> Int
//! 5. finite float -> Float
//! 6. anything else -> String, untouched

use std::collections::BTreeMap;

use serde::Serialize;

use crate::sources::fetch::RawRow;

static NULL_LITERAL: &str = "null";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Null,
    Int(i64),
    Float(f64),
    String(String),
}

pub fn coerce(raw: Option<&str>) -> ConfigValue {
    let raw = raw.unwrap_or("");

    if raw.eq_ignore_ascii_case("true") {
        return ConfigValue::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return ConfigValue::Bool(false);
    }
    if raw == NULL_LITERAL {
        return ConfigValue::Null;
    }
    if let Ok(int) = raw.parse::<i64>() {
        return ConfigValue::Int(int);
    }
    match raw.parse::<f64>() {
        // "inf", "NaN" and overflowing literals stay text
        Ok(float) if float.is_finite() => ConfigValue::Float(float),
        _ => ConfigValue::String(raw.to_owned()),
    }
}

/// Typed mapping of one fetch. Rows with an empty key are dropped,
/// a repeated key keeps its last value.
pub fn coerce_rows(rows: Vec<RawRow>) -> BTreeMap<String, ConfigValue> {
    let mut values = BTreeMap::new();
    for row in rows {
        if row.key.is_empty() {
            continue;
        }
        let value = coerce(row.value.as_deref());
        values.insert(row.key, value);
    }
    values
}
