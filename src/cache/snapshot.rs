use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parser::coerce::{coerce_rows, ConfigValue};
use crate::sources::fetch::RawRow;

/// Complete typed mapping of one namespace at one point in time. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSnapshot {
    pub values: BTreeMap<String, ConfigValue>,
    pub fetched_at: DateTime<Utc>,
}

impl ConfigSnapshot {
    pub fn from_rows(rows: Vec<RawRow>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            values: coerce_rows(rows),
            fetched_at,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
