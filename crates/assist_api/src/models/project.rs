//! Project and sprint listings used to scope searches.

use serde::{Deserialize, Serialize};

use super::lenient::{deserialize_count, deserialize_plain_string, deserialize_string_field};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub key: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Sprint {
    #[serde(deserialize_with = "deserialize_count")]
    pub id: u64,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_string_field")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "deserialize_string_field")]
    pub end_date: Option<String>,
}

impl Sprint {
    /// Calendar day part (`YYYY-MM-DD`) of the sprint start, empty when unknown.
    pub fn start_day(&self) -> &str {
        day_part(self.start_date.as_deref())
    }

    /// Calendar day part (`YYYY-MM-DD`) of the sprint end, empty when unknown.
    pub fn end_day(&self) -> &str {
        day_part(self.end_date.as_deref())
    }
}

fn day_part(value: Option<&str>) -> &str {
    let value = value.unwrap_or_default();
    value.get(..10).unwrap_or(value)
}
