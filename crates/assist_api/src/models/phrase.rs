//! Saved query phrases, including the legacy plain-string list format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Phrase {
    pub text: String,
    #[serde(default)]
    pub description: String,
}

impl Phrase {
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }
}

/// Request body for `POST /api/phrases`.
#[derive(Debug, Serialize)]
pub(crate) struct PhraseSaveRequest<'a> {
    pub phrases: &'a [Phrase],
}

/// Decodes a phrase listing. A list whose first element is a string is the legacy format and every element is read as
/// phrase text; otherwise only objects with a string `text` survive. Anything that is not a list yields no phrases.
pub fn phrases_from_value(value: Value) -> Vec<Phrase> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    if matches!(items.first(), Some(Value::String(_))) {
        return items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Phrase::new(text, ""),
                other => Phrase::new(other.to_string(), ""),
            })
            .collect();
    }

    items
        .into_iter()
        .filter_map(|item| {
            let text = item.get("text")?.as_str()?.to_string();
            let description = item
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(Phrase { text, description })
        })
        .collect()
}
