//! Lenient field decoders for backend payloads whose scalar types drift.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Accepts strings, numbers, booleans or null and yields a trimmed optional string.
pub(crate) fn deserialize_string_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce_string))
}

/// Same as [`deserialize_string_field`] but collapses absence into an empty string.
pub(crate) fn deserialize_plain_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_string_field(deserializer)?.unwrap_or_default())
}

/// Accepts any JSON number (or numeric string) and yields an unsigned count, zero otherwise.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Reads a list; anything that is not a well-formed list of `T` is absent.
pub(crate) fn deserialize_optional_list<'de, D, T>(
    deserializer: D,
) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(list @ Value::Array(_)) => serde_json::from_value(list).ok(),
        _ => None,
    })
}

/// Same as [`deserialize_optional_list`] but collapses absence into an empty list.
pub(crate) fn deserialize_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(deserialize_optional_list(deserializer)?.unwrap_or_default())
}

pub(crate) fn coerce_string(value: Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => None,
        other => serde_json::to_string(&other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::coerce_string;
    use serde_json::json;

    #[test]
    fn numbers_become_strings() {
        assert_eq!(coerce_string(json!(10231)), Some("10231".to_string()));
    }

    #[test]
    fn blank_strings_are_absent() {
        assert_eq!(coerce_string(json!("   ")), None);
        assert_eq!(coerce_string(json!(null)), None);
    }
}
