use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::{
    deserialize_count, deserialize_optional_list, deserialize_plain_string,
    deserialize_string_field,
};

/// Request body for `POST /api/search`.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub jql: String,
    pub sprint_id: u64,
    pub projects: Vec<String>,
    pub users: Vec<String>,
    pub dry_run: bool,
    pub analysis: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub jql: String,
    #[serde(deserialize_with = "deserialize_string_field")]
    pub analysis: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_list")]
    pub issues: Option<Vec<IssueLink>>,
    pub raw: Option<Value>,
    #[serde(deserialize_with = "deserialize_count")]
    pub total: u64,
    #[serde(deserialize_with = "deserialize_optional_list")]
    pub steps: Option<Vec<Step>>,
    #[serde(deserialize_with = "deserialize_string_field")]
    pub history_id: Option<String>,
}

/// Issue reference as rendered by the backend: key, title and browse URL.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct IssueLink {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub key: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub title: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub url: String,
}

/// One entry of the backend's processing trace.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Step {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Step {
    pub fn completed(name: impl Into<String>, result: Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: Some("completed".to_string()),
            result: Some(result),
        }
    }
}
