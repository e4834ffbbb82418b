//! Search history payloads.

use serde::{Deserialize, Serialize};

use super::lenient::{deserialize_list, deserialize_plain_string, deserialize_string_field};
use super::search::{IssueLink, Step};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySummary {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub query: String,
    #[serde(deserialize_with = "deserialize_string_field")]
    pub created_at: Option<String>,
}

/// Full record of a past search as stored by the backend.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub query: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub jql: String,
    #[serde(deserialize_with = "deserialize_list")]
    pub issues: Vec<IssueLink>,
    #[serde(deserialize_with = "deserialize_string_field")]
    pub analysis: Option<String>,
    #[serde(deserialize_with = "deserialize_list")]
    pub steps: Vec<Step>,
    #[serde(deserialize_with = "deserialize_string_field")]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct HistoryMatch {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub key: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub title: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct HistorySearchResponse {
    pub matches: Option<Vec<HistoryMatch>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct HistoryActionResponse {
    #[serde(deserialize_with = "deserialize_string_field")]
    pub result: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HistorySearchRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct HistoryActionRequest<'a> {
    pub command: &'a str,
}

#[cfg(test)]
mod tests {
    use super::HistoryEntry;
    use serde_json::json;

    #[test]
    fn entry_decodes_nested_issues_and_steps() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": "1715000000000",
            "query": "open bugs",
            "jql": "project = QA AND type = Bug",
            "maxResults": 50,
            "issues": [{"key": "QA-1", "title": "Crash", "url": "https://jira/browse/QA-1"}],
            "steps": [{"name": "Translate", "status": "completed"}],
            "createdAt": "2024-05-06T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(entry.issues.len(), 1);
        assert_eq!(entry.steps[0].name, "Translate");
        assert!(entry.analysis.is_none());
    }

    #[test]
    fn entry_with_malformed_issues_keeps_other_fields() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": 7,
            "jql": "project = QA",
            "issues": {"key": "QA-1"}
        }))
        .unwrap();
        assert_eq!(entry.id, "7");
        assert!(entry.issues.is_empty());
    }
}
