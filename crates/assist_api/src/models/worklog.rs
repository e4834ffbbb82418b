//! Worklog command payloads: the request, the clarification signal and both success shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::{
    deserialize_count, deserialize_list, deserialize_plain_string, deserialize_string_field,
};

/// Request body for `POST /api/worklog/command`.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorklogCommandRequest {
    pub query: String,
    pub dry_run: bool,
    pub comment: String,
    pub duration_text: String,
    pub date_text: String,
}

/// Which missing field the backend is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClarificationNeed {
    Duration,
    Date,
    Other(String),
}

impl ClarificationNeed {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "duration" => ClarificationNeed::Duration,
            "date" => ClarificationNeed::Date,
            other => ClarificationNeed::Other(other.to_string()),
        }
    }
}

/// Body of a 422 response: the question to put to the user, the field it fills and an optional suggested answer.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ClarificationRequest {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub question: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub need: String,
    #[serde(deserialize_with = "deserialize_string_field")]
    pub default: Option<String>,
}

impl ClarificationRequest {
    pub fn need(&self) -> ClarificationNeed {
        ClarificationNeed::parse(&self.need)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SingleWorklog {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub issue_key: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub date: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub time_spent: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub started: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub time_zone: String,
    #[serde(deserialize_with = "deserialize_string_field", skip_serializing_if = "Option::is_none")]
    pub worklog_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AutofillPlan {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub issue_key: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub from: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub to: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub time_zone: String,
    #[serde(deserialize_with = "deserialize_count")]
    pub created: u64,
    #[serde(deserialize_with = "deserialize_count")]
    pub skipped: u64,
    #[serde(deserialize_with = "deserialize_list")]
    pub days: Vec<AutofillDay>,
}

/// One workday of an autofill plan and what the backend did with it.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AutofillDay {
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub date: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub weekday: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub time_spent: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub started: String,
    #[serde(deserialize_with = "deserialize_plain_string")]
    pub action: String,
    #[serde(deserialize_with = "deserialize_string_field", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(deserialize_with = "deserialize_string_field", skip_serializing_if = "Option::is_none")]
    pub worklog_id: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorklogOutcome {
    Single(SingleWorklog),
    Autofill(AutofillPlan),
}

impl WorklogOutcome {
    /// Interprets a success body. Anything that is not a well-formed autofill payload is read as a single entry.
    pub fn from_value(value: Value) -> Self {
        let is_autofill = value.get("kind").and_then(Value::as_str) == Some("autofill");
        if is_autofill {
            if let Some(plan) = value.get("autofill").filter(|plan| plan.is_object()) {
                if let Ok(plan) = serde_json::from_value::<AutofillPlan>(plan.clone()) {
                    return WorklogOutcome::Autofill(plan);
                }
            }
        }
        WorklogOutcome::Single(serde_json::from_value(value).unwrap_or_default())
    }

    pub fn issue_key(&self) -> &str {
        match self {
            WorklogOutcome::Single(entry) => &entry.issue_key,
            WorklogOutcome::Autofill(plan) => &plan.issue_key,
        }
    }
}

/// Result of one worklog command round.
#[derive(Debug, Clone, PartialEq)]
pub enum WorklogCommandReply {
    Clarification(ClarificationRequest),
    Completed(WorklogOutcome),
}
