//! Typed client crate for the jira-assist backend used by the terminal client.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::AssistClient;
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use models::{
    phrases_from_value, AutofillDay, AutofillPlan, ClarificationNeed, ClarificationRequest,
    HistoryEntry, HistoryMatch, HistorySummary, IssueLink, Myself, Phrase, Project, SearchRequest,
    SearchResponse, SingleWorklog, Sprint, Step, WorklogCommandReply, WorklogCommandRequest,
    WorklogOutcome,
};
