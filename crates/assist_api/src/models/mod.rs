mod history;
mod lenient;
mod phrase;
mod project;
mod search;
mod user;
mod worklog;

pub use history::{HistoryEntry, HistoryMatch, HistorySummary};
pub(crate) use history::{
    HistoryActionRequest, HistoryActionResponse, HistorySearchRequest, HistorySearchResponse,
};
pub use phrase::{phrases_from_value, Phrase};
pub(crate) use phrase::PhraseSaveRequest;
pub use project::{Project, Sprint};
pub use search::{IssueLink, SearchRequest, SearchResponse, Step};
pub use user::Myself;
pub use worklog::{
    AutofillDay, AutofillPlan, ClarificationNeed, ClarificationRequest, SingleWorklog,
    WorklogCommandReply, WorklogCommandRequest, WorklogOutcome,
};
