//! Natural-language Jira assistant client: query classification, the worklog clarification loop, saved phrases,
//! filters and search history on top of the assist backend.

pub mod assistant;
pub mod classifier;
pub mod config;
pub mod phrases;
pub mod render;
pub mod selection;
pub mod session;
pub mod store;
pub mod worklog;

pub use assistant::{AssistError, Assistant, FollowUp, Submission};
pub use classifier::{Classification, KeywordSets, QueryClassifier, QueryKind};
pub use config::{Config, ConfigManager, KnownUser};
pub use phrases::PhraseBook;
pub use session::{Session, SessionError};
pub use store::SessionStore;
pub use worklog::{
    run_worklog_command, ConsolePrompter, Prompter, WorklogBackend, WorklogInteraction, WorklogRun,
    WorklogState,
};
