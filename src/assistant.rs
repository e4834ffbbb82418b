//! Operations behind every user action: submitting the query, loading filters and navigating history.

use assist_api::{
    ApiConfig, ApiError, AssistClient, HistoryEntry, HistoryMatch, HistorySummary, Myself, Project,
    Result as ApiResult, SearchResponse, Sprint,
};
use log::{debug, info, warn};
use thiserror::Error;

use crate::classifier::{Classification, QueryClassifier};
use crate::config::Config;
use crate::session::Session;
use crate::worklog::{
    run_worklog_command, Prompter, TransitionError, WorklogInteraction, WorklogRun,
};

#[derive(Debug, Error)]
pub enum AssistError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// What a submitted query turned into.
#[derive(Debug)]
pub enum Submission {
    Search {
        dry_run: bool,
        response: SearchResponse,
    },
    Worklog(WorklogRun),
}

impl Submission {
    pub fn status_line(&self) -> String {
        match self {
            Submission::Search { dry_run: true, .. } => "Preview JQL ready".to_string(),
            Submission::Search { dry_run: false, .. } => "OK, executed".to_string(),
            Submission::Worklog(run) => run.status_line(),
        }
    }
}

/// Result of a follow-up command sent against a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Blank command; nothing was sent.
    Skipped,
    NoHistory,
    Answered(Option<String>),
    Failed(String),
}

impl FollowUp {
    pub fn message(&self) -> String {
        match self {
            FollowUp::Skipped => String::new(),
            FollowUp::NoHistory => "Нет истории для команды.".to_string(),
            FollowUp::Answered(Some(text)) if !text.is_empty() => text.clone(),
            FollowUp::Answered(_) => "Пустой ответ.".to_string(),
            FollowUp::Failed(message) => format!("Ошибка: {}", message),
        }
    }
}

pub struct Assistant {
    client: AssistClient,
    classifier: QueryClassifier,
    config: Config,
}

impl Assistant {
    /// Builds a client for the configured backend.
    pub fn new(config: Config) -> ApiResult<Self> {
        let client = AssistClient::new(ApiConfig::new(config.backend_url.clone()))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: AssistClient, config: Config) -> Self {
        let classifier = QueryClassifier::new(config.keywords.clone());
        Self {
            client,
            classifier,
            config,
        }
    }

    pub fn client(&self) -> &AssistClient {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classify(&self, session: &Session) -> Classification {
        session.classify(&self.classifier)
    }

    /// Runs the effective query. Worklog commands go through the clarification loop and never reach the search
    /// endpoint; everything else is a search.
    pub async fn submit<P: Prompter>(
        &self,
        session: &mut Session,
        prompter: &mut P,
        dry_run: bool,
        analysis: bool,
    ) -> Result<Submission, AssistError> {
        let classification = self.classify(session);
        debug!(
            "Classified query as {:?} (issue {:?})",
            classification.kind, classification.issue
        );

        if classification.kind.is_worklog() {
            session.clear_jql();
            let interaction = WorklogInteraction::new(session.effective_query(), dry_run)
                .with_comment(self.config.worklog_comment.clone())
                .with_date_fallback(self.config.date_fallback.clone());
            let run = run_worklog_command(&self.client, prompter, interaction).await?;
            return Ok(Submission::Worklog(run));
        }

        let response = self.search(session, dry_run, analysis).await?;
        Ok(Submission::Search { dry_run, response })
    }

    /// Posts the session's search. The resolved JQL replaces the session's, and an executed search becomes the
    /// current history entry.
    pub async fn search(
        &self,
        session: &mut Session,
        dry_run: bool,
        analysis: bool,
    ) -> ApiResult<SearchResponse> {
        let known_projects: Vec<String> = if session.projects().is_all() {
            self.projects().await.into_iter().map(|project| project.key).collect()
        } else {
            Vec::new()
        };
        let request =
            session.search_request(dry_run, analysis, &known_projects, &self.config.user_keys());
        info!(
            "Searching ({}) for '{}'",
            if dry_run { "preview" } else { "execute" },
            request.query
        );

        let response = self.client.search(&request).await?;
        session.set_jql(response.jql.clone());
        if !dry_run {
            if let Some(history_id) = response.history_id.as_deref() {
                session.set_current_history(Some(history_id));
            }
        }
        Ok(response)
    }

    pub async fn myself(&self) -> ApiResult<Myself> {
        self.client.get_myself().await
    }

    /// Known projects; a failed load yields an empty list.
    pub async fn projects(&self) -> Vec<Project> {
        self.client.list_projects().await.unwrap_or_else(|err| {
            warn!("Failed to load projects: {}", err);
            Vec::new()
        })
    }

    /// Recent sprints of a project; a failed load yields an empty list.
    pub async fn sprints(&self, project_key: &str) -> Vec<Sprint> {
        self.client
            .list_sprints(project_key, self.config.sprint_limit)
            .await
            .unwrap_or_else(|err| {
                warn!("Failed to load sprints for {}: {}", project_key, err);
                Vec::new()
            })
    }

    /// Switches the project filter and returns the sprints available for it.
    pub async fn choose_project(
        &self,
        session: &mut Session,
        project_key: Option<&str>,
    ) -> Vec<Sprint> {
        session.choose_project(project_key);
        match project_key {
            Some(key) => self.sprints(key).await,
            None => Vec::new(),
        }
    }

    pub async fn history(&self) -> ApiResult<Vec<HistorySummary>> {
        self.client.list_history().await
    }

    /// Fetches an entry and makes it the target of follow-up searches and commands.
    pub async fn open_history(
        &self,
        session: &mut Session,
        entry_id: &str,
    ) -> ApiResult<HistoryEntry> {
        let entry = self.client.get_history(entry_id).await?;
        session.set_current_history(Some(entry_id));
        Ok(entry)
    }

    /// Searches inside the current history entry. Returns `None` when nothing was sent.
    pub async fn search_history(
        &self,
        session: &Session,
        query: &str,
    ) -> ApiResult<Option<Vec<HistoryMatch>>> {
        let query = query.trim();
        let Some(entry_id) = session.current_history_id() else {
            return Ok(None);
        };
        if query.is_empty() {
            return Ok(None);
        }
        self.client.search_history(entry_id, query).await.map(Some)
    }

    pub async fn follow_up(&self, session: &Session, command: &str) -> FollowUp {
        let command = command.trim();
        if command.is_empty() {
            return FollowUp::Skipped;
        }
        let Some(entry_id) = session.current_history_id() else {
            return FollowUp::NoHistory;
        };
        match self.client.history_action(entry_id, command).await {
            Ok(result) => FollowUp::Answered(result),
            Err(err) => {
                warn!("History command failed: {}", err);
                FollowUp::Failed(err.to_string())
            }
        }
    }
}
