//! Explicit client state: the query being edited, the selected phrase, filters and the current history entry.

use assist_api::SearchRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::{Classification, QueryClassifier};
use crate::selection::SelectGroup;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("query is locked by the selected phrase \"{0}\"; deselect it first")]
    PhraseSelected(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Session {
    query_text: String,
    selected_phrase: Option<String>,
    /// JQL preview or override; cleared whenever the effective query changes.
    jql: String,
    projects: SelectGroup,
    users: SelectGroup,
    sprint_id: u64,
    current_project: Option<String>,
    current_history_id: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            query_text: String::new(),
            selected_phrase: None,
            jql: String::new(),
            projects: SelectGroup::single(),
            users: SelectGroup::multi(),
            sprint_id: 0,
            current_project: None,
            current_history_id: None,
        }
    }
}

impl Session {
    /// The selected phrase overrides the typed text.
    pub fn effective_query(&self) -> &str {
        self.selected_phrase.as_deref().unwrap_or(&self.query_text)
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn query_editable(&self) -> bool {
        self.selected_phrase.is_none()
    }

    pub fn set_query_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if let Some(phrase) = &self.selected_phrase {
            return Err(SessionError::PhraseSelected(phrase.clone()));
        }
        self.query_text = text.into();
        self.jql.clear();
        Ok(())
    }

    pub fn selected_phrase(&self) -> Option<&str> {
        self.selected_phrase.as_deref()
    }

    /// Selects `text`, or deselects it when it is already selected. Returns whether a phrase is selected afterwards.
    pub fn toggle_phrase(&mut self, text: &str) -> bool {
        if self.selected_phrase.as_deref() == Some(text) {
            self.selected_phrase = None;
        } else {
            self.selected_phrase = Some(text.to_string());
            self.query_text = text.to_string();
        }
        self.jql.clear();
        self.selected_phrase.is_some()
    }

    pub fn clear_phrase_selection(&mut self) {
        self.selected_phrase = None;
        self.jql.clear();
    }

    /// Keeps the selection consistent after a phrase was deleted from the book.
    pub fn phrase_removed(&mut self, text: &str) {
        if self.selected_phrase.as_deref() == Some(text) {
            self.selected_phrase = None;
        }
    }

    pub fn jql(&self) -> &str {
        &self.jql
    }

    pub fn set_jql(&mut self, jql: impl Into<String>) {
        self.jql = jql.into();
    }

    pub fn clear_jql(&mut self) {
        self.jql.clear();
    }

    pub fn projects(&self) -> &SelectGroup {
        &self.projects
    }

    pub fn users(&self) -> &SelectGroup {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut SelectGroup {
        &mut self.users
    }

    /// Switches the project filter. Any project change resets the sprint to the whole project.
    pub fn choose_project(&mut self, project_key: Option<&str>) {
        self.sprint_id = 0;
        match project_key {
            Some(key) => {
                self.projects.set_item(key, true);
                self.current_project = Some(key.to_string());
            }
            None => {
                self.projects.set_all(true);
                self.current_project = None;
            }
        }
    }

    pub fn current_project(&self) -> Option<&str> {
        self.current_project.as_deref()
    }

    pub fn sprint_id(&self) -> u64 {
        self.sprint_id
    }

    /// `0` selects the whole project.
    pub fn select_sprint(&mut self, sprint_id: u64) {
        self.sprint_id = sprint_id;
    }

    pub fn current_history_id(&self) -> Option<&str> {
        self.current_history_id.as_deref()
    }

    pub fn set_current_history(&mut self, entry_id: Option<&str>) {
        self.current_history_id = entry_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }

    pub fn classify(&self, classifier: &QueryClassifier) -> Classification {
        classifier.classify(self.effective_query())
    }

    pub fn search_request(
        &self,
        dry_run: bool,
        analysis: bool,
        known_projects: &[String],
        known_users: &[String],
    ) -> SearchRequest {
        SearchRequest {
            query: self.effective_query().to_string(),
            jql: self.jql.clone(),
            sprint_id: self.sprint_id,
            projects: self.projects.values(known_projects),
            users: self.users.values(known_users),
            dry_run,
            analysis,
        }
    }
}
