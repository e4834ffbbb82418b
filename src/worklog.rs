//! Worklog command interaction: the clarification state machine and the driver that runs it against the backend.
//!
//! The backend may answer a command with a 422 question when it cannot infer the duration or the date. The
//! interaction collects the answer and resubmits the same query with everything confirmed so far, until the backend
//! either completes the command or fails.

use std::io::{BufRead, Write};

use assist_api::{
    AssistClient, ClarificationNeed, ClarificationRequest, Result as ApiResult, Step,
    WorklogCommandReply, WorklogCommandRequest, WorklogOutcome,
};
use log::{debug, info, warn};
use serde_json::json;
use thiserror::Error;

pub const DEFAULT_WORKLOG_COMMENT: &str = "Auto log";
/// Date answer used when the user gives none and the backend suggests none.
pub const DEFAULT_DATE_FALLBACK: &str = "сегодня";

#[derive(Debug, Clone, PartialEq)]
pub enum WorklogState {
    Idle,
    Submitting,
    AwaitingDuration {
        question: String,
        default: Option<String>,
    },
    AwaitingDate {
        question: String,
        default: Option<String>,
    },
    Done(WorklogOutcome),
    Failed(String),
    /// The user declined to supply a duration, or the backend asked for something the client cannot collect.
    Aborted,
}

impl WorklogState {
    fn name(&self) -> &'static str {
        match self {
            WorklogState::Idle => "idle",
            WorklogState::Submitting => "submitting",
            WorklogState::AwaitingDuration { .. } => "awaiting-duration",
            WorklogState::AwaitingDate { .. } => "awaiting-date",
            WorklogState::Done(_) => "done",
            WorklogState::Failed(_) => "failed",
            WorklogState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorklogState::Done(_) | WorklogState::Failed(_) | WorklogState::Aborted
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} while {state}")]
    Invalid {
        action: &'static str,
        state: &'static str,
    },
}

/// One worklog command from first submission to a terminal state.
#[derive(Debug, Clone)]
pub struct WorklogInteraction {
    query: String,
    dry_run: bool,
    comment: String,
    date_fallback: String,
    duration_text: String,
    date_text: String,
    rounds: u32,
    state: WorklogState,
}

impl WorklogInteraction {
    pub fn new(query: impl Into<String>, dry_run: bool) -> Self {
        Self {
            query: query.into(),
            dry_run,
            comment: DEFAULT_WORKLOG_COMMENT.to_string(),
            date_fallback: DEFAULT_DATE_FALLBACK.to_string(),
            duration_text: String::new(),
            date_text: String::new(),
            rounds: 0,
            state: WorklogState::Idle,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_date_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.date_fallback = fallback.into();
        self
    }

    pub fn state(&self) -> &WorklogState {
        &self.state
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Number of requests sent so far.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn duration_text(&self) -> &str {
        &self.duration_text
    }

    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.expect_state("start", matches!(self.state, WorklogState::Idle))?;
        self.state = WorklogState::Submitting;
        Ok(())
    }

    /// Builds the next request and counts it as sent. Only valid while submitting.
    pub fn next_request(&mut self) -> Result<WorklogCommandRequest, TransitionError> {
        self.expect_state("submit", matches!(self.state, WorklogState::Submitting))?;
        self.rounds += 1;
        Ok(WorklogCommandRequest {
            query: self.query.clone(),
            dry_run: self.dry_run,
            comment: self.comment.clone(),
            duration_text: self.duration_text.clone(),
            date_text: self.date_text.clone(),
        })
    }

    pub fn on_reply(&mut self, reply: WorklogCommandReply) -> Result<(), TransitionError> {
        self.expect_state("accept a reply", matches!(self.state, WorklogState::Submitting))?;
        self.state = match reply {
            WorklogCommandReply::Completed(outcome) => WorklogState::Done(outcome),
            WorklogCommandReply::Clarification(request) => clarification_state(request),
        };
        Ok(())
    }

    pub fn on_failure(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.expect_state("accept a failure", matches!(self.state, WorklogState::Submitting))?;
        self.state = WorklogState::Failed(message.into());
        Ok(())
    }

    /// Applies the user's answer to the pending question. `None` means the prompt was cancelled.
    ///
    /// A missing duration aborts the command. A missing date falls back to the suggested default, then to the fixed
    /// "today" answer, so date questions always lead to another submission.
    pub fn answer(&mut self, answer: Option<&str>) -> Result<(), TransitionError> {
        let answer = answer.map(str::trim).filter(|value| !value.is_empty());
        match &self.state {
            WorklogState::AwaitingDuration { .. } => {
                self.state = match answer {
                    Some(duration) => {
                        self.duration_text = duration.to_string();
                        WorklogState::Submitting
                    }
                    None => WorklogState::Aborted,
                };
                Ok(())
            }
            WorklogState::AwaitingDate { default, .. } => {
                let date = answer
                    .map(str::to_string)
                    .or_else(|| default.clone())
                    .unwrap_or_else(|| self.date_fallback.clone());
                self.date_text = date;
                self.state = WorklogState::Submitting;
                Ok(())
            }
            other => Err(TransitionError::Invalid {
                action: "answer",
                state: other.name(),
            }),
        }
    }

    fn expect_state(&self, action: &'static str, ok: bool) -> Result<(), TransitionError> {
        if ok {
            Ok(())
        } else {
            Err(TransitionError::Invalid {
                action,
                state: self.state.name(),
            })
        }
    }
}

fn clarification_state(request: ClarificationRequest) -> WorklogState {
    let default = request.default.clone().filter(|value| !value.trim().is_empty());
    match request.need() {
        ClarificationNeed::Duration => WorklogState::AwaitingDuration {
            question: request.question,
            default,
        },
        ClarificationNeed::Date => WorklogState::AwaitingDate {
            question: request.question,
            default,
        },
        ClarificationNeed::Other(need) => {
            warn!("Backend asked for unsupported field '{}'", need);
            WorklogState::Aborted
        }
    }
}

/// Source of answers to backend questions.
pub trait Prompter {
    /// Asks `question`, offering `default`. Returns `None` when the user cancels.
    fn ask(&mut self, question: &str, default: Option<&str>) -> Option<String>;
}

/// Prompter reading answers line by line. An empty line accepts the default; end of input cancels.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Option<String> {
        let shown = match default {
            Some(value) => format!("{} [{}]: ", question, value),
            None => format!("{}: ", question),
        };
        if self.output.write_all(shown.as_bytes()).and_then(|_| self.output.flush()).is_err() {
            return None;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    default.map(str::to_string)
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

/// Final result of a driven interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct WorklogRun {
    pub dry_run: bool,
    pub rounds: u32,
    pub state: WorklogState,
}

impl WorklogRun {
    pub fn outcome(&self) -> Option<&WorklogOutcome> {
        match &self.state {
            WorklogState::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Short status line for the finished command.
    pub fn status_line(&self) -> String {
        match &self.state {
            WorklogState::Done(WorklogOutcome::Autofill(_)) if self.dry_run => {
                "Preview plan ready".to_string()
            }
            WorklogState::Done(WorklogOutcome::Autofill(_)) => "OK, worklogs created".to_string(),
            WorklogState::Done(WorklogOutcome::Single(_)) if self.dry_run => {
                "Preview ready".to_string()
            }
            WorklogState::Done(WorklogOutcome::Single(_)) => "OK, worklog created".to_string(),
            WorklogState::Failed(message) => format!("Error: {}", message),
            WorklogState::Aborted => "Cancelled".to_string(),
            other => other.name().to_string(),
        }
    }

    /// Two-step trace of what was detected and what the backend did.
    pub fn steps(&self) -> Vec<Step> {
        match self.outcome() {
            Some(WorklogOutcome::Autofill(plan)) => vec![
                Step::completed(
                    "Detect command",
                    json!({"kind": "autofill", "issue": plan.issue_key}),
                ),
                Step::completed(
                    if self.dry_run { "Preview plan" } else { "Apply plan" },
                    json!({
                        "from": plan.from,
                        "to": plan.to,
                        "timeZone": plan.time_zone,
                        "created": plan.created,
                        "skipped": plan.skipped,
                    }),
                ),
            ],
            Some(WorklogOutcome::Single(entry)) => vec![
                Step::completed(
                    "Detect command",
                    json!({"kind": "single", "issue": entry.issue_key}),
                ),
                Step::completed(
                    if self.dry_run { "Preview worklog" } else { "Create worklog" },
                    json!({
                        "date": entry.date,
                        "timeSpent": entry.time_spent,
                        "started": entry.started,
                        "timeZone": entry.time_zone,
                        "worklogId": entry.worklog_id.clone().unwrap_or_default(),
                    }),
                ),
            ],
            None => Vec::new(),
        }
    }
}

/// Anything that can answer a worklog command round.
#[allow(async_fn_in_trait)]
pub trait WorklogBackend {
    async fn submit(&self, request: &WorklogCommandRequest) -> ApiResult<WorklogCommandReply>;
}

impl WorklogBackend for AssistClient {
    async fn submit(&self, request: &WorklogCommandRequest) -> ApiResult<WorklogCommandReply> {
        self.worklog_command(request).await
    }
}

/// Runs the interaction to a terminal state, one request per round.
pub async fn run_worklog_command<B: WorklogBackend, P: Prompter>(
    backend: &B,
    prompter: &mut P,
    mut interaction: WorklogInteraction,
) -> Result<WorklogRun, TransitionError> {
    interaction.start()?;
    info!(
        "Running worklog command ({})",
        if interaction.dry_run() { "dry run" } else { "apply" }
    );

    loop {
        match interaction.state().clone() {
            WorklogState::Submitting => {
                let request = interaction.next_request()?;
                debug!(
                    "Worklog round {} duration='{}' date='{}'",
                    interaction.rounds(),
                    request.duration_text,
                    request.date_text
                );
                match backend.submit(&request).await {
                    Ok(reply) => interaction.on_reply(reply)?,
                    Err(err) => interaction.on_failure(err.to_string())?,
                }
            }
            WorklogState::AwaitingDuration { question, default }
            | WorklogState::AwaitingDate { question, default } => {
                let answer = prompter.ask(&question, default.as_deref());
                interaction.answer(answer.as_deref())?;
            }
            WorklogState::Idle => interaction.start()?,
            state => {
                return Ok(WorklogRun {
                    dry_run: interaction.dry_run(),
                    rounds: interaction.rounds(),
                    state,
                })
            }
        }
    }
}
