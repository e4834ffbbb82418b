//! Query editing and submission commands.

use std::io;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use jira_assist_lib::{render, ConsolePrompter, Submission, WorklogState};

use super::Context;

#[derive(Subcommand)]
pub enum QueryAction {
    /// Replace the query text
    Set {
        /// Query words; joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show the query, selected phrase and JQL
    Show,

    /// Show how the current query will be handled
    Classify,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Resolve without executing (JQL preview or worklog preview)
    #[arg(long)]
    preview: bool,

    /// Ask the backend for an analysis of the results
    #[arg(long)]
    analysis: bool,

    /// Include the raw search payload
    #[arg(long)]
    raw: bool,

    /// JQL to use instead of resolving the query
    #[arg(long)]
    jql: Option<String>,
}

pub fn execute(ctx: &mut Context, action: QueryAction) -> Result<()> {
    match action {
        QueryAction::Set { text } => {
            ctx.session.set_query_text(text.join(" "))?;
            show(ctx)
        }
        QueryAction::Show => show(ctx),
        QueryAction::Classify => classify(ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let session = &ctx.session;
    let value = json!({
        "query": session.effective_query(),
        "selectedPhrase": session.selected_phrase(),
        "editable": session.query_editable(),
        "jql": session.jql(),
    });
    ctx.emit(&value, || {
        let mut lines = vec![format!("Query: {}", session.effective_query())];
        if let Some(phrase) = session.selected_phrase() {
            lines.push(format!("Phrase selected (query locked): {}", phrase));
        }
        if !session.jql().is_empty() {
            lines.push(format!("JQL: {}", session.jql()));
        }
        lines.join("\n")
    })
}

fn classify(ctx: &Context) -> Result<()> {
    let classification = ctx.assistant.classify(&ctx.session);
    let labels = classification.labels();
    let value = json!({
        "kind": classification.kind,
        "issue": classification.issue,
        "labels": labels,
    });
    ctx.emit(&value, || {
        let mut lines = vec![format!("Kind: {:?}", classification.kind)];
        if let Some(issue) = &classification.issue {
            lines.push(format!("Issue: {}", issue));
        }
        lines.push(format!("Preview: {}", labels.preview));
        lines.push(format!("Run: {}", labels.run));
        lines.join("\n")
    })
}

pub async fn search(ctx: &mut Context, args: SearchArgs) -> Result<()> {
    if let Some(jql) = args.jql {
        ctx.session.set_jql(jql);
    }

    let mut prompter = ConsolePrompter::new(io::stdin().lock(), io::stderr());
    let submission = ctx
        .assistant
        .submit(&mut ctx.session, &mut prompter, args.preview, args.analysis)
        .await?;
    let status = submission.status_line();

    match submission {
        Submission::Search { response, .. } => {
            let config = ctx.assistant.config();
            ctx.emit(&response, || {
                let mut text = render::search_report(&response, args.raw, config);
                if let Some(steps) = response.steps.as_deref().filter(|steps| !steps.is_empty()) {
                    text.push_str("\nSteps:\n");
                    text.push_str(&render::steps_report(steps));
                    text.push('\n');
                }
                text.push_str(&status);
                text
            })
        }
        Submission::Worklog(run) => {
            let steps = run.steps();
            let value = json!({
                "status": status,
                "dryRun": run.dry_run,
                "rounds": run.rounds,
                "outcome": run.outcome(),
                "steps": steps,
            });
            ctx.emit(&value, || {
                let mut sections = Vec::new();
                if let Some(outcome) = run.outcome() {
                    sections.push(render::worklog_report(outcome, run.dry_run));
                    sections.push(render::steps_report(&steps));
                }
                sections.push(status.clone());
                sections.join("\n")
            })?;
            if let WorklogState::Failed(message) = &run.state {
                bail!("worklog command failed: {}", message);
            }
            Ok(())
        }
    }
}
