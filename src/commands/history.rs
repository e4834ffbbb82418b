//! Search history commands.

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use jira_assist_lib::{render, FollowUp};

use super::Context;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List past searches
    List,

    /// Open an entry and make it current
    Show { id: String },

    /// Find issues inside the current entry
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Send a follow-up command about the current entry
    Ask {
        #[arg(required = true)]
        command: Vec<String>,
    },
}

pub async fn execute(ctx: &mut Context, action: HistoryAction) -> Result<()> {
    match action {
        HistoryAction::List => {
            let entries = ctx.assistant.history().await?;
            ctx.emit(&entries, || render::history_list(&entries))
        }
        HistoryAction::Show { id } => {
            let entry = ctx.assistant.open_history(&mut ctx.session, &id).await?;
            ctx.emit(&entry, || {
                let mut sections = vec![
                    render::history_detail(&entry),
                    render::history_output(&entry).trim_end().to_string(),
                ];
                if !entry.steps.is_empty() {
                    sections.push(render::steps_report(&entry.steps));
                }
                sections.push(render::history_status(&entry));
                sections.join("\n\n")
            })
        }
        HistoryAction::Search { query } => {
            if ctx.session.current_history_id().is_none() {
                return ctx.emit(&json!({"matches": null}), || {
                    "Откройте запись истории для поиска.".to_string()
                });
            }
            let matches = ctx
                .assistant
                .search_history(&ctx.session, &query.join(" "))
                .await?;
            match matches {
                Some(matches) => ctx.emit(&json!({"matches": matches}), || {
                    render::history_matches(&matches)
                }),
                None => Ok(()),
            }
        }
        HistoryAction::Ask { command } => {
            let reply = ctx.assistant.follow_up(&ctx.session, &command.join(" ")).await;
            let value = match &reply {
                FollowUp::Answered(result) => json!({"result": result}),
                FollowUp::Failed(message) => json!({"error": message}),
                FollowUp::NoHistory | FollowUp::Skipped => json!({"result": null}),
            };
            ctx.emit(&value, || reply.message())
        }
    }
}
