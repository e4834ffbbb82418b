//! Project, user and sprint filter commands.

use anyhow::{bail, Result};
use clap::Subcommand;
use serde_json::json;

use jira_assist_lib::render;

use super::Context;

#[derive(Subcommand)]
pub enum SelectAction {
    /// Filter by one project, or by all of them
    Projects {
        /// Project key
        #[arg(conflicts_with = "all", required_unless_present = "all")]
        key: Option<String>,

        #[arg(long)]
        all: bool,
    },

    /// Check or uncheck users in the user filter
    Users {
        /// User keys from the configured user list
        #[arg(conflicts_with = "all", required_unless_present = "all")]
        keys: Vec<String>,

        /// Uncheck the given users instead
        #[arg(long)]
        remove: bool,

        #[arg(long)]
        all: bool,
    },

    /// Narrow the search to a sprint of the current project (0 = whole project)
    Sprint { id: u64 },

    /// Show the active filters
    Show,
}

pub async fn execute(ctx: &mut Context, action: SelectAction) -> Result<()> {
    match action {
        SelectAction::Projects { key, all } => {
            let key = if all { None } else { key };
            let sprints = ctx
                .assistant
                .choose_project(&mut ctx.session, key.as_deref())
                .await;
            let has_project = ctx.session.current_project().is_some();
            ctx.emit(&sprints, || render::sprints_list(&sprints, has_project))
        }
        SelectAction::Users { keys, remove, all } => {
            let known = ctx.assistant.config().user_keys();
            if let Some(unknown) = keys.iter().find(|key| !known.contains(key)) {
                bail!("unknown user '{}'; add it to the config users list", unknown);
            }
            if all {
                ctx.session.users_mut().set_all(true);
            }
            for key in &keys {
                ctx.session.users_mut().set_item(key, !remove);
            }
            show(ctx)
        }
        SelectAction::Sprint { id } => {
            if id != 0 && ctx.session.current_project().is_none() {
                bail!("select a project first");
            }
            ctx.session.select_sprint(id);
            show(ctx)
        }
        SelectAction::Show => show(ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let session = &ctx.session;
    let value = json!({
        "projects": session.projects(),
        "users": session.users(),
        "sprintId": session.sprint_id(),
    });
    ctx.emit(&value, || {
        let projects = session.current_project().unwrap_or("Все проекты");
        let users = if session.users().is_all() {
            "Все пользователи".to_string()
        } else {
            session.users().checked().join(", ")
        };
        let sprint = match session.sprint_id() {
            0 => "Весь проект".to_string(),
            id => id.to_string(),
        };
        format!("Project: {}\nUsers: {}\nSprint: {}", projects, users, sprint)
    })
}
