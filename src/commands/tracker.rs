//! Account, project and sprint lookups.

use anyhow::Result;

use jira_assist_lib::render;

use super::Context;

pub async fn whoami(ctx: &Context) -> Result<()> {
    let myself = ctx.assistant.myself().await?;
    ctx.emit(&myself, || format!("Logged in as {}", myself.display_name))
}

pub async fn projects(ctx: &Context) -> Result<()> {
    let projects = ctx.assistant.projects().await;
    ctx.emit(&projects, || render::projects_list(&projects))
}

pub async fn sprints(ctx: &Context, project: &str) -> Result<()> {
    let sprints = ctx.assistant.sprints(project).await;
    ctx.emit(&sprints, || render::sprints_list(&sprints, true))
}
