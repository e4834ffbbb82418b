//! Config commands

use anyhow::Result;
use clap::Subcommand;

use super::Context;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print the config file location
    Path,
}

pub fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = ctx.assistant.config();
            ctx.emit(config, || {
                let users = config
                    .users
                    .iter()
                    .map(|user| format!("{} ({})", user.key, user.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                [
                    format!("backend_url = {}", config.backend_url),
                    format!("tracker_url = {}", config.tracker_url),
                    format!("sprint_limit = {}", config.sprint_limit),
                    format!("worklog_comment = {}", config.worklog_comment),
                    format!("date_fallback = {}", config.date_fallback),
                    format!("users = {}", users),
                    format!("worklog keywords = {}", config.keywords.worklog.join(", ")),
                    format!("autofill keywords = {}", config.keywords.autofill.join(", ")),
                ]
                .join("\n")
            })
        }
        ConfigAction::Path => {
            let path = ctx.config_manager.path().display().to_string();
            ctx.emit(&path, || path.clone())
        }
    }
}
