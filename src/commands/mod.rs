//! CLI commands module
//!
//! Each submodule parses one subcommand group and drives the library operations behind it.

pub mod config;
pub mod history;
pub mod phrases;
pub mod query;
pub mod select;
pub mod tracker;

use anyhow::Result;
use serde::Serialize;

use jira_assist_lib::{Assistant, ConfigManager, Session};

/// Shared context for all commands
pub struct Context {
    pub assistant: Assistant,
    pub config_manager: ConfigManager,
    /// Persisted by `main` after the command finishes.
    pub session: Session,
    pub json: bool,
}

impl Context {
    /// Prints `value` as JSON in `--json` mode, otherwise the text produced by `text`.
    pub fn emit<T, F>(&self, value: &T, text: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let text = text();
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Ok(())
    }
}
