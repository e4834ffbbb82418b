//! Saved phrase commands.

use anyhow::{anyhow, bail, Result};
use clap::Subcommand;

use jira_assist_lib::PhraseBook;

use super::Context;

#[derive(Subcommand)]
pub enum PhraseAction {
    /// List saved phrases
    List,

    /// Save a new phrase
    Add {
        text: String,

        #[arg(long, short, default_value = "")]
        description: String,
    },

    /// Replace a phrase by its number
    Edit {
        number: usize,

        text: String,

        /// Keeps the current description when omitted
        #[arg(long, short)]
        description: Option<String>,
    },

    /// Delete a phrase by its number
    Remove { number: usize },

    /// Use a phrase as the query; selecting it again deselects it
    Select { number: usize },

    /// Go back to the typed query
    Deselect,

    /// Drop the selection and the JQL preview
    Cancel,
}

fn index_of(book: &PhraseBook, number: usize) -> Result<usize> {
    match number.checked_sub(1) {
        Some(index) if index < book.len() => Ok(index),
        _ => Err(anyhow!("no phrase #{} (have {})", number, book.len())),
    }
}

pub async fn execute(ctx: &mut Context, action: PhraseAction) -> Result<()> {
    let client = ctx.assistant.client();
    match action {
        PhraseAction::List => {
            let book = PhraseBook::load(client).await;
            list(ctx, &book)
        }
        PhraseAction::Add { text, description } => {
            let mut book = PhraseBook::try_load(client).await?;
            if !book.apply_draft(&text, &description) {
                bail!("phrase text is empty");
            }
            book.save(client).await?;
            list(ctx, &book)
        }
        PhraseAction::Edit {
            number,
            text,
            description,
        } => {
            let mut book = PhraseBook::try_load(client).await?;
            let index = index_of(&book, number)?;
            let current = book
                .begin_edit(index)
                .map(|phrase| phrase.description.clone())
                .unwrap_or_default();
            let description = description.unwrap_or(current);
            if !book.apply_draft(&text, &description) {
                book.cancel_edit();
                bail!("phrase text is empty");
            }
            book.save(client).await?;
            list(ctx, &book)
        }
        PhraseAction::Remove { number } => {
            let mut book = PhraseBook::try_load(client).await?;
            let index = index_of(&book, number)?;
            book.remove(index, &mut ctx.session);
            book.save(client).await?;
            list(ctx, &book)
        }
        PhraseAction::Select { number } => {
            let book = PhraseBook::load(client).await;
            let index = index_of(&book, number)?;
            if let Some(phrase) = book.get(index) {
                ctx.session.toggle_phrase(&phrase.text);
            }
            list(ctx, &book)
        }
        PhraseAction::Deselect | PhraseAction::Cancel => {
            ctx.session.clear_phrase_selection();
            Ok(())
        }
    }
}

fn list(ctx: &Context, book: &PhraseBook) -> Result<()> {
    let selected = ctx.session.selected_phrase();
    ctx.emit(book.phrases(), || {
        if book.is_empty() {
            return "Нет сохранённых фраз".to_string();
        }
        book.phrases()
            .iter()
            .enumerate()
            .map(|(index, phrase)| {
                let marker = if selected == Some(phrase.text.as_str()) { "*" } else { " " };
                let mut line = format!("{}{:>3}. {}", marker, index + 1, phrase.text);
                if !phrase.description.is_empty() {
                    line.push_str(&format!("  ({})", phrase.description));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}
