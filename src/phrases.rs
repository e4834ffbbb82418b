//! Saved phrase book and its synchronisation with the backend store.

use assist_api::{AssistClient, Phrase, Result as ApiResult};
use log::{debug, warn};

use crate::session::Session;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhraseBook {
    phrases: Vec<Phrase>,
    edit_index: Option<usize>,
}

impl PhraseBook {
    pub fn new(phrases: Vec<Phrase>) -> Self {
        Self {
            phrases,
            edit_index: None,
        }
    }

    /// Loads the book from the backend. A failed load yields an empty book.
    pub async fn load(client: &AssistClient) -> Self {
        Self::try_load(client).await.unwrap_or_else(|err| {
            warn!("Failed to load phrases: {}", err);
            Self::default()
        })
    }

    /// Loads the book, surfacing backend failures. Edits that will be saved must start from this: a save replaces
    /// the whole store.
    pub async fn try_load(client: &AssistClient) -> ApiResult<Self> {
        client.list_phrases().await.map(Self::new)
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn get(&self, index: usize) -> Option<&Phrase> {
        self.phrases.get(index)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn edit_index(&self) -> Option<usize> {
        self.edit_index
    }

    /// Marks `index` for replacement by the next saved draft and returns the phrase to prefill the editor with.
    pub fn begin_edit(&mut self, index: usize) -> Option<&Phrase> {
        let phrase = self.phrases.get(index)?;
        self.edit_index = Some(index);
        Some(phrase)
    }

    pub fn cancel_edit(&mut self) {
        self.edit_index = None;
    }

    /// Stores a draft: replaces the phrase being edited, or appends. Blank text is ignored and returns `false`.
    pub fn apply_draft(&mut self, text: &str, description: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let phrase = Phrase::new(text, description.trim());
        match self.edit_index.take() {
            Some(index) if index < self.phrases.len() => self.phrases[index] = phrase,
            _ => self.phrases.push(phrase),
        }
        true
    }

    /// Removes the phrase at `index`, deselecting it in `session` if it was selected.
    pub fn remove(&mut self, index: usize, session: &mut Session) -> Option<Phrase> {
        if index >= self.phrases.len() {
            return None;
        }
        let removed = self.phrases.remove(index);
        session.phrase_removed(&removed.text);
        if self.edit_index == Some(index) {
            self.edit_index = None;
        }
        Some(removed)
    }

    /// Persists the whole list. On success the book is reloaded from the store so it reflects what was kept; a
    /// failed reload is an error and leaves the local list as it was.
    pub async fn save(&mut self, client: &AssistClient) -> ApiResult<()> {
        client.save_phrases(&self.phrases).await?;
        debug!("Saved {} phrases", self.phrases.len());
        self.phrases = client.list_phrases().await?;
        Ok(())
    }
}
