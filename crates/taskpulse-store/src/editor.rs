//! Per-opened-list editor.
//!
//! Every mutation persists immediately: the operation validates, applies
//! to the local copy, and writes the whole list back as a single-field
//! merge. If the write fails the local copy is rolled back, so what the
//! user sees never diverges from remote truth.

use std::sync::Arc;

use uuid::Uuid;

use taskpulse_core::Session;

use crate::document::DocumentClient;
use crate::error::StoreResult;
use crate::schema::{ListRecord, TodoItem};

pub struct ListEditor {
    client: Arc<DocumentClient>,
    session: Session,
    list: ListRecord,
}

impl ListEditor {
    pub fn new(client: Arc<DocumentClient>, session: Session, list: ListRecord) -> Self {
        Self {
            client,
            session,
            list,
        }
    }

    /// The list as currently edited.
    pub fn list(&self) -> &ListRecord {
        &self.list
    }

    pub fn completed_count(&self) -> usize {
        self.list.completed_count()
    }

    pub fn remaining_count(&self) -> usize {
        self.list.remaining_count()
    }

    /// Append a todo. Whitespace-only titles are rejected before any
    /// network traffic happens.
    pub async fn add_todo(&mut self, title: &str) -> StoreResult<TodoItem> {
        let previous = self.list.clone();
        let todo = self.list.add_todo(title)?;
        self.persist(previous).await?;
        Ok(todo)
    }

    /// Flip a todo's completed flag. Returns the new value.
    pub async fn toggle_todo(&mut self, todo_id: Uuid) -> StoreResult<bool> {
        let previous = self.list.clone();
        let completed = self.list.toggle_todo(todo_id)?;
        self.persist(previous).await?;
        Ok(completed)
    }

    /// Rename a todo. Whitespace-only titles leave the original untouched.
    pub async fn rename_todo(&mut self, todo_id: Uuid, title: &str) -> StoreResult<()> {
        let previous = self.list.clone();
        self.list.rename_todo(todo_id, title)?;
        self.persist(previous).await
    }

    /// Remove a todo. (Confirmation prompts are the UI's concern; by the
    /// time this is called the user has confirmed.)
    pub async fn remove_todo(&mut self, todo_id: Uuid) -> StoreResult<TodoItem> {
        let previous = self.list.clone();
        let removed = self.list.remove_todo(todo_id)?;
        self.persist(previous).await?;
        Ok(removed)
    }

    /// Write the current list back; on failure restore `previous` so the
    /// local copy matches what the remote still holds.
    async fn persist(&mut self, previous: ListRecord) -> StoreResult<()> {
        match self
            .client
            .merge_list(&self.session, &self.list.id, &self.list)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(list_id = %self.list.id, "Write failed, rolling back: {}", e);
                self.list = previous;
                Err(e)
            }
        }
    }
}
