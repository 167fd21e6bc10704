//! In-memory view of all todo lists for the current user.
//!
//! Local state is a cache over the remote document: snapshots replace it
//! wholesale (last writer wins), and mutations persist remotely before the
//! cache changes, so a failed write leaves the cache consistent with
//! remote truth.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use taskpulse_core::Session;

use crate::document::DocumentClient;
use crate::editor::ListEditor;
use crate::error::{StoreError, StoreResult};
use crate::schema::ListRecord;
use crate::subscription::Snapshot;

pub struct ListStore {
    client: Arc<DocumentClient>,
    session: Session,
    lists: RwLock<Vec<ListRecord>>,
}

impl ListStore {
    pub fn new(client: Arc<DocumentClient>, session: Session) -> Self {
        Self {
            client,
            session,
            lists: RwLock::new(Vec::new()),
        }
    }

    /// Replace local state with a snapshot's contents.
    pub fn apply_snapshot(&self, snapshot: &Snapshot) {
        *self.lists.write() = snapshot.lists.clone();
    }

    /// Apply snapshots as they arrive, until the sender side goes away.
    /// Intended to be driven by [`crate::DocumentSubscription::snapshots`].
    pub async fn sync_from(&self, mut rx: watch::Receiver<Snapshot>) {
        // Pick up whatever is already published before waiting for changes.
        self.apply_snapshot(&rx.borrow().clone());

        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow().clone();
            if snapshot.stale {
                tracing::debug!("Applying stale snapshot ({} lists)", snapshot.lists.len());
            }
            self.apply_snapshot(&snapshot);
        }
    }

    /// Current flattened sequence of list records.
    pub fn lists(&self) -> Vec<ListRecord> {
        self.lists.read().clone()
    }

    pub fn len(&self) -> usize {
        self.lists.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.read().is_empty()
    }

    /// Create a new list and persist it.
    ///
    /// The key is derived from a generated uuid, so repeated adds and
    /// deletions can never collide. The record is appended to local state
    /// only after the remote write succeeds; on failure local state is
    /// unchanged and the error is returned for the UI to surface.
    pub async fn add_list(&self, name: &str, color: &str) -> StoreResult<ListRecord> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(StoreError::validation("List name cannot be empty"));
        }

        let record = ListRecord::new(trimmed, color);

        self.client
            .merge_list(&self.session, &record.id, &record)
            .await?;

        self.lists.write().push(record.clone());
        tracing::info!(list_id = %record.id, "Added list");
        Ok(record)
    }

    /// Open an editor over one of the lists. Returns `NotFound` if the id
    /// isn't present in the current local state.
    pub fn open_editor(&self, list_id: &str) -> StoreResult<ListEditor> {
        let list = self
            .lists
            .read()
            .iter()
            .find(|l| l.id == list_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("list {}", list_id)))?;

        Ok(ListEditor::new(
            Arc::clone(&self.client),
            self.session.clone(),
            list,
        ))
    }
}
