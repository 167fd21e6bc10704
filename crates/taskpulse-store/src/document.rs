//! REST client for the remote document store.
//!
//! Documents live at `/v1/notes/{user_id}`. Reads go through
//! [`NoteDocument::from_json`] so legacy-shaped documents are migrated
//! transparently; writes always produce the current schema version.

use std::time::Duration;

use tracing::instrument;

use taskpulse_core::Session;

use crate::error::{StoreError, StoreResult};
use crate::schema::{ListRecord, NoteDocument};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct DocumentClient {
    client: reqwest::Client,
    base_url: String,
}

impl DocumentClient {
    pub fn new(base_url: &str) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn doc_url(&self, user_id: &str) -> String {
        format!("{}/v1/notes/{}", self.base_url, urlencoding::encode(user_id))
    }

    /// Fetch the user's note document. Returns `None` if it doesn't exist.
    #[instrument(skip(self, session), fields(user_id = %session.user_id), level = "debug")]
    pub async fn get(&self, session: &Session) -> StoreResult<Option<NoteDocument>> {
        let response = self
            .client
            .get(self.doc_url(&session.user_id))
            .bearer_auth(&session.id_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let raw: serde_json::Value = response.json().await?;
        NoteDocument::from_json(raw).map(Some)
    }

    /// Write the whole document (used to create the empty document for a
    /// new user).
    #[instrument(skip(self, session, doc), fields(user_id = %session.user_id), level = "debug")]
    pub async fn put(&self, session: &Session, doc: &NoteDocument) -> StoreResult<()> {
        let response = self
            .client
            .put(self.doc_url(&session.user_id))
            .bearer_auth(&session.id_token)
            .json(doc)
            .send()
            .await?;

        Self::check_status(response).await.map(|_| ())
    }

    /// Merge a single list into the document without touching the others.
    #[instrument(skip(self, session, list), fields(user_id = %session.user_id), level = "debug")]
    pub async fn merge_list(
        &self,
        session: &Session,
        key: &str,
        list: &ListRecord,
    ) -> StoreResult<()> {
        let body = serde_json::json!({ "lists": { key: list } });

        let response = self
            .client
            .patch(self.doc_url(&session.user_id))
            .bearer_auth(&session.id_token)
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!(%status, "Document request failed: {}", message);
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
