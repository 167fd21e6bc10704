//! Standing subscription to a user's note document.
//!
//! The remote store has no push channel here, so the subscription polls.
//! Snapshots are published over a watch channel; subscribers always see
//! the latest one. The subscription never dies on its own: a failed poll
//! republishes the previous snapshot flagged stale and retries with
//! exponential backoff, resetting once a poll succeeds.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use taskpulse_core::Session;

use crate::document::DocumentClient;
use crate::schema::{ListRecord, NoteDocument};

const BACKOFF_BASE_MS: u64 = 1_000;
const BACKOFF_CAP_MS: u64 = 60_000;

/// A point-in-time view of the user's lists.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Flattened list records, in document key order.
    pub lists: Vec<ListRecord>,
    /// True while the data may be out of date (before the first successful
    /// poll, and after any failed one).
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    fn initial() -> Self {
        Self {
            lists: Vec::new(),
            stale: true,
            fetched_at: Utc::now(),
        }
    }
}

/// Backoff delay after `consecutive_failures` failed polls (1-based).
fn backoff_delay(consecutive_failures: u32) -> Duration {
    let factor = 2u64.saturating_pow(consecutive_failures.saturating_sub(1));
    let delay_ms = BACKOFF_BASE_MS.saturating_mul(factor).min(BACKOFF_CAP_MS);
    Duration::from_millis(delay_ms)
}

/// Handle to a running document subscription.
///
/// Dropping the handle cancels the polling task.
pub struct DocumentSubscription {
    rx: watch::Receiver<Snapshot>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl DocumentSubscription {
    /// Open a subscription for the session's user, polling at
    /// `poll_interval`. The first poll happens immediately; if the
    /// document does not exist yet an empty one is created.
    pub fn open(client: DocumentClient, session: Session, poll_interval: Duration) -> Self {
        let (tx, rx) = watch::channel(Snapshot::initial());
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            poll_loop(client, session, poll_interval, tx, task_cancel).await;
        });

        Self { rx, cancel, handle }
    }

    /// Receiver of published snapshots. `borrow()` yields the latest.
    pub fn snapshots(&self) -> watch::Receiver<Snapshot> {
        self.rx.clone()
    }

    /// Cancel the subscription and wait for the polling task to finish.
    pub async fn close(mut self) {
        self.cancel.cancel();
        let _ = (&mut self.handle).await;
    }
}

impl Drop for DocumentSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    client: DocumentClient,
    session: Session,
    poll_interval: Duration,
    tx: watch::Sender<Snapshot>,
    cancel: CancellationToken,
) {
    let mut failures: u32 = 0;

    loop {
        match fetch_or_create(&client, &session).await {
            Ok(doc) => {
                if failures > 0 {
                    tracing::info!(user_id = %session.user_id, "Document poll recovered");
                }
                failures = 0;
                let _ = tx.send(Snapshot {
                    lists: doc.flattened(),
                    stale: false,
                    fetched_at: Utc::now(),
                });
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(
                    user_id = %session.user_id,
                    consecutive_failures = failures,
                    "Document poll failed: {}",
                    e
                );
                // Keep showing the last known data, flagged stale.
                tx.send_modify(|snapshot| snapshot.stale = true);
            }
        }

        let delay = if failures == 0 {
            poll_interval
        } else {
            backoff_delay(failures)
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(user_id = %session.user_id, "Subscription cancelled");
                break;
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

async fn fetch_or_create(
    client: &DocumentClient,
    session: &Session,
) -> crate::error::StoreResult<NoteDocument> {
    match client.get(session).await? {
        Some(doc) => Ok(doc),
        None => {
            let doc = NoteDocument::empty();
            client.put(session, &doc).await?;
            tracing::info!(user_id = %session.user_id, "Created empty note document");
            Ok(doc)
        }
    }
}
