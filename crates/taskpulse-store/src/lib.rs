//! Remote todo-list storage for TaskPulse.
//!
//! One document per user holds all of that user's lists. The document
//! lives in the remote document store at `notes/{user_id}`; this crate
//! provides the wire schema (with migration from the legacy shape), the
//! REST document client, a polling subscription that stands in for a
//! realtime listener, the flattened in-memory list store, and the
//! per-list editor.

pub mod document;
pub mod editor;
pub mod error;
pub mod list_store;
pub mod schema;
pub mod subscription;

pub use document::DocumentClient;
pub use editor::ListEditor;
pub use error::StoreError;
pub use list_store::ListStore;
pub use schema::{ListRecord, NoteDocument, TodoItem, SCHEMA_VERSION};
pub use subscription::{DocumentSubscription, Snapshot};
