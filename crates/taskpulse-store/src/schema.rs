//! Wire schema for the per-user note document, with migration.
//!
//! Current shape (version 2):
//! ```json
//! { "schema_version": 2, "lists": { "list-<uuid>": { "id": "...", "name": "...",
//!   "color": "#8022D9", "todos": [ { "id": "<uuid>", "title": "...", "completed": false } ] } } }
//! ```
//!
//! The legacy shape had dynamically named `taskN` fields, each holding a
//! one-element array of a list record, and todos carried no identifier.
//! [`NoteDocument::from_json`] detects that shape and migrates it,
//! assigning todo ids as it goes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Current document schema version.
pub const SCHEMA_VERSION: u32 = 2;

/// One titled, completable unit inside a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Stable identity assigned at creation. Operations address todos by
    /// id, never by position.
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

impl TodoItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
        }
    }
}

/// A named, colored collection of todo items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
}

impl ListRecord {
    /// Create a new list with a generated `list-<uuid>` identifier.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: format!("list-{}", Uuid::new_v4()),
            name: name.into(),
            color: color.into(),
            todos: Vec::new(),
        }
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    fn position_of(&self, todo_id: Uuid) -> StoreResult<usize> {
        self.todos
            .iter()
            .position(|t| t.id == todo_id)
            .ok_or_else(|| StoreError::not_found(format!("todo {}", todo_id)))
    }

    /// Append a new todo. Titles that are empty after trimming are
    /// rejected and the list is left unchanged.
    pub fn add_todo(&mut self, title: &str) -> StoreResult<TodoItem> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(StoreError::validation("Todo title cannot be empty"));
        }

        let todo = TodoItem::new(trimmed);
        self.todos.push(todo.clone());
        Ok(todo)
    }

    /// Flip the completed flag. Returns the new value.
    pub fn toggle_todo(&mut self, todo_id: Uuid) -> StoreResult<bool> {
        let pos = self.position_of(todo_id)?;
        self.todos[pos].completed = !self.todos[pos].completed;
        Ok(self.todos[pos].completed)
    }

    /// Replace a todo's title. Empty trimmed text is rejected and the
    /// original title is left untouched.
    pub fn rename_todo(&mut self, todo_id: Uuid, title: &str) -> StoreResult<()> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(StoreError::validation("Todo title cannot be empty"));
        }

        let pos = self.position_of(todo_id)?;
        self.todos[pos].title = trimmed.to_string();
        Ok(())
    }

    /// Remove a todo, preserving the relative order of the rest.
    pub fn remove_todo(&mut self, todo_id: Uuid) -> StoreResult<TodoItem> {
        let pos = self.position_of(todo_id)?;
        Ok(self.todos.remove(pos))
    }
}

/// The per-user document holding all lists, keyed by list id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub lists: BTreeMap<String, ListRecord>,
}

impl NoteDocument {
    /// An empty current-version document.
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            lists: BTreeMap::new(),
        }
    }

    /// Flatten the document into a sequence of list records, in key order.
    pub fn flattened(&self) -> Vec<ListRecord> {
        self.lists.values().cloned().collect()
    }

    /// Parse a raw document, migrating the legacy shape if necessary.
    ///
    /// # Errors
    /// Returns `StoreError::Schema` for non-object documents, unsupported
    /// versions, and malformed fields. Malformed data is rejected, not
    /// silently dropped.
    pub fn from_json(value: Value) -> StoreResult<Self> {
        let Value::Object(ref map) = value else {
            return Err(StoreError::schema("document is not an object"));
        };

        match map.get("schema_version") {
            Some(version) => {
                let version = version
                    .as_u64()
                    .ok_or_else(|| StoreError::schema("schema_version is not a number"))?;
                if version != u64::from(SCHEMA_VERSION) {
                    return Err(StoreError::schema(format!(
                        "unsupported schema version {}",
                        version
                    )));
                }
                serde_json::from_value(value)
                    .map_err(|e| StoreError::schema(format!("invalid document: {}", e)))
            }
            None => Self::migrate_legacy(map),
        }
    }

    /// Migrate the legacy duck-typed shape: each field is a one-element
    /// array wrapping a list record, and todos have no ids.
    fn migrate_legacy(map: &serde_json::Map<String, Value>) -> StoreResult<Self> {
        #[derive(Deserialize)]
        struct LegacyTodo {
            title: String,
            #[serde(default)]
            completed: bool,
        }

        #[derive(Deserialize)]
        struct LegacyRecord {
            id: String,
            name: String,
            color: String,
            #[serde(default)]
            todos: Vec<LegacyTodo>,
        }

        let mut lists = BTreeMap::new();

        for (key, field) in map {
            let records: Vec<LegacyRecord> = serde_json::from_value(field.clone())
                .map_err(|e| StoreError::schema(format!("malformed field {}: {}", key, e)))?;

            // The legacy writer always produced one-element arrays, but the
            // store never enforced it; flatten whatever is there.
            for record in records {
                let migrated = ListRecord {
                    id: record.id.clone(),
                    name: record.name,
                    color: record.color,
                    todos: record
                        .todos
                        .into_iter()
                        .map(|t| TodoItem {
                            id: Uuid::new_v4(),
                            title: t.title,
                            completed: t.completed,
                        })
                        .collect(),
                };
                lists.insert(record.id, migrated);
            }
        }

        tracing::info!("Migrated legacy note document with {} lists", lists.len());

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            lists,
        })
    }
}
