use serde::{Deserialize, Serialize};

/// The account record at `users/{user_id}`.
///
/// Deliberately has no password field: credentials live only with the
/// auth collaborator. Unknown fields in legacy documents (which did store
/// a plaintext password) are dropped on read and never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
}

/// The editable profile at `profile/{user_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}
