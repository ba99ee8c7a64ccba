use serde::{Deserialize, Serialize};

use super::enums::Role;

/// Identity record, keyed by email. Created at registration, mutated by
/// login-counter increments and profile edits, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    /// One-way PBKDF2 hash; the plaintext is never stored or logged.
    pub password_hash: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub role: Role,
    #[serde(default)]
    pub login_count: u64,
    /// Doctors only; absent for patients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    pub created_at: String,
}

/// Profile edit. Name/age/gender always overwrite; specialization is only
/// persisted for doctors (the core drops it for patients before the store
/// sees it).
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub specialization: Option<String>,
}
