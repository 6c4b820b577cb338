use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

pub const FIRST_USER_PREFIX: &str = "testuser";
pub const FIRST_USER_NAME: &str = "Test User Python";
pub const SECOND_USER_PREFIX: &str = "testuser2";
pub const SECOND_USER_NAME: &str = "Test User Python 2";

/// Throwaway row inserted into the `users` table by the probe.
#[derive(Debug, Clone, Serialize)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

impl TestUser {
    /// Fresh user with a random id and a `<prefix>_<unix seconds>` username.
    pub fn generate(username_prefix: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: format!("{}_{}", username_prefix, Utc::now().timestamp()),
            name: name.to_string(),
        }
    }

    /// The user sent with `Prefer: return=representation`.
    pub fn first() -> Self {
        Self::generate(FIRST_USER_PREFIX, FIRST_USER_NAME)
    }

    /// The user sent with `Prefer: return=minimal`.
    pub fn second() -> Self {
        Self::generate(SECOND_USER_PREFIX, SECOND_USER_NAME)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
