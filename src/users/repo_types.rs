use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_PROFILE: &str = "User";

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub password: String, // Argon2 PHC string, never exposed in JSON
    pub profile: String,
}

/// Validated insert; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub login: String,
    pub password: String,
    pub profile: String,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub profile: Option<String>,
}
