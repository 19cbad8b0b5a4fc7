use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record held by a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,              // assigned by the directory
    pub email: String,        // exact-match uniqueness key
    #[serde(skip_serializing)]
    pub password_hash: String, // "salt.digest", not exposed in JSON
}
