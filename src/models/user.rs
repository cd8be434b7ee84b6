// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Represents the 'users' table in the database.
/// A local mirror of the identity provider's profile, keyed by the provider's user id.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Display fields supplied by the identity provider, used to upsert a `UserProfile`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
}
