//! Staff accounts that can sign in to a franchise.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{FranchiseId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of a staff account.
pub struct User {
    pub id: UserId,
    /// Franchise the account belongs to and signs in to.
    pub franchise_id: FranchiseId,
    /// Unique login name.
    pub username: String,
    /// Argon2 PHC string; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    /// Deactivated accounts cannot sign in.
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
/// Payload for registering a new staff account.
pub struct CreateUser {
    pub franchise_id: FranchiseId,
    pub username: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
/// Credentials submitted from the login screen.
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
