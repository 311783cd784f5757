use std::sync::Arc;

use crate::error::AuthError;
use crate::models::user::{LoginRequest, User};
use crate::repositories::UserRepository;
use crate::utils::password::{verify_against_placeholder, verify_password};

pub fn validate_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    if username.trim().is_empty() {
        return Err(AuthError::MissingUsername);
    }
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(())
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Checks the submitted credentials against the stored Argon2 hash.
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn authenticate(&self, request: &LoginRequest) -> Result<User, AuthError> {
        validate_credentials(&request.username, &request.password)?;
        let username = request.username.trim();

        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(|err| {
                tracing::error!(username, error = %err, "User lookup failed during login");
                AuthError::Unavailable(err)
            })?;
        let Some(user) = user else {
            verify_against_placeholder(&request.password);
            tracing::info!(username, "Login rejected: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        match verify_password(&request.password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(user_id = %user.id, "Login rejected: wrong password");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                tracing::error!(user_id = %user.id, error = %err, "Stored password hash is unusable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        if !user.is_active {
            tracing::info!(user_id = %user.id, "Login rejected: account disabled");
            return Err(AuthError::Disabled);
        }

        Ok(user)
    }
}
