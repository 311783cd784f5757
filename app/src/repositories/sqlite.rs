//! SQLite-backed implementation of every repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::models::{
    dashboard::{DashboardCounts, StudentBirthday},
    franchise::Franchise,
    user::{CreateUser, User},
};
use crate::repositories::{DashboardRepository, PermissionRepository, UserRepository};
use crate::types::{FranchiseId, UserId};
use crate::utils::password::hash_password;

const USER_COLUMNS: &str = "id, franchise_id, username, password_hash, full_name, is_active";

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub async fn create_franchise(
        &self,
        name: &str,
        city: Option<&str>,
    ) -> Result<Franchise, AppError> {
        let franchise = sqlx::query_as::<_, Franchise>(
            "INSERT INTO franchises (name, city) VALUES (?, ?) \
             RETURNING id, name, city, is_active",
        )
        .bind(name)
        .bind(city)
        .fetch_one(&self.pool)
        .await?;
        tracing::info!(franchise_id = %franchise.id, name, "Created franchise");
        Ok(franchise)
    }

    pub async fn find_franchise_by_name(&self, name: &str) -> Result<Option<Franchise>, AppError> {
        let franchise = sqlx::query_as::<_, Franchise>(
            "SELECT id, name, city, is_active FROM franchises WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(franchise)
    }

    /// Stores a new account with an Argon2 hash of `payload.password`.
    pub async fn create_user(&self, payload: &CreateUser) -> Result<User, AppError> {
        let password_hash = hash_password(&payload.password)?;
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (franchise_id, username, password_hash, full_name) \
             VALUES (?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(payload.franchise_id)
        .bind(payload.username.trim())
        .bind(password_hash)
        .bind(payload.full_name.trim())
        .fetch_one(&self.pool)
        .await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    pub async fn set_user_active(&self, user_id: UserId, is_active: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }
        Ok(())
    }

    /// Grants `codes` to a user inside a franchise, registering unknown codes first.
    /// Codes already granted are left untouched.
    pub async fn grant_permissions(
        &self,
        user_id: UserId,
        franchise_id: FranchiseId,
        codes: &[&str],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for code in codes {
            sqlx::query("INSERT OR IGNORE INTO permissions (code) VALUES (?)")
                .bind(*code)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT OR IGNORE INTO user_permissions (user_id, franchise_id, permission_code) \
                 VALUES (?, ?, ?)",
            )
            .bind(user_id)
            .bind(franchise_id)
            .bind(*code)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        tracing::debug!(%user_id, %franchise_id, granted = codes.len(), "Granted permissions");
        Ok(())
    }

    pub async fn revoke_permission(
        &self,
        user_id: UserId,
        franchise_id: FranchiseId,
        code: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM user_permissions \
             WHERE user_id = ? AND franchise_id = ? AND permission_code = ?",
        )
        .bind(user_id)
        .bind(franchise_id)
        .bind(code)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, sql: &str, franchise_id: FranchiseId) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(sql)
            .bind(franchise_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl PermissionRepository for SqliteStore {
    async fn permissions_for_user(
        &self,
        user_id: UserId,
        franchise_id: FranchiseId,
    ) -> Result<Vec<String>, AppError> {
        let codes = sqlx::query_scalar::<_, String>(
            "SELECT permission_code FROM user_permissions \
             WHERE user_id = ? AND franchise_id = ? ORDER BY permission_code",
        )
        .bind(user_id)
        .bind(franchise_id)
        .fetch_all(&self.pool)
        .await?;
        tracing::debug!(%user_id, %franchise_id, count = codes.len(), "Fetched permission codes");
        Ok(codes)
    }
}

#[async_trait]
impl DashboardRepository for SqliteStore {
    async fn counts(
        &self,
        franchise_id: FranchiseId,
        today: NaiveDate,
    ) -> Result<DashboardCounts, AppError> {
        let students = self
            .count(
                "SELECT COUNT(*) FROM students WHERE franchise_id = ? AND is_active = 1",
                franchise_id,
            )
            .await?;
        let staff = self
            .count(
                "SELECT COUNT(*) FROM users WHERE franchise_id = ? AND is_active = 1",
                franchise_id,
            )
            .await?;
        let disciplines = self
            .count(
                "SELECT COUNT(*) FROM disciplines WHERE franchise_id = ? AND is_active = 1",
                franchise_id,
            )
            .await?;
        let active_events = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM events \
             WHERE franchise_id = ? AND starts_on <= ? AND ends_on >= ?",
        )
        .bind(franchise_id)
        .bind(today)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardCounts {
            students,
            staff,
            disciplines,
            active_events,
        })
    }

    async fn student_birthdays(
        &self,
        franchise_id: FranchiseId,
    ) -> Result<Vec<StudentBirthday>, AppError> {
        let rows = sqlx::query_as::<_, StudentBirthday>(
            "SELECT id AS student_id, full_name, birth_date FROM students \
             WHERE franchise_id = ? AND is_active = 1 AND birth_date IS NOT NULL \
             ORDER BY full_name",
        )
        .bind(franchise_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
