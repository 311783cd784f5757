use async_trait::async_trait;

use crate::error::AppError;
use crate::types::{FranchiseId, UserId};

/// Source of the permission codes granted to a user inside one franchise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn permissions_for_user(
        &self,
        user_id: UserId,
        franchise_id: FranchiseId,
    ) -> Result<Vec<String>, AppError>;
}
