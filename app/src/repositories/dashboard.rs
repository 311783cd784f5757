use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::models::dashboard::{DashboardCounts, StudentBirthday};
use crate::types::FranchiseId;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Headline counts for a franchise; `today` decides which events are running.
    async fn counts(
        &self,
        franchise_id: FranchiseId,
        today: NaiveDate,
    ) -> Result<DashboardCounts, AppError>;

    /// Active students of a franchise that have a birth date on file.
    async fn student_birthdays(
        &self,
        franchise_id: FranchiseId,
    ) -> Result<Vec<StudentBirthday>, AppError>;
}
