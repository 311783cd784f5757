//! Figures shown on the dashboard of a franchise.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::StudentId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub students: i64,
    pub staff: i64,
    pub disciplines: i64,
    /// Events and promotions running today.
    pub active_events: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StudentBirthday {
    pub student_id: StudentId,
    pub full_name: String,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A birthday falling inside the dashboard's look-ahead window.
pub struct UpcomingBirthday {
    pub student_id: StudentId,
    pub full_name: String,
    pub date: NaiveDate,
    /// Age the student turns on `date`.
    pub turning: u32,
    pub days_until: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub counts: DashboardCounts,
    pub upcoming_birthdays: Vec<UpcomingBirthday>,
    pub generated_on: NaiveDate,
}
