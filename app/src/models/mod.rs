//! Data models shared across the store, the services and the session layer.

pub mod dashboard;
pub mod franchise;
pub mod user;

pub use dashboard::{DashboardCounts, DashboardSnapshot, StudentBirthday, UpcomingBirthday};
pub use franchise::Franchise;
pub use user::{CreateUser, LoginRequest, User};
