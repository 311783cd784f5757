pub mod auth;
pub mod dashboard;

pub use auth::{validate_credentials, AuthService};
pub use dashboard::{upcoming_birthdays, DashboardService, RefreshHandle};
