pub mod dashboard;
pub mod permissions;
pub mod sqlite;
pub mod user_repository;

pub use dashboard::DashboardRepository;
pub use permissions::PermissionRepository;
pub use sqlite::SqliteStore;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use dashboard::MockDashboardRepository;
#[cfg(test)]
pub use permissions::MockPermissionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
