pub mod manager;

pub use manager::{SessionManager, SessionState, PERMISSION_LOAD_FAILED};
