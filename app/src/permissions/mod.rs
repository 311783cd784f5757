//! Permission codes, the module table and the per-user capability resolver.

pub mod helper;
pub mod table;

pub use helper::{ModuleCapabilities, PermissionHelper, PermissionState};
pub use table::{codes, Action, Module, PERMISSION_TABLE};
