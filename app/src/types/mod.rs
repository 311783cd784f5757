pub mod id;

pub use id::{FranchiseId, StudentId, UserId};
