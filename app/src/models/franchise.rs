use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::FranchiseId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// A branch of the dance-school chain.
pub struct Franchise {
    pub id: FranchiseId,
    pub name: String,
    pub city: Option<String>,
    pub is_active: bool,
}
