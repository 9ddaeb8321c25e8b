use serde::{Deserialize, Serialize};

use super::ERole;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub name: ERole,
}
