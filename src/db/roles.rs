use async_trait::async_trait;

use super::{PgStore, StoreError};
use crate::models::{ERole, Role};

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Role>, StoreError>;
    async fn find_by_name(&self, name: ERole) -> Result<Option<Role>, StoreError>;
}

#[async_trait]
impl RoleRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<Role>, StoreError> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(roles)
    }

    async fn find_by_name(&self, name: ERole) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        Ok(role)
    }
}
