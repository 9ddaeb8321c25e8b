use async_trait::async_trait;

use super::{PgStore, StoreError};
use crate::models::{Id, Resource, ResourceStatus, ResourceType};

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Resource>, StoreError>;
    async fn find_by_id(&self, id: Id) -> Result<Option<Resource>, StoreError>;
    async fn save(&self, resource: &Resource) -> Result<Resource, StoreError>;
    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError>;
    async fn find_by_type(&self, resource_type: ResourceType) -> Result<Vec<Resource>, StoreError>;
    async fn find_by_status(&self, status: ResourceStatus) -> Result<Vec<Resource>, StoreError>;
    async fn find_by_type_and_status(
        &self,
        resource_type: ResourceType,
        status: ResourceStatus,
    ) -> Result<Vec<Resource>, StoreError>;
    async fn find_by_quantity_available_greater_than(
        &self,
        quantity: i32,
    ) -> Result<Vec<Resource>, StoreError>;
}

#[async_trait]
impl ResourceRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<Resource>, StoreError> {
        let resources = sqlx::query_as::<_, Resource>("SELECT * FROM resources ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(resources)
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<Resource>, StoreError> {
        let resource = sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(resource)
    }

    async fn save(&self, resource: &Resource) -> Result<Resource, StoreError> {
        match resource.id {
            None => {
                let saved = sqlx::query_as::<_, Resource>(
                    "INSERT INTO resources (name, description, resource_type, status,
                        quantity_available, unit, unit_cost, location, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                     RETURNING *",
                )
                .bind(&resource.name)
                .bind(&resource.description)
                .bind(resource.resource_type)
                .bind(resource.status)
                .bind(resource.quantity_available)
                .bind(&resource.unit)
                .bind(resource.unit_cost)
                .bind(&resource.location)
                .bind(resource.created_at)
                .bind(resource.updated_at)
                .fetch_one(self.pool())
                .await?;
                Ok(saved)
            }
            Some(id) => sqlx::query_as::<_, Resource>(
                "UPDATE resources SET name = $2, description = $3, resource_type = $4,
                    status = $5, quantity_available = $6, unit = $7, unit_cost = $8,
                    location = $9, created_at = $10, updated_at = $11
                 WHERE id = $1
                 RETURNING *",
            )
            .bind(id)
            .bind(&resource.name)
            .bind(&resource.description)
            .bind(resource.resource_type)
            .bind(resource.status)
            .bind(resource.quantity_available)
            .bind(&resource.unit)
            .bind(resource.unit_cost)
            .bind(&resource.location)
            .bind(resource.created_at)
            .bind(resource.updated_at)
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::Missing {
                table: "resources",
                id,
            }),
        }
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn find_by_type(&self, resource_type: ResourceType) -> Result<Vec<Resource>, StoreError> {
        let resources = sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources WHERE resource_type = $1 ORDER BY id",
        )
        .bind(resource_type)
        .fetch_all(self.pool())
        .await?;
        Ok(resources)
    }

    async fn find_by_status(&self, status: ResourceStatus) -> Result<Vec<Resource>, StoreError> {
        let resources =
            sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE status = $1 ORDER BY id")
                .bind(status)
                .fetch_all(self.pool())
                .await?;
        Ok(resources)
    }

    async fn find_by_type_and_status(
        &self,
        resource_type: ResourceType,
        status: ResourceStatus,
    ) -> Result<Vec<Resource>, StoreError> {
        let resources = sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources WHERE resource_type = $1 AND status = $2 ORDER BY id",
        )
        .bind(resource_type)
        .bind(status)
        .fetch_all(self.pool())
        .await?;
        Ok(resources)
    }

    async fn find_by_quantity_available_greater_than(
        &self,
        quantity: i32,
    ) -> Result<Vec<Resource>, StoreError> {
        let resources = sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources WHERE quantity_available > $1 ORDER BY id",
        )
        .bind(quantity)
        .fetch_all(self.pool())
        .await?;
        Ok(resources)
    }
}
