use async_trait::async_trait;
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryScalar;

use super::{PgStore, StoreError};
use crate::models::{Id, Project, ProjectStatus};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Project>, StoreError>;
    async fn find_by_id(&self, id: Id) -> Result<Option<Project>, StoreError>;
    /// Inserts when `id` is unset, otherwise overwrites the row. Team
    /// membership is replaced in the same transaction.
    async fn save(&self, project: &Project) -> Result<Project, StoreError>;
    /// Removes the project together with its tasks, issues and memberships.
    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError>;
    async fn find_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, StoreError>;
    async fn find_by_project_manager(&self, user_id: Id) -> Result<Vec<Project>, StoreError>;
    async fn find_by_team_member(&self, user_id: Id) -> Result<Vec<Project>, StoreError>;
    async fn find_by_project_number(&self, number: &str) -> Result<Option<Project>, StoreError>;
}

const SELECT_PROJECTS: &str = "SELECT p.*, ARRAY(
        SELECT m.user_id FROM project_team_members m
        WHERE m.project_id = p.id ORDER BY m.user_id
    ) AS team_member_ids
    FROM projects p";

type IdQuery<'q> = QueryScalar<'q, Postgres, Id, PgArguments>;

// Binds $1..$18 in column order shared by INSERT and UPDATE.
fn bind_columns<'q>(query: IdQuery<'q>, p: &'q Project) -> IdQuery<'q> {
    query
        .bind(&p.name)
        .bind(&p.description)
        .bind(&p.project_number)
        .bind(p.start_date)
        .bind(p.end_date)
        .bind(p.budget_amount)
        .bind(p.budget_spent)
        .bind(p.status)
        .bind(&p.location_address)
        .bind(&p.location_city)
        .bind(&p.location_state)
        .bind(&p.location_zip)
        .bind(&p.location_country)
        .bind(&p.cover_image_url)
        .bind(p.project_manager_id)
        .bind(p.completion_percentage)
        .bind(p.created_at)
        .bind(p.updated_at)
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(&format!("{SELECT_PROJECTS} ORDER BY p.id"))
            .fetch_all(self.pool())
            .await?;
        Ok(projects)
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(&format!("{SELECT_PROJECTS} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(project)
    }

    async fn save(&self, project: &Project) -> Result<Project, StoreError> {
        let mut tx = self.pool().begin().await?;

        let id: Id = match project.id {
            None => {
                bind_columns(
                    sqlx::query_scalar(
                        "INSERT INTO projects (name, description, project_number, start_date,
                            end_date, budget_amount, budget_spent, status, location_address,
                            location_city, location_state, location_zip, location_country,
                            cover_image_url, project_manager_id, completion_percentage,
                            created_at, updated_at)
                         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                            $15, $16, $17, $18)
                         RETURNING id",
                    ),
                    project,
                )
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => bind_columns(
                sqlx::query_scalar(
                    "UPDATE projects SET name = $1, description = $2, project_number = $3,
                        start_date = $4, end_date = $5, budget_amount = $6, budget_spent = $7,
                        status = $8, location_address = $9, location_city = $10,
                        location_state = $11, location_zip = $12, location_country = $13,
                        cover_image_url = $14, project_manager_id = $15,
                        completion_percentage = $16, created_at = $17, updated_at = $18
                     WHERE id = $19
                     RETURNING id",
                ),
                project,
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::Missing {
                table: "projects",
                id,
            })?,
        };

        sqlx::query("DELETE FROM project_team_members WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO project_team_members (project_id, user_id)
             SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(id)
        .bind(&project.team_member_ids)
        .execute(&mut *tx)
        .await?;

        let saved = sqlx::query_as::<_, Project>(&format!("{SELECT_PROJECTS} WHERE p.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        // tasks, issues and memberships go with it through ON DELETE CASCADE
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn find_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "{SELECT_PROJECTS} WHERE p.status = $1 ORDER BY p.id"
        ))
        .bind(status)
        .fetch_all(self.pool())
        .await?;
        Ok(projects)
    }

    async fn find_by_project_manager(&self, user_id: Id) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "{SELECT_PROJECTS} WHERE p.project_manager_id = $1 ORDER BY p.id"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(projects)
    }

    async fn find_by_team_member(&self, user_id: Id) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "{SELECT_PROJECTS}
             WHERE EXISTS (
                SELECT 1 FROM project_team_members m
                WHERE m.project_id = p.id AND m.user_id = $1
             )
             ORDER BY p.id"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(projects)
    }

    async fn find_by_project_number(&self, number: &str) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "{SELECT_PROJECTS} WHERE p.project_number = $1"
        ))
        .bind(number)
        .fetch_optional(self.pool())
        .await?;
        Ok(project)
    }
}
