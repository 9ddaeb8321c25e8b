use async_trait::async_trait;

use super::{PgStore, StoreError};
use crate::models::{Id, Issue, IssueStatus};

#[async_trait]
pub trait IssueRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Issue>, StoreError>;
    async fn find_by_id(&self, id: Id) -> Result<Option<Issue>, StoreError>;
    async fn save(&self, issue: &Issue) -> Result<Issue, StoreError>;
    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError>;
    async fn find_by_project(&self, project_id: Id) -> Result<Vec<Issue>, StoreError>;
    async fn find_by_reported_by(&self, user_id: Id) -> Result<Vec<Issue>, StoreError>;
    async fn find_by_assigned_to(&self, user_id: Id) -> Result<Vec<Issue>, StoreError>;
    async fn find_by_status(&self, status: IssueStatus) -> Result<Vec<Issue>, StoreError>;
    async fn find_by_project_and_status(
        &self,
        project_id: Id,
        status: IssueStatus,
    ) -> Result<Vec<Issue>, StoreError>;
    async fn find_by_assigned_to_and_status(
        &self,
        user_id: Id,
        status: IssueStatus,
    ) -> Result<Vec<Issue>, StoreError>;
}

#[async_trait]
impl IssueRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<Issue>, StoreError> {
        let issues = sqlx::query_as::<_, Issue>("SELECT * FROM issues ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(issues)
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<Issue>, StoreError> {
        let issue = sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(issue)
    }

    async fn save(&self, issue: &Issue) -> Result<Issue, StoreError> {
        match issue.id {
            None => {
                let saved = sqlx::query_as::<_, Issue>(
                    "INSERT INTO issues (title, description, project_id, reported_by_id,
                        assigned_to_id, priority, status, issue_type, location_details, due_date,
                        reported_date, resolution_date, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                     RETURNING *",
                )
                .bind(&issue.title)
                .bind(&issue.description)
                .bind(issue.project_id)
                .bind(issue.reported_by_id)
                .bind(issue.assigned_to_id)
                .bind(issue.priority)
                .bind(issue.status)
                .bind(issue.issue_type)
                .bind(&issue.location_details)
                .bind(issue.due_date)
                .bind(issue.reported_date)
                .bind(issue.resolution_date)
                .bind(issue.created_at)
                .bind(issue.updated_at)
                .fetch_one(self.pool())
                .await?;
                Ok(saved)
            }
            Some(id) => sqlx::query_as::<_, Issue>(
                "UPDATE issues SET title = $2, description = $3, project_id = $4,
                    reported_by_id = $5, assigned_to_id = $6, priority = $7, status = $8,
                    issue_type = $9, location_details = $10, due_date = $11,
                    reported_date = $12, resolution_date = $13, created_at = $14,
                    updated_at = $15
                 WHERE id = $1
                 RETURNING *",
            )
            .bind(id)
            .bind(&issue.title)
            .bind(&issue.description)
            .bind(issue.project_id)
            .bind(issue.reported_by_id)
            .bind(issue.assigned_to_id)
            .bind(issue.priority)
            .bind(issue.status)
            .bind(issue.issue_type)
            .bind(&issue.location_details)
            .bind(issue.due_date)
            .bind(issue.reported_date)
            .bind(issue.resolution_date)
            .bind(issue.created_at)
            .bind(issue.updated_at)
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::Missing { table: "issues", id }),
        }
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn find_by_project(&self, project_id: Id) -> Result<Vec<Issue>, StoreError> {
        let issues =
            sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE project_id = $1 ORDER BY id")
                .bind(project_id)
                .fetch_all(self.pool())
                .await?;
        Ok(issues)
    }

    async fn find_by_reported_by(&self, user_id: Id) -> Result<Vec<Issue>, StoreError> {
        let issues =
            sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE reported_by_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(self.pool())
                .await?;
        Ok(issues)
    }

    async fn find_by_assigned_to(&self, user_id: Id) -> Result<Vec<Issue>, StoreError> {
        let issues =
            sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE assigned_to_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(self.pool())
                .await?;
        Ok(issues)
    }

    async fn find_by_status(&self, status: IssueStatus) -> Result<Vec<Issue>, StoreError> {
        let issues =
            sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE status = $1 ORDER BY id")
                .bind(status)
                .fetch_all(self.pool())
                .await?;
        Ok(issues)
    }

    async fn find_by_project_and_status(
        &self,
        project_id: Id,
        status: IssueStatus,
    ) -> Result<Vec<Issue>, StoreError> {
        let issues = sqlx::query_as::<_, Issue>(
            "SELECT * FROM issues WHERE project_id = $1 AND status = $2 ORDER BY id",
        )
        .bind(project_id)
        .bind(status)
        .fetch_all(self.pool())
        .await?;
        Ok(issues)
    }

    async fn find_by_assigned_to_and_status(
        &self,
        user_id: Id,
        status: IssueStatus,
    ) -> Result<Vec<Issue>, StoreError> {
        let issues = sqlx::query_as::<_, Issue>(
            "SELECT * FROM issues WHERE assigned_to_id = $1 AND status = $2 ORDER BY id",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(self.pool())
        .await?;
        Ok(issues)
    }
}
