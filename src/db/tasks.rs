use async_trait::async_trait;
use chrono::NaiveDate;

use super::{PgStore, StoreError};
use crate::models::{Id, Task, TaskStatus};

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Task>, StoreError>;
    async fn find_by_id(&self, id: Id) -> Result<Option<Task>, StoreError>;
    async fn save(&self, task: &Task) -> Result<Task, StoreError>;
    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError>;
    async fn find_by_project(&self, project_id: Id) -> Result<Vec<Task>, StoreError>;
    async fn find_by_assigned_to(&self, user_id: Id) -> Result<Vec<Task>, StoreError>;
    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError>;
    /// Tasks whose due date is strictly earlier than `date`; undated tasks never match.
    async fn find_by_due_date_before(&self, date: NaiveDate) -> Result<Vec<Task>, StoreError>;
    async fn find_by_project_and_status(
        &self,
        project_id: Id,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError>;
    async fn find_by_assigned_to_and_status(
        &self,
        user_id: Id,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError>;
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn save(&self, task: &Task) -> Result<Task, StoreError> {
        match task.id {
            None => {
                let saved = sqlx::query_as::<_, Task>(
                    "INSERT INTO tasks (title, description, project_id, assigned_to_id, status,
                        priority, start_date, due_date, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                     RETURNING *",
                )
                .bind(&task.title)
                .bind(&task.description)
                .bind(task.project_id)
                .bind(task.assigned_to_id)
                .bind(task.status)
                .bind(task.priority)
                .bind(task.start_date)
                .bind(task.due_date)
                .bind(task.created_at)
                .bind(task.updated_at)
                .fetch_one(self.pool())
                .await?;
                Ok(saved)
            }
            Some(id) => sqlx::query_as::<_, Task>(
                "UPDATE tasks SET title = $2, description = $3, project_id = $4,
                    assigned_to_id = $5, status = $6, priority = $7, start_date = $8,
                    due_date = $9, created_at = $10, updated_at = $11
                 WHERE id = $1
                 RETURNING *",
            )
            .bind(id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.project_id)
            .bind(task.assigned_to_id)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.start_date)
            .bind(task.due_date)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::Missing { table: "tasks", id }),
        }
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn find_by_project(&self, project_id: Id) -> Result<Vec<Task>, StoreError> {
        let tasks =
            sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE project_id = $1 ORDER BY id")
                .bind(project_id)
                .fetch_all(self.pool())
                .await?;
        Ok(tasks)
    }

    async fn find_by_assigned_to(&self, user_id: Id) -> Result<Vec<Task>, StoreError> {
        let tasks =
            sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE assigned_to_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(self.pool())
                .await?;
        Ok(tasks)
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE status = $1 ORDER BY id")
            .bind(status)
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn find_by_due_date_before(&self, date: NaiveDate) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE due_date < $1 ORDER BY id")
            .bind(date)
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn find_by_project_and_status(
        &self,
        project_id: Id,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE project_id = $1 AND status = $2 ORDER BY id",
        )
        .bind(project_id)
        .bind(status)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn find_by_assigned_to_and_status(
        &self,
        user_id: Id,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE assigned_to_id = $1 AND status = $2 ORDER BY id",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }
}
