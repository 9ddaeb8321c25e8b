use async_trait::async_trait;

use super::{PgStore, StoreError};
use crate::models::{ERole, Id, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
    async fn find_by_id(&self, id: Id) -> Result<Option<User>, StoreError>;
    /// Inserts or overwrites the user and replaces its role set atomically.
    async fn save(&self, user: &User) -> Result<User, StoreError>;
    /// Clears references held by projects, tasks and issues before removal.
    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_role(&self, role: ERole) -> Result<Vec<User>, StoreError>;
    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;
    async fn count(&self) -> Result<i64, StoreError>;
}

const SELECT_USERS: &str = "SELECT u.*, ARRAY(
        SELECT r.name FROM user_roles ur
        JOIN roles r ON r.id = ur.role_id
        WHERE ur.user_id = u.id ORDER BY r.id
    ) AS roles
    FROM users u";

#[async_trait]
impl UserRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!("{SELECT_USERS} ORDER BY u.id"))
            .fetch_all(self.pool())
            .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USERS} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let mut tx = self.pool().begin().await?;

        let id: Id = match user.id {
            None => {
                sqlx::query_scalar(
                    "INSERT INTO users (username, email, password_hash, first_name, last_name,
                        job_title, phone, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                     RETURNING id",
                )
                .bind(&user.username)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.job_title)
                .bind(&user.phone)
                .bind(user.created_at)
                .bind(user.updated_at)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => sqlx::query_scalar(
                "UPDATE users SET username = $2, email = $3, password_hash = $4,
                    first_name = $5, last_name = $6, job_title = $7, phone = $8,
                    created_at = $9, updated_at = $10
                 WHERE id = $1
                 RETURNING id",
            )
            .bind(id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.job_title)
            .bind(&user.phone)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::Missing { table: "users", id })?,
        };

        let role_names: Vec<&str> = user.roles.iter().map(ERole::as_str).collect();
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id)
             SELECT $1, id FROM roles WHERE name = ANY($2)",
        )
        .bind(id)
        .bind(&role_names)
        .execute(&mut *tx)
        .await?;

        let saved = sqlx::query_as::<_, User>(&format!("{SELECT_USERS} WHERE u.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        // manager, assignee and reporter columns are ON DELETE SET NULL
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USERS} WHERE u.username = $1"))
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn find_by_role(&self, role: ERole) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "{SELECT_USERS}
             WHERE EXISTS (
                SELECT 1 FROM user_roles ur
                JOIN roles r ON r.id = ur.role_id
                WHERE ur.user_id = u.id AND r.name = $1
             )
             ORDER BY u.id"
        ))
        .bind(role)
        .fetch_all(self.pool())
        .await?;
        Ok(users)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(self.pool())
                .await?;
        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(self.pool())
            .await?;
        Ok(exists)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(row.0)
    }
}
