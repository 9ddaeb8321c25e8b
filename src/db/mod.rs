pub mod issues;
pub mod memory;
pub mod projects;
pub mod resources;
pub mod roles;
pub mod tasks;
pub mod users;

use std::sync::Arc;

use sqlx::PgPool;

use crate::models::Id;

pub use issues::IssueRepository;
pub use memory::MemoryStore;
pub use projects::ProjectRepository;
pub use resources::ResourceRepository;
pub use roles::RoleRepository;
pub use tasks::TaskRepository;
pub use users::UserRepository;

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    /// A unique key was already taken by another row.
    Duplicate(String),
    /// An update addressed a row that no longer exists.
    Missing { table: &'static str, id: Id },
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(err) => write!(f, "Database error: {err}"),
            StoreError::Duplicate(msg) => write!(f, "Duplicate key: {msg}"),
            StoreError::Missing { table, id } => write!(f, "No row {id} in {table}"),
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate(db_err.message().to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Postgres-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// The query surface handed to services: one repository per entity.
#[derive(Clone)]
pub struct Store {
    pub projects: Arc<dyn ProjectRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub issues: Arc<dyn IssueRepository>,
    pub resources: Arc<dyn ResourceRepository>,
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self::from_backend(Arc::new(PgStore::new(pool)))
    }

    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }

    fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ProjectRepository
            + TaskRepository
            + IssueRepository
            + ResourceRepository
            + UserRepository
            + RoleRepository
            + 'static,
    {
        Self {
            projects: backend.clone(),
            tasks: backend.clone(),
            issues: backend.clone(),
            resources: backend.clone(),
            users: backend.clone(),
            roles: backend,
        }
    }
}
