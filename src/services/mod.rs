//! Service operations. Each one checks the caller against the authorization
//! matrix first, then validates, stamps and delegates to the store.

pub mod auth;
pub mod issues;
pub mod projects;
pub mod resources;
pub mod tasks;
pub mod users;

use crate::auth::matrix::Subject;
use crate::db::Store;
use crate::error::AppError;
use crate::models::Id;

pub(crate) fn not_found(subject: Subject, id: Id) -> AppError {
    AppError::NotFound(format!("{} {id} not found", subject.label()))
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

/// A referenced project must exist before a child row may point at it.
pub(crate) async fn require_project(store: &Store, id: Id) -> Result<(), AppError> {
    match store.projects.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::BadRequest(format!("Project {id} does not exist"))),
    }
}

pub(crate) async fn require_user(store: &Store, field: &str, id: Option<Id>) -> Result<(), AppError> {
    let Some(id) = id else {
        return Ok(());
    };
    match store.users.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::BadRequest(format!("{field}: user {id} does not exist"))),
    }
}
