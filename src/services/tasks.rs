use chrono::{NaiveDate, Utc};

use super::{not_found, require_project, require_text, require_user};
use crate::auth::extractor::AuthUser;
use crate::auth::matrix::{Operation, Subject};
use crate::db::Store;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Id, Stamp, Task, TaskStatus};

pub async fn find_all(store: &Store, caller: &AuthUser) -> Result<Vec<Task>, AppError> {
    caller.authorize(Subject::Task, Operation::Read)?;
    Ok(store.tasks.find_all().await?)
}

pub async fn find_by_id(store: &Store, caller: &AuthUser, id: Id) -> Result<Task, AppError> {
    caller.authorize(Subject::Task, Operation::Read)?;
    store
        .tasks
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::Task, id))
}

// Lookups keyed by a parent row answer with an empty list when the parent
// does not exist, rather than 404.

pub async fn find_by_project(
    store: &Store,
    caller: &AuthUser,
    project_id: Id,
) -> Result<Vec<Task>, AppError> {
    caller.authorize(Subject::Task, Operation::Read)?;
    if store.projects.find_by_id(project_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store.tasks.find_by_project(project_id).await?)
}

pub async fn find_by_project_and_status(
    store: &Store,
    caller: &AuthUser,
    project_id: Id,
    status: TaskStatus,
) -> Result<Vec<Task>, AppError> {
    caller.authorize(Subject::Task, Operation::Read)?;
    if store.projects.find_by_id(project_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store
        .tasks
        .find_by_project_and_status(project_id, status)
        .await?)
}

pub async fn find_by_assigned_to(
    store: &Store,
    caller: &AuthUser,
    user_id: Id,
) -> Result<Vec<Task>, AppError> {
    caller.authorize(Subject::Task, Operation::Read)?;
    if store.users.find_by_id(user_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store.tasks.find_by_assigned_to(user_id).await?)
}

pub async fn find_by_assigned_to_and_status(
    store: &Store,
    caller: &AuthUser,
    user_id: Id,
    status: TaskStatus,
) -> Result<Vec<Task>, AppError> {
    caller.authorize(Subject::Task, Operation::Read)?;
    if store.users.find_by_id(user_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store
        .tasks
        .find_by_assigned_to_and_status(user_id, status)
        .await?)
}

pub async fn find_by_status(
    store: &Store,
    caller: &AuthUser,
    status: TaskStatus,
) -> Result<Vec<Task>, AppError> {
    caller.authorize(Subject::Task, Operation::Read)?;
    Ok(store.tasks.find_by_status(status).await?)
}

/// Tasks due strictly before `date`. Tasks without a due date never match.
pub async fn find_by_due_date_before(
    store: &Store,
    caller: &AuthUser,
    date: NaiveDate,
) -> Result<Vec<Task>, AppError> {
    caller.authorize(Subject::Task, Operation::Read)?;
    Ok(store.tasks.find_by_due_date_before(date).await?)
}

pub async fn create(store: &Store, caller: &AuthUser, mut task: Task) -> Result<Task, AppError> {
    caller.authorize(Subject::Task, Operation::Create)?;
    validate(store, &task).await?;

    task.id = None;
    task.stamp_created(Utc::now());
    let saved = store.tasks.save(&task).await?;

    audit::log_event(caller, "task.created", Subject::Task, saved.id);
    Ok(saved)
}

pub async fn update(
    store: &Store,
    caller: &AuthUser,
    id: Id,
    mut task: Task,
) -> Result<Task, AppError> {
    caller.authorize(Subject::Task, Operation::Update)?;
    let stored = store
        .tasks
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::Task, id))?;
    validate(store, &task).await?;

    task.id = Some(id);
    task.stamp_updated(&stored, Utc::now());
    let saved = store.tasks.save(&task).await?;

    audit::log_event(caller, "task.updated", Subject::Task, saved.id);
    Ok(saved)
}

pub async fn delete(store: &Store, caller: &AuthUser, id: Id) -> Result<(), AppError> {
    caller.authorize(Subject::Task, Operation::Delete)?;
    if store.tasks.find_by_id(id).await?.is_none() {
        return Err(not_found(Subject::Task, id));
    }
    store.tasks.delete_by_id(id).await?;

    audit::log_event(caller, "task.deleted", Subject::Task, Some(id));
    Ok(())
}

async fn validate(store: &Store, task: &Task) -> Result<(), AppError> {
    require_text("title", &task.title)?;
    if let (Some(start), Some(due)) = (task.start_date, task.due_date) {
        if due < start {
            return Err(AppError::BadRequest(
                "dueDate must not precede startDate".to_string(),
            ));
        }
    }
    require_project(store, task.project_id).await?;
    require_user(store, "assignedToId", task.assigned_to_id).await
}
