use chrono::Utc;

use super::{not_found, require_project, require_text, require_user};
use crate::auth::extractor::AuthUser;
use crate::auth::matrix::{Operation, Subject};
use crate::db::Store;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Id, Issue, IssueStatus, Stamp};

pub async fn find_all(store: &Store, caller: &AuthUser) -> Result<Vec<Issue>, AppError> {
    caller.authorize(Subject::Issue, Operation::Read)?;
    Ok(store.issues.find_all().await?)
}

pub async fn find_by_id(store: &Store, caller: &AuthUser, id: Id) -> Result<Issue, AppError> {
    caller.authorize(Subject::Issue, Operation::Read)?;
    store
        .issues
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::Issue, id))
}

pub async fn find_by_project(
    store: &Store,
    caller: &AuthUser,
    project_id: Id,
) -> Result<Vec<Issue>, AppError> {
    caller.authorize(Subject::Issue, Operation::Read)?;
    if store.projects.find_by_id(project_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store.issues.find_by_project(project_id).await?)
}

pub async fn find_by_project_and_status(
    store: &Store,
    caller: &AuthUser,
    project_id: Id,
    status: IssueStatus,
) -> Result<Vec<Issue>, AppError> {
    caller.authorize(Subject::Issue, Operation::Read)?;
    if store.projects.find_by_id(project_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store
        .issues
        .find_by_project_and_status(project_id, status)
        .await?)
}

pub async fn find_by_reported_by(
    store: &Store,
    caller: &AuthUser,
    user_id: Id,
) -> Result<Vec<Issue>, AppError> {
    caller.authorize(Subject::Issue, Operation::Read)?;
    if store.users.find_by_id(user_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store.issues.find_by_reported_by(user_id).await?)
}

pub async fn find_by_assigned_to(
    store: &Store,
    caller: &AuthUser,
    user_id: Id,
) -> Result<Vec<Issue>, AppError> {
    caller.authorize(Subject::Issue, Operation::Read)?;
    if store.users.find_by_id(user_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store.issues.find_by_assigned_to(user_id).await?)
}

pub async fn find_by_assigned_to_and_status(
    store: &Store,
    caller: &AuthUser,
    user_id: Id,
    status: IssueStatus,
) -> Result<Vec<Issue>, AppError> {
    caller.authorize(Subject::Issue, Operation::Read)?;
    if store.users.find_by_id(user_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store
        .issues
        .find_by_assigned_to_and_status(user_id, status)
        .await?)
}

pub async fn find_by_status(
    store: &Store,
    caller: &AuthUser,
    status: IssueStatus,
) -> Result<Vec<Issue>, AppError> {
    caller.authorize(Subject::Issue, Operation::Read)?;
    Ok(store.issues.find_by_status(status).await?)
}

/// Records a new issue. The caller becomes the reporter unless one is given.
pub async fn create(store: &Store, caller: &AuthUser, mut issue: Issue) -> Result<Issue, AppError> {
    caller.authorize(Subject::Issue, Operation::Create)?;
    if issue.reported_by_id.is_none() {
        issue.reported_by_id = Some(caller.user_id);
    }
    validate(store, &issue).await?;

    issue.id = None;
    issue.stamp_created(Utc::now());
    let saved = store.issues.save(&issue).await?;

    audit::log_event(caller, "issue.created", Subject::Issue, saved.id);
    Ok(saved)
}

pub async fn update(
    store: &Store,
    caller: &AuthUser,
    id: Id,
    mut issue: Issue,
) -> Result<Issue, AppError> {
    caller.authorize(Subject::Issue, Operation::Update)?;
    let stored = store
        .issues
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::Issue, id))?;
    validate(store, &issue).await?;

    issue.id = Some(id);
    issue.stamp_updated(&stored, Utc::now());
    let saved = store.issues.save(&issue).await?;

    audit::log_event(caller, "issue.updated", Subject::Issue, saved.id);
    Ok(saved)
}

pub async fn delete(store: &Store, caller: &AuthUser, id: Id) -> Result<(), AppError> {
    caller.authorize(Subject::Issue, Operation::Delete)?;
    if store.issues.find_by_id(id).await?.is_none() {
        return Err(not_found(Subject::Issue, id));
    }
    store.issues.delete_by_id(id).await?;

    audit::log_event(caller, "issue.deleted", Subject::Issue, Some(id));
    Ok(())
}

async fn validate(store: &Store, issue: &Issue) -> Result<(), AppError> {
    require_text("title", &issue.title)?;
    require_project(store, issue.project_id).await?;
    require_user(store, "reportedById", issue.reported_by_id).await?;
    require_user(store, "assignedToId", issue.assigned_to_id).await
}
