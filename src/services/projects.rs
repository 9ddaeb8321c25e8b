use chrono::Utc;
use rust_decimal::Decimal;

use super::{not_found, require_text, require_user};
use crate::auth::extractor::AuthUser;
use crate::auth::matrix::{Operation, Subject};
use crate::db::Store;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Id, Project, ProjectStatus, Stamp};

pub async fn find_all(store: &Store, caller: &AuthUser) -> Result<Vec<Project>, AppError> {
    caller.authorize(Subject::Project, Operation::Read)?;
    Ok(store.projects.find_all().await?)
}

pub async fn find_by_id(store: &Store, caller: &AuthUser, id: Id) -> Result<Project, AppError> {
    caller.authorize(Subject::Project, Operation::Read)?;
    store
        .projects
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::Project, id))
}

pub async fn find_by_status(
    store: &Store,
    caller: &AuthUser,
    status: ProjectStatus,
) -> Result<Vec<Project>, AppError> {
    caller.authorize(Subject::Project, Operation::Read)?;
    Ok(store.projects.find_by_status(status).await?)
}

/// Projects managed by the user. An unknown user yields an empty list.
pub async fn find_by_project_manager(
    store: &Store,
    caller: &AuthUser,
    user_id: Id,
) -> Result<Vec<Project>, AppError> {
    caller.authorize(Subject::Project, Operation::Read)?;
    if store.users.find_by_id(user_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store.projects.find_by_project_manager(user_id).await?)
}

pub async fn find_by_team_member(
    store: &Store,
    caller: &AuthUser,
    user_id: Id,
) -> Result<Vec<Project>, AppError> {
    caller.authorize(Subject::Project, Operation::Read)?;
    if store.users.find_by_id(user_id).await?.is_none() {
        return Ok(Vec::new());
    }
    Ok(store.projects.find_by_team_member(user_id).await?)
}

pub async fn find_by_project_number(
    store: &Store,
    caller: &AuthUser,
    number: &str,
) -> Result<Project, AppError> {
    caller.authorize(Subject::Project, Operation::Read)?;
    store
        .projects
        .find_by_project_number(number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project number {number} not found")))
}

pub async fn create(
    store: &Store,
    caller: &AuthUser,
    mut project: Project,
) -> Result<Project, AppError> {
    caller.authorize(Subject::Project, Operation::Create)?;
    validate(&project)?;
    check_references(store, &mut project).await?;

    project.id = None;
    project.stamp_created(Utc::now());
    let saved = store.projects.save(&project).await?;

    audit::log_event(caller, "project.created", Subject::Project, saved.id);
    Ok(saved)
}

pub async fn update(
    store: &Store,
    caller: &AuthUser,
    id: Id,
    mut project: Project,
) -> Result<Project, AppError> {
    caller.authorize(Subject::Project, Operation::Update)?;
    validate(&project)?;
    let stored = store
        .projects
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::Project, id))?;
    check_references(store, &mut project).await?;

    project.id = Some(id);
    project.stamp_updated(&stored, Utc::now());
    let saved = store.projects.save(&project).await?;

    audit::log_event(caller, "project.updated", Subject::Project, saved.id);
    Ok(saved)
}

/// Removes the project together with its tasks, issues and memberships.
pub async fn delete(store: &Store, caller: &AuthUser, id: Id) -> Result<(), AppError> {
    caller.authorize(Subject::Project, Operation::Delete)?;
    if store.projects.find_by_id(id).await?.is_none() {
        return Err(not_found(Subject::Project, id));
    }
    store.projects.delete_by_id(id).await?;

    audit::log_event(caller, "project.deleted", Subject::Project, Some(id));
    Ok(())
}

fn validate(project: &Project) -> Result<(), AppError> {
    require_text("name", &project.name)?;
    if let Some(pct) = project.completion_percentage {
        if !(0..=100).contains(&pct) {
            return Err(AppError::BadRequest(
                "completionPercentage must be between 0 and 100".to_string(),
            ));
        }
    }
    for (field, amount) in [
        ("budgetAmount", project.budget_amount),
        ("budgetSpent", project.budget_spent),
    ] {
        if amount.is_some_and(|a| a < Decimal::ZERO) {
            return Err(AppError::BadRequest(format!("{field} must not be negative")));
        }
    }
    if let (Some(start), Some(end)) = (project.start_date, project.end_date) {
        if end < start {
            return Err(AppError::BadRequest(
                "endDate must not precede startDate".to_string(),
            ));
        }
    }
    Ok(())
}

async fn check_references(store: &Store, project: &mut Project) -> Result<(), AppError> {
    require_user(store, "projectManagerId", project.project_manager_id).await?;
    project.team_member_ids.sort_unstable();
    project.team_member_ids.dedup();
    for member in &project.team_member_ids {
        require_user(store, "teamMemberIds", Some(*member)).await?;
    }
    Ok(())
}
