use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use super::{JsonBody, PathParams};
use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::{Id, Issue, IssueStatus};
use crate::services::issues;
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Issue>>, AppError> {
    Ok(Json(issues::find_all(&state.store, &auth).await?))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Json(issue), _): JsonBody<Issue>,
) -> Result<(StatusCode, Json<Issue>), AppError> {
    let issue = issues::create(&state.store, &auth, issue).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<Json<Issue>, AppError> {
    Ok(Json(issues::find_by_id(&state.store, &auth, id).await?))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
    WithRejection(Json(issue), _): JsonBody<Issue>,
) -> Result<Json<Issue>, AppError> {
    Ok(Json(issues::update(&state.store, &auth, id, issue).await?))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<StatusCode, AppError> {
    issues::delete(&state.store, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn by_project(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(project_id), _): PathParams<Id>,
) -> Result<Json<Vec<Issue>>, AppError> {
    Ok(Json(
        issues::find_by_project(&state.store, &auth, project_id).await?,
    ))
}

pub async fn by_project_and_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path((project_id, status)), _): PathParams<(Id, IssueStatus)>,
) -> Result<Json<Vec<Issue>>, AppError> {
    Ok(Json(
        issues::find_by_project_and_status(&state.store, &auth, project_id, status).await?,
    ))
}

pub async fn by_reporter(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(user_id), _): PathParams<Id>,
) -> Result<Json<Vec<Issue>>, AppError> {
    Ok(Json(
        issues::find_by_reported_by(&state.store, &auth, user_id).await?,
    ))
}

pub async fn by_assignee(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(user_id), _): PathParams<Id>,
) -> Result<Json<Vec<Issue>>, AppError> {
    Ok(Json(
        issues::find_by_assigned_to(&state.store, &auth, user_id).await?,
    ))
}

pub async fn by_assignee_and_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path((user_id, status)), _): PathParams<(Id, IssueStatus)>,
) -> Result<Json<Vec<Issue>>, AppError> {
    Ok(Json(
        issues::find_by_assigned_to_and_status(&state.store, &auth, user_id, status).await?,
    ))
}

pub async fn by_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(status), _): PathParams<IssueStatus>,
) -> Result<Json<Vec<Issue>>, AppError> {
    Ok(Json(issues::find_by_status(&state.store, &auth, status).await?))
}
