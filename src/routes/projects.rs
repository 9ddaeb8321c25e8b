use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use super::{JsonBody, PathParams};
use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::{Id, Project, ProjectStatus};
use crate::services::projects;
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(projects::find_all(&state.store, &auth).await?))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Json(project), _): JsonBody<Project>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let project = projects::create(&state.store, &auth, project).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(projects::find_by_id(&state.store, &auth, id).await?))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
    WithRejection(Json(project), _): JsonBody<Project>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(projects::update(&state.store, &auth, id, project).await?))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<StatusCode, AppError> {
    projects::delete(&state.store, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn by_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(status), _): PathParams<ProjectStatus>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(projects::find_by_status(&state.store, &auth, status).await?))
}

pub async fn by_manager(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(user_id), _): PathParams<Id>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(
        projects::find_by_project_manager(&state.store, &auth, user_id).await?,
    ))
}

pub async fn by_member(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(user_id), _): PathParams<Id>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(
        projects::find_by_team_member(&state.store, &auth, user_id).await?,
    ))
}

pub async fn by_number(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(number), _): PathParams<String>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(
        projects::find_by_project_number(&state.store, &auth, &number).await?,
    ))
}
