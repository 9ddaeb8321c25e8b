use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;

use super::{JsonBody, PathParams};
use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::{Id, Task, TaskStatus};
use crate::services::tasks;
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(tasks::find_all(&state.store, &auth).await?))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Json(task), _): JsonBody<Task>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = tasks::create(&state.store, &auth, task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(tasks::find_by_id(&state.store, &auth, id).await?))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
    WithRejection(Json(task), _): JsonBody<Task>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(tasks::update(&state.store, &auth, id, task).await?))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<StatusCode, AppError> {
    tasks::delete(&state.store, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn by_project(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(project_id), _): PathParams<Id>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(
        tasks::find_by_project(&state.store, &auth, project_id).await?,
    ))
}

pub async fn by_project_and_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path((project_id, status)), _): PathParams<(Id, TaskStatus)>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(
        tasks::find_by_project_and_status(&state.store, &auth, project_id, status).await?,
    ))
}

pub async fn by_assignee(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(user_id), _): PathParams<Id>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(
        tasks::find_by_assigned_to(&state.store, &auth, user_id).await?,
    ))
}

pub async fn by_assignee_and_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path((user_id, status)), _): PathParams<(Id, TaskStatus)>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(
        tasks::find_by_assigned_to_and_status(&state.store, &auth, user_id, status).await?,
    ))
}

pub async fn by_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(status), _): PathParams<TaskStatus>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(tasks::find_by_status(&state.store, &auth, status).await?))
}

pub async fn due_before(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(date), _): PathParams<NaiveDate>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(
        tasks::find_by_due_date_before(&state.store, &auth, date).await?,
    ))
}
