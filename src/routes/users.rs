use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::{JsonBody, PathParams};
use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::{ERole, Id, Role, User};
use crate::services::users::{self, NewUser, UserUpdate};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct AssignRoles {
    pub roles: Vec<String>,
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(users::find_all(&state.store, &auth).await?))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Json(req), _): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = users::create(&state.store, &auth, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<Json<User>, AppError> {
    Ok(Json(users::find_by_id(&state.store, &auth, id).await?))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
    WithRejection(Json(req), _): JsonBody<UserUpdate>,
) -> Result<Json<User>, AppError> {
    Ok(Json(users::update(&state.store, &auth, id, req).await?))
}

pub async fn assign_roles(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
    WithRejection(Json(req), _): JsonBody<AssignRoles>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        users::assign_roles(&state.store, &auth, id, &req.roles).await?,
    ))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<StatusCode, AppError> {
    users::delete(&state.store, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn by_role(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(role), _): PathParams<String>,
) -> Result<Json<Vec<User>>, AppError> {
    let role = ERole::from_name(&role)?;
    Ok(Json(users::find_by_role(&state.store, &auth, role).await?))
}

pub async fn roles(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Role>>, AppError> {
    Ok(Json(users::list_roles(&state.store, &auth).await?))
}
