use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use super::{JsonBody, PathParams};
use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::{Id, Resource, ResourceStatus, ResourceType};
use crate::services::resources;
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Resource>>, AppError> {
    Ok(Json(resources::find_all(&state.store, &auth).await?))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Json(resource), _): JsonBody<Resource>,
) -> Result<(StatusCode, Json<Resource>), AppError> {
    let resource = resources::create(&state.store, &auth, resource).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<Json<Resource>, AppError> {
    Ok(Json(resources::find_by_id(&state.store, &auth, id).await?))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
    WithRejection(Json(resource), _): JsonBody<Resource>,
) -> Result<Json<Resource>, AppError> {
    Ok(Json(
        resources::update(&state.store, &auth, id, resource).await?,
    ))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): PathParams<Id>,
) -> Result<StatusCode, AppError> {
    resources::delete(&state.store, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn by_type(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(resource_type), _): PathParams<ResourceType>,
) -> Result<Json<Vec<Resource>>, AppError> {
    Ok(Json(
        resources::find_by_type(&state.store, &auth, resource_type).await?,
    ))
}

pub async fn by_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(status), _): PathParams<ResourceStatus>,
) -> Result<Json<Vec<Resource>>, AppError> {
    Ok(Json(
        resources::find_by_status(&state.store, &auth, status).await?,
    ))
}

pub async fn by_type_and_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path((resource_type, status)), _): PathParams<(ResourceType, ResourceStatus)>,
) -> Result<Json<Vec<Resource>>, AppError> {
    Ok(Json(
        resources::find_by_type_and_status(&state.store, &auth, resource_type, status).await?,
    ))
}

pub async fn available(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(min_quantity), _): PathParams<i32>,
) -> Result<Json<Vec<Resource>>, AppError> {
    Ok(Json(
        resources::find_available(&state.store, &auth, min_quantity).await?,
    ))
}
