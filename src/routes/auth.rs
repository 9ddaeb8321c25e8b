use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use super::JsonBody;
use crate::error::AppError;
use crate::models::User;
use crate::services::auth::{self, JwtResponse, SigninRequest, SignupRequest};
use crate::state::SharedState;

pub async fn signup(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = auth::signup(&state.store, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn signin(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): JsonBody<SigninRequest>,
) -> Result<Json<JwtResponse>, AppError> {
    let response = auth::signin(&state.store, &state.config, req).await?;
    Ok(Json(response))
}
