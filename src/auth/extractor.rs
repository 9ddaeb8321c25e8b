use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::auth::jwt;
use crate::auth::matrix::{self, Access, Operation, Subject};
use crate::error::AppError;
use crate::models::{ERole, Id};
use crate::state::SharedState;

/// The authenticated caller: identity from the bearer access token, role
/// set from the current user row.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Id,
    pub username: String,
    pub roles: Vec<ERole>,
}

impl AuthUser {
    /// Evaluates the authorization matrix for this caller. A denied check
    /// surfaces as `Forbidden` before anything reaches the store.
    pub fn authorize(&self, subject: Subject, operation: Operation) -> Result<(), AppError> {
        match matrix::evaluate(&self.roles, subject, operation) {
            Access::Allowed => Ok(()),
            Access::Denied => {
                tracing::warn!(
                    user_id = self.user_id,
                    subject = subject.as_str(),
                    ?operation,
                    "access denied"
                );
                Err(AppError::Forbidden(format!(
                    "Not allowed to {} {}",
                    operation_verb(operation),
                    subject.as_str()
                )))
            }
        }
    }
}

fn operation_verb(operation: Operation) -> &'static str {
    match operation {
        Operation::Read => "read",
        Operation::Create => "create",
        Operation::Update => "update",
        Operation::Delete => "delete",
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized("Missing authentication token".to_string()))?;

        let claims = jwt::decode_token(bearer.token(), &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        // Roles come from the store, not the claims, so a demotion or a
        // deleted account takes effect on the next request.
        let user = state
            .store
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: user.username,
            roles: user.roles,
        })
    }
}
