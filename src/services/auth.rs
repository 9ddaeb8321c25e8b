use serde::{Deserialize, Serialize};

use super::users::register;
use crate::auth::jwt::{self, Claims};
use crate::auth::password;
use crate::config::Config;
use crate::db::Store;
use crate::error::AppError;
use crate::models::{ERole, Id, User};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub id: Id,
    pub username: String,
    pub email: String,
    pub roles: Vec<ERole>,
}

/// Public registration. The first account ever created becomes ROLE_ADMIN so
/// a fresh deployment can be administered; everyone after gets ROLE_USER.
pub async fn signup(store: &Store, req: SignupRequest) -> Result<User, AppError> {
    let roles = if store.users.count().await? == 0 {
        vec![ERole::Admin]
    } else {
        vec![ERole::User]
    };

    let mut user = User {
        first_name: req.first_name,
        last_name: req.last_name,
        job_title: req.job_title,
        phone: req.phone,
        ..User::new(req.username, req.email, String::new())
    };
    let saved = register(store, &mut user, &req.password, roles).await?;

    tracing::info!(
        target: "audit",
        user_id = saved.id,
        username = %saved.username,
        action = "user.signed_up",
        "audit event"
    );
    Ok(saved)
}

pub async fn signin(
    store: &Store,
    config: &Config,
    req: SigninRequest,
) -> Result<JwtResponse, AppError> {
    let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

    let user = store
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(invalid)?;
    let id = user.id.ok_or_else(invalid)?;

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        tracing::warn!(username = %req.username, "failed sign-in attempt");
        return Err(invalid());
    }

    let claims = Claims::new(
        id,
        user.username.clone(),
        user.roles.clone(),
        config.jwt_ttl_minutes,
    );
    let token = jwt::encode_token(&claims, &config.jwt_secret).map_err(AppError::Internal)?;

    Ok(JwtResponse {
        token,
        token_type: "Bearer",
        id,
        username: user.username,
        email: user.email,
        roles: user.roles,
    })
}
