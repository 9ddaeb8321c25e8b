use chrono::Utc;
use serde::Deserialize;

use super::{not_found, require_text};
use crate::auth::extractor::AuthUser;
use crate::auth::matrix::{Operation, Subject};
use crate::auth::password;
use crate::db::Store;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{ERole, Id, Role, Stamp, User};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const EMAIL_MAX: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    /// Bare (`ADMIN`) or stored (`ROLE_ADMIN`) names. Empty means ROLE_USER.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Full replacement of a user's profile. Roles go through `assign_roles`;
/// the password only changes when one is supplied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
}

pub async fn find_all(store: &Store, caller: &AuthUser) -> Result<Vec<User>, AppError> {
    caller.authorize(Subject::User, Operation::Read)?;
    Ok(store.users.find_all().await?)
}

pub async fn find_by_id(store: &Store, caller: &AuthUser, id: Id) -> Result<User, AppError> {
    caller.authorize(Subject::User, Operation::Read)?;
    store
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::User, id))
}

pub async fn find_by_role(
    store: &Store,
    caller: &AuthUser,
    role: ERole,
) -> Result<Vec<User>, AppError> {
    caller.authorize(Subject::User, Operation::Read)?;
    Ok(store.users.find_by_role(role).await?)
}

pub async fn list_roles(store: &Store, caller: &AuthUser) -> Result<Vec<Role>, AppError> {
    caller.authorize(Subject::User, Operation::Read)?;
    Ok(store.roles.find_all().await?)
}

pub async fn create(store: &Store, caller: &AuthUser, req: NewUser) -> Result<User, AppError> {
    caller.authorize(Subject::User, Operation::Create)?;
    let requested = parse_roles(&req.roles)?;
    let roles = if requested.is_empty() {
        vec![ERole::User]
    } else {
        requested
    };

    let mut user = User {
        first_name: req.first_name,
        last_name: req.last_name,
        job_title: req.job_title,
        phone: req.phone,
        ..User::new(req.username, req.email, String::new())
    };
    let saved = register(store, &mut user, &req.password, roles).await?;

    audit::log_event(caller, "user.created", Subject::User, saved.id);
    Ok(saved)
}

pub async fn update(
    store: &Store,
    caller: &AuthUser,
    id: Id,
    req: UserUpdate,
) -> Result<User, AppError> {
    caller.authorize(Subject::User, Operation::Update)?;
    let stored = store
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::User, id))?;

    validate_identity(&req.username, &req.email)?;
    if req.username != stored.username && store.users.exists_by_username(&req.username).await? {
        return Err(AppError::BadRequest("Username is already taken".to_string()));
    }
    if req.email != stored.email && store.users.exists_by_email(&req.email).await? {
        return Err(AppError::BadRequest("Email is already in use".to_string()));
    }

    let password_hash = match req.password.as_deref() {
        Some(new_password) => {
            password::check_length(new_password).map_err(AppError::BadRequest)?;
            password::hash(new_password).map_err(AppError::Internal)?
        }
        None => stored.password_hash.clone(),
    };

    let mut user = User {
        id: Some(id),
        first_name: req.first_name,
        last_name: req.last_name,
        job_title: req.job_title,
        phone: req.phone,
        roles: stored.roles.clone(),
        ..User::new(req.username, req.email, password_hash)
    };
    user.stamp_updated(&stored, Utc::now());
    let saved = store.users.save(&user).await?;

    audit::log_event(caller, "user.updated", Subject::User, saved.id);
    Ok(saved)
}

/// Replaces the user's role set. The new set must not be empty.
pub async fn assign_roles(
    store: &Store,
    caller: &AuthUser,
    id: Id,
    names: &[String],
) -> Result<User, AppError> {
    caller.authorize(Subject::User, Operation::Update)?;
    let roles = parse_roles(names)?;
    if roles.is_empty() {
        return Err(AppError::BadRequest("At least one role is required".to_string()));
    }
    let stored = store
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::User, id))?;

    let mut user = stored.clone();
    user.roles = resolve_roles(store, roles).await?;
    user.stamp_updated(&stored, Utc::now());
    let saved = store.users.save(&user).await?;

    audit::log_event(caller, "user.roles_assigned", Subject::User, saved.id);
    Ok(saved)
}

/// Removes the user. Projects, tasks and issues referencing them keep their
/// rows with the reference cleared.
pub async fn delete(store: &Store, caller: &AuthUser, id: Id) -> Result<(), AppError> {
    caller.authorize(Subject::User, Operation::Delete)?;
    if store.users.find_by_id(id).await?.is_none() {
        return Err(not_found(Subject::User, id));
    }
    store.users.delete_by_id(id).await?;

    audit::log_event(caller, "user.deleted", Subject::User, Some(id));
    Ok(())
}

/// Validates, hashes and persists a brand new account. Shared by the admin
/// create path and public signup.
pub(crate) async fn register(
    store: &Store,
    user: &mut User,
    plain_password: &str,
    roles: Vec<ERole>,
) -> Result<User, AppError> {
    validate_identity(&user.username, &user.email)?;
    password::check_length(plain_password).map_err(AppError::BadRequest)?;

    if store.users.exists_by_username(&user.username).await? {
        return Err(AppError::BadRequest("Username is already taken".to_string()));
    }
    if store.users.exists_by_email(&user.email).await? {
        return Err(AppError::BadRequest("Email is already in use".to_string()));
    }

    user.password_hash = password::hash(plain_password).map_err(AppError::Internal)?;
    user.roles = resolve_roles(store, roles).await?;
    user.id = None;
    user.stamp_created(Utc::now());
    Ok(store.users.save(user).await?)
}

fn validate_identity(username: &str, email: &str) -> Result<(), AppError> {
    require_text("username", username)?;
    require_text("email", email)?;
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(AppError::BadRequest(format!(
            "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    if email.len() > EMAIL_MAX || !email.contains('@') {
        return Err(AppError::BadRequest("email is not valid".to_string()));
    }
    Ok(())
}

fn parse_roles(names: &[String]) -> Result<Vec<ERole>, AppError> {
    let mut roles = names
        .iter()
        .map(|name| ERole::from_name(name))
        .collect::<Result<Vec<_>, _>>()?;
    roles.sort_unstable_by_key(|role| ERole::ALL.iter().position(|r| r == role));
    roles.dedup();
    Ok(roles)
}

/// Every role must be present in the roles table; a missing row means the
/// seed migration did not run.
async fn resolve_roles(store: &Store, roles: Vec<ERole>) -> Result<Vec<ERole>, AppError> {
    for role in &roles {
        if store.roles.find_by_name(*role).await?.is_none() {
            return Err(AppError::Internal(format!("Role {role} is not found")));
        }
    }
    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_stored_role_names() {
        let names = vec![
            "admin".to_string(),
            "ROLE_ADMIN".to_string(),
            "project_manager".to_string(),
        ];
        assert_eq!(
            parse_roles(&names).unwrap(),
            vec![ERole::ProjectManager, ERole::Admin]
        );
        assert!(parse_roles(&["owner".to_string()]).is_err());
    }

    #[test]
    fn rejects_malformed_identity() {
        assert!(validate_identity("ab", "ab@site.io").is_err());
        assert!(validate_identity("builder", "not-an-email").is_err());
        assert!(validate_identity("builder", "builder@site.io").is_ok());
    }
}
