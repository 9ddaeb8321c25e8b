use chrono::Utc;
use rust_decimal::Decimal;

use super::{not_found, require_text};
use crate::auth::extractor::AuthUser;
use crate::auth::matrix::{Operation, Subject};
use crate::db::Store;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Id, Resource, ResourceStatus, ResourceType, Stamp};

pub async fn find_all(store: &Store, caller: &AuthUser) -> Result<Vec<Resource>, AppError> {
    caller.authorize(Subject::Resource, Operation::Read)?;
    Ok(store.resources.find_all().await?)
}

pub async fn find_by_id(store: &Store, caller: &AuthUser, id: Id) -> Result<Resource, AppError> {
    caller.authorize(Subject::Resource, Operation::Read)?;
    store
        .resources
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::Resource, id))
}

pub async fn find_by_type(
    store: &Store,
    caller: &AuthUser,
    resource_type: ResourceType,
) -> Result<Vec<Resource>, AppError> {
    caller.authorize(Subject::Resource, Operation::Read)?;
    Ok(store.resources.find_by_type(resource_type).await?)
}

pub async fn find_by_status(
    store: &Store,
    caller: &AuthUser,
    status: ResourceStatus,
) -> Result<Vec<Resource>, AppError> {
    caller.authorize(Subject::Resource, Operation::Read)?;
    Ok(store.resources.find_by_status(status).await?)
}

pub async fn find_by_type_and_status(
    store: &Store,
    caller: &AuthUser,
    resource_type: ResourceType,
    status: ResourceStatus,
) -> Result<Vec<Resource>, AppError> {
    caller.authorize(Subject::Resource, Operation::Read)?;
    Ok(store
        .resources
        .find_by_type_and_status(resource_type, status)
        .await?)
}

/// Resources holding strictly more than `min_quantity` units.
pub async fn find_available(
    store: &Store,
    caller: &AuthUser,
    min_quantity: i32,
) -> Result<Vec<Resource>, AppError> {
    caller.authorize(Subject::Resource, Operation::Read)?;
    Ok(store
        .resources
        .find_by_quantity_available_greater_than(min_quantity)
        .await?)
}

pub async fn create(
    store: &Store,
    caller: &AuthUser,
    mut resource: Resource,
) -> Result<Resource, AppError> {
    caller.authorize(Subject::Resource, Operation::Create)?;
    validate(&resource)?;

    resource.id = None;
    resource.stamp_created(Utc::now());
    let saved = store.resources.save(&resource).await?;

    audit::log_event(caller, "resource.created", Subject::Resource, saved.id);
    Ok(saved)
}

pub async fn update(
    store: &Store,
    caller: &AuthUser,
    id: Id,
    mut resource: Resource,
) -> Result<Resource, AppError> {
    caller.authorize(Subject::Resource, Operation::Update)?;
    validate(&resource)?;
    let stored = store
        .resources
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(Subject::Resource, id))?;

    resource.id = Some(id);
    resource.stamp_updated(&stored, Utc::now());
    let saved = store.resources.save(&resource).await?;

    audit::log_event(caller, "resource.updated", Subject::Resource, saved.id);
    Ok(saved)
}

pub async fn delete(store: &Store, caller: &AuthUser, id: Id) -> Result<(), AppError> {
    caller.authorize(Subject::Resource, Operation::Delete)?;
    if store.resources.find_by_id(id).await?.is_none() {
        return Err(not_found(Subject::Resource, id));
    }
    store.resources.delete_by_id(id).await?;

    audit::log_event(caller, "resource.deleted", Subject::Resource, Some(id));
    Ok(())
}

fn validate(resource: &Resource) -> Result<(), AppError> {
    require_text("name", &resource.name)?;
    if resource.quantity_available < 0 {
        return Err(AppError::BadRequest(
            "quantityAvailable must not be negative".to_string(),
        ));
    }
    if resource.unit_cost.is_some_and(|cost| cost < Decimal::ZERO) {
        return Err(AppError::BadRequest("unitCost must not be negative".to_string()));
    }
    Ok(())
}
