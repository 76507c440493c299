use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::customer;

use crate::errors::ServiceError;

/// Write-side shape for customer create/update requests.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// List all customers. No filtering or paging on this path.
pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>, ServiceError> {
    customer::Entity::find()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Get a customer by id.
pub async fn get_customer(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<customer::Model>, ServiceError> {
    customer::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Create a customer after validating required fields and email uniqueness.
/// The email uniqueness check here is a pre-flight; the schema's UNIQUE
/// constraint is the authoritative guard.
pub async fn create_customer(
    db: &DatabaseConnection,
    input: &CustomerInput,
) -> Result<customer::Model, ServiceError> {
    if input.name.is_empty() {
        return Err(ServiceError::Validation(
            "Name is required for creating a customer.".to_string(),
        ));
    }
    if input.email.is_empty() {
        return Err(ServiceError::Validation(
            "Email is required for creating a customer.".to_string(),
        ));
    }
    if customer::find_by_email(db, &input.email).await?.is_some() {
        return Err(ServiceError::Conflict(
            "Customer with the provided email already exists.".to_string(),
        ));
    }

    let am = customer::ActiveModel {
        name: Set(input.name.clone()),
        email: Set(input.email.clone()),
        ..Default::default()
    };
    let created = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = created.id, "created customer");
    Ok(created)
}

/// Update a customer's name and email. The id is immutable.
pub async fn update_customer(
    db: &DatabaseConnection,
    id: i32,
    input: &CustomerInput,
) -> Result<customer::Model, ServiceError> {
    let existing = customer::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("customer"))?;

    if input.name.is_empty() {
        return Err(ServiceError::Validation(
            "Name is required for updating a customer.".to_string(),
        ));
    }
    if input.email.is_empty() {
        return Err(ServiceError::Validation(
            "Email is required for updating a customer.".to_string(),
        ));
    }

    // Uniqueness check excludes the row being updated.
    let clash = customer::Entity::find()
        .filter(customer::Column::Email.eq(input.email.as_str()))
        .filter(customer::Column::Id.ne(id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if clash.is_some() {
        return Err(ServiceError::Conflict(
            "Customer with the provided email already exists.".to_string(),
        ));
    }

    let mut am: customer::ActiveModel = existing.into();
    am.name = Set(input.name.clone());
    am.email = Set(input.email.clone());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = updated.id, "updated customer");
    Ok(updated)
}

/// Remove a customer record.
pub async fn delete_customer(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let existing = customer::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_none() {
        return Err(ServiceError::not_found("customer"));
    }
    customer::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id, "deleted customer");
    Ok(())
}
