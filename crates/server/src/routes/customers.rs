use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{error, info};

use models::customer;
use service::customer_service::{self, CustomerInput};
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<customer::Model>>, JsonApiError> {
    match customer_service::list_customers(&state.db).await {
        Ok(found) => {
            info!(count = found.len(), "list customers");
            Ok(Json(found))
        }
        Err(e) => {
            error!(err = %e, "list customers failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", None))
        }
    }
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<customer::Model>, StatusCode> {
    match customer_service::get_customer(&state.db, id).await {
        Ok(Some(found)) => Ok(Json(found)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CustomerInput>,
) -> Result<impl IntoResponse, JsonApiError> {
    match customer_service::create_customer(&state.db, &input).await {
        Ok(created) => {
            let location = format!("/customers/{}", created.id);
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
        }
        Err(ServiceError::Validation(msg)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, msg, None))
        }
        Err(ServiceError::Conflict(msg)) => Err(JsonApiError::new(StatusCode::CONFLICT, msg, None)),
        Err(e) => {
            // Persistence failures keep the fixed client-facing message;
            // the cause stays in the logs.
            error!(err = %e, "create customer failed");
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Failed to create the customer.", None))
        }
    }
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<CustomerInput>,
) -> Result<&'static str, JsonApiError> {
    match customer_service::update_customer(&state.db, id, &input).await {
        Ok(_) => Ok("Customer Updated Successfully!"),
        Err(ServiceError::NotFound(msg)) => {
            Err(JsonApiError::new(StatusCode::NOT_FOUND, msg, None))
        }
        Err(ServiceError::Validation(msg)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, msg, None))
        }
        Err(ServiceError::Conflict(msg)) => Err(JsonApiError::new(StatusCode::CONFLICT, msg, None)),
        Err(e) => {
            error!(err = %e, id, "update customer failed");
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Failed to update the customer.", None))
        }
    }
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<&'static str, JsonApiError> {
    match customer_service::delete_customer(&state.db, id).await {
        Ok(()) => Ok("Customer deleted successfully"),
        Err(ServiceError::NotFound(msg)) => {
            Err(JsonApiError::new(StatusCode::NOT_FOUND, msg, None))
        }
        Err(e) => {
            error!(err = %e, id, "delete customer failed");
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Failed to delete the customer.", None))
        }
    }
}
