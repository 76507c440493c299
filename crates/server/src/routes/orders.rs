use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use service::errors::ServiceError;
use service::order_service::{self, OrderInput, OrderView};
use service::pagination::PageParams;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page_index: Option<i64>,
    pub page_size: Option<i64>,
}

fn map_error(e: ServiceError, id: Option<i32>, action: &'static str, fallback: &'static str) -> JsonApiError {
    match e {
        ServiceError::Validation(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, msg, None),
        ServiceError::Conflict(msg) => JsonApiError::new(StatusCode::CONFLICT, msg, None),
        ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, msg, None),
        other => {
            // Persistence failures keep the fixed client-facing message;
            // the cause stays in the logs.
            error!(err = %other, id, "{action} failed");
            JsonApiError::new(StatusCode::BAD_REQUEST, fallback, None)
        }
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<OrderView>>, JsonApiError> {
    let params = PageParams { page_index: q.page_index, page_size: q.page_size };
    match order_service::list_orders(&state.db, params).await {
        Ok(found) => {
            info!(count = found.len(), "list orders");
            Ok(Json(found))
        }
        Err(ServiceError::Validation(msg)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, msg, None))
        }
        Err(e) => {
            error!(err = %e, "list orders failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", None))
        }
    }
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderView>, StatusCode> {
    match order_service::get_order(&state.db, id).await {
        Ok(Some(found)) => Ok(Json(found)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<OrderInput>,
) -> Result<impl IntoResponse, JsonApiError> {
    match order_service::create_order(&state.db, &input).await {
        Ok(created) => {
            let location = format!("/orders/{}", created.id);
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
        }
        Err(e) => Err(map_error(e, None, "create order", "Failed to create the order.")),
    }
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<OrderInput>,
) -> Result<&'static str, JsonApiError> {
    match order_service::update_order(&state.db, id, &input).await {
        Ok(_) => Ok("Order updated successfully!"),
        Err(e) => Err(map_error(e, Some(id), "update order", "Failed to update the order.")),
    }
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, JsonApiError> {
    match order_service::delete_order(&state.db, id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(map_error(e, Some(id), "delete order", "Failed to delete the order.")),
    }
}

pub async fn list_by_customer_id(
    State(state): State<ServerState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<OrderView>>, JsonApiError> {
    match order_service::get_orders_by_customer_id(&state.db, customer_id).await {
        Ok(found) => Ok(Json(found)),
        Err(ServiceError::NotFound(msg)) => {
            Err(JsonApiError::new(StatusCode::NOT_FOUND, msg, None))
        }
        Err(e) => {
            error!(err = %e, customer_id, "orders by customer id failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", None))
        }
    }
}

pub async fn list_by_customer_name(
    State(state): State<ServerState>,
    Path(customer_name): Path<String>,
) -> Result<Json<Vec<OrderView>>, JsonApiError> {
    match order_service::get_orders_by_customer_name(&state.db, &customer_name).await {
        Ok(found) => Ok(Json(found)),
        Err(ServiceError::NotFound(msg)) => {
            Err(JsonApiError::new(StatusCode::NOT_FOUND, msg, None))
        }
        Err(e) => {
            error!(err = %e, %customer_name, "orders by customer name failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", None))
        }
    }
}
