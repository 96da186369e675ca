use crate::domain::model::Order;
use crate::transport::http::auth::{RequireAdmin, RequireSignIn};
use crate::transport::http::handlers::common::{message_failure, parse_id};
use crate::transport::http::types::{json_422, AppState, OrderStatusRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/v1/auth/orders",
    responses(
        (status = 200, description = "Caller's orders as a bare array", body = Vec<OrderView>),
        (status = 401, description = "Not signed in", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn buyer_orders_handler(
    State(state): State<AppState>,
    RequireSignIn(principal): RequireSignIn,
) -> impl IntoResponse {
    match state.orders.list_for_buyer(principal.user_id).await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => message_failure(e, "Error While Getting Orders"),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/all-orders",
    responses(
        (status = 200, description = "Every order, newest first", body = Vec<OrderView>),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn all_orders_handler(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> impl IntoResponse {
    match state.orders.list_all().await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => message_failure(e, "Error While Getting Orders"),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/order-status/{orderId}",
    params(("orderId" = String, Path, description = "Order id")),
    request_body = OrderStatusRequest,
    responses(
        (status = 200, description = "Updated order, or null when the id is unknown", body = Option<Order>),
        (status = 400, description = "Status outside the allowed set", body = MessageResponse),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn order_status_handler(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(order_id): Path<String>,
    request: Result<Json<OrderStatusRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e),
    };
    let Some(order_id) = parse_id(&order_id) else {
        return Json(None::<Order>).into_response();
    };
    let status = request.status.unwrap_or_default();

    match state.orders.set_status(order_id, &status).await {
        Ok(order) => Json(order).into_response(),
        Err(e) => message_failure(e, "Error While Updating Order"),
    }
}
