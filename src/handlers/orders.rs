use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::lifecycle::OrderStatus;
use crate::domain::order::{
    Order, OrderCursor, OrderDetails, OrderLifecycleEntry, OrderType, OrderedItem, PlaceOrder,
};
use crate::domain::schedule::OrderWindow;
use crate::errors::{AppError, FieldViolation};

use super::auth::AuthenticatedUser;
use super::Orders;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub start_order_time: DateTime<Utc>,
    pub end_order_time: DateTime<Utc>,
    pub user_address_id: Uuid,
    pub business_payment_method_id: Uuid,
    /// `PICKUP` or `DELIVERY`
    pub order_type: String,
    pub phone: String,
    pub instructions: Option<String>,
}

impl CreateOrderRequest {
    /// Collects every field problem at once rather than stopping at the first.
    fn validate(self) -> Result<PlaceOrder, AppError> {
        let mut violations = Vec::new();

        let order_type = match self.order_type.parse::<OrderType>() {
            Ok(order_type) => Some(order_type),
            Err(_) => {
                violations.push(FieldViolation::new(
                    "order_type",
                    "must be PICKUP or DELIVERY",
                ));
                None
            }
        };
        let window = match OrderWindow::new(self.start_order_time, self.end_order_time) {
            Ok(window) => Some(window),
            Err(_) => {
                violations.push(FieldViolation::new(
                    "end_order_time",
                    "must be after start_order_time",
                ));
                None
            }
        };
        if self.phone.trim().is_empty() {
            violations.push(FieldViolation::new("phone", "must not be empty"));
        }

        match (order_type, window) {
            (Some(order_type), Some(window)) if violations.is_empty() => Ok(PlaceOrder {
                window,
                user_address_id: self.user_address_id,
                business_payment_method_id: self.business_payment_method_id,
                order_type,
                phone: self.phone.trim().to_string(),
                instructions: self.instructions.filter(|i| !i.trim().is_empty()),
            }),
            _ => Err(AppError::Validation(violations)),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// Target status, e.g. `APPROVED` or `REJECTED`
    pub status: String,
    /// Kept only when the order is rejected.
    pub cancel_reasons: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderedItemResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub price: String,
    pub quantity: i32,
    pub thumbnail: Option<String>,
}

impl From<OrderedItem> for OrderedItemResponse {
    fn from(item: OrderedItem) -> Self {
        Self {
            id: item.id,
            item_id: item.item_id,
            name: item.name,
            price: item.price.to_string(),
            quantity: item.quantity,
            thumbnail: item.thumbnail,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub status: String,
    pub order_type: String,
    pub start_order_time: String,
    pub end_order_time: String,
    pub price: String,
    pub delivery_price: String,
    pub items_quantity: i32,
    pub phone: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub instructions: Option<String>,
    pub cancel_reasons: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<OrderedItemResponse>,
}

impl OrderResponse {
    fn new(order: Order, items: Vec<OrderedItem>) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            business_id: order.business_id,
            status: order.status.to_string(),
            order_type: order.order_type.to_string(),
            start_order_time: order.start_order_time.to_rfc3339(),
            end_order_time: order.end_order_time.to_rfc3339(),
            price: order.price.to_string(),
            delivery_price: order.delivery_price.to_string(),
            items_quantity: order.items_quantity,
            phone: order.phone,
            address: order.address,
            latitude: order.coordinates.latitude,
            longitude: order.coordinates.longitude,
            instructions: order.instructions,
            cancel_reasons: order.cancel_reasons,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
            items: items.into_iter().map(OrderedItemResponse::from).collect(),
        }
    }
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        Self::new(details.order, details.items)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LifecycleEntryResponse {
    pub id: Uuid,
    pub status: String,
    pub created_at: String,
}

impl From<OrderLifecycleEntry> for LifecycleEntryResponse {
    fn from(entry: OrderLifecycleEntry) -> Self {
        Self {
            id: entry.id,
            status: entry.status.to_string(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// `before` of the previous page's `next_cursor`.
    pub before: Option<DateTime<Utc>>,
    /// `before_id` of the previous page's `next_cursor`. Required with `before`.
    pub before_id: Option<Uuid>,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

impl ListOrdersParams {
    pub fn cursor(&self) -> Result<Option<OrderCursor>, AppError> {
        match (self.before, self.before_id) {
            (Some(created_at), Some(id)) => Ok(Some(OrderCursor { created_at, id })),
            (None, None) => Ok(None),
            _ => Err(AppError::Validation(vec![FieldViolation::new(
                "before",
                "before and before_id must be given together",
            )])),
        }
    }
}

/// Query parameters for the next page.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCursorResponse {
    pub before: DateTime<Utc>,
    pub before_id: Uuid,
}

impl From<OrderCursor> for OrderCursorResponse {
    fn from(cursor: OrderCursor) -> Self {
        Self {
            before: cursor.created_at,
            before_id: cursor.id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    /// Absent on the last page.
    pub next_cursor: Option<OrderCursorResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Turns the caller's cart into an order. The order, its item snapshots, the
/// first lifecycle row, the emptied cart and the outbox event are written in
/// one transaction; any failed check leaves everything untouched.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "User address or business not found"),
        (status = 422, description = "Empty cart, closed business, margin not met, or unsupported order type"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    orders: web::Data<Orders>,
    user: AuthenticatedUser,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner().validate()?;
    let caller = user.0;

    let details = web::block(move || orders.create_order(&caller, request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(details)))
}

/// GET /orders/{id}
///
/// Returns the order together with its item snapshots.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    orders: web::Data<Orders>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let caller = user.0;

    let details = web::block(move || orders.get_order(&caller, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(details)))
}

/// GET /orders
///
/// Returns the caller's orders, newest first, without their items.
/// Pass the fields of `next_cursor` back as query parameters to get the next page.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "One page of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    orders: web::Data<Orders>,
    user: AuthenticatedUser,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let cursor = params.cursor()?;
    let limit = params.limit;
    let caller = user.0;

    let page = web::block(move || orders.list_orders(&caller, cursor, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: page
            .orders
            .into_iter()
            .map(|order| OrderResponse::new(order, vec![]))
            .collect(),
        next_cursor: page.next_cursor.map(OrderCursorResponse::from),
    }))
}

/// PATCH /orders/{id}/status
///
/// Moves the caller's order through its lifecycle. Rejecting gives the
/// reserved stock back. Orders of other users are reported as not found.
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Transition not allowed"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    orders: web::Data<Orders>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let caller = user.0;
    let body = body.into_inner();
    let status: OrderStatus = body.status.parse().map_err(|_| {
        AppError::Validation(vec![FieldViolation::new(
            "status",
            format!("unknown status '{}'", body.status),
        )])
    })?;
    let cancel_reasons = body.cancel_reasons;

    let order = web::block(move || {
        orders.update_order_status(&caller, order_id, status, cancel_reasons)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::new(order, vec![])))
}

/// GET /orders/{id}/lifecycle
#[utoipa::path(
    get,
    path = "/orders/{id}/lifecycle",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Status history, oldest first", body = [LifecycleEntryResponse]),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order_lifecycle(
    orders: web::Data<Orders>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let caller = user.0;

    let entries = web::block(move || orders.order_lifecycle(&caller, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<LifecycleEntryResponse> = entries
        .into_iter()
        .map(LifecycleEntryResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}
