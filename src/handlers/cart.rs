use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::cart::{CartItem, CartItemRef};
use crate::domain::order::OrderTotals;
use crate::errors::{AppError, FieldViolation};

use super::auth::AuthenticatedUser;
use super::Carts;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    /// Unit price captured when the line was added, e.g. "9.99"
    pub price: String,
    pub thumbnail: Option<String>,
    pub quantity: i32,
    pub created_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(line: CartItem) -> Self {
        Self {
            id: line.id,
            item_id: line.item_id,
            business_id: line.business_id,
            name: line.name,
            price: line.price.to_string(),
            thumbnail: line.thumbnail,
            quantity: line.quantity,
            created_at: line.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    /// Sum of unit price times quantity over every line.
    pub price: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmptyCartResponse {
    pub removed: usize,
}

fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::Validation(vec![FieldViolation::new(
            "quantity",
            "must be greater than zero",
        )]));
    }
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart/items
#[utoipa::path(
    get,
    path = "/cart/items",
    responses(
        (status = 200, description = "The caller's cart", body = CartResponse),
        (status = 401, description = "Missing identity headers"),
    ),
    tag = "cart"
)]
pub async fn list_cart(
    carts: web::Data<Carts>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let caller = user.0;
    let lines = web::block(move || carts.list_cart(&caller))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let totals = OrderTotals::of(&lines)?;
    Ok(HttpResponse::Ok().json(CartResponse {
        items: lines.into_iter().map(CartItemResponse::from).collect(),
        price: totals.price.to_string(),
        quantity: totals.quantity,
    }))
}

/// POST /cart/items
///
/// Reserves `quantity` units of the item and adds a line to the cart.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (status = 201, description = "Line added", body = CartItemResponse),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Item not found"),
        (status = 422, description = "No availability, item already in the cart, or another business's cart"),
    ),
    tag = "cart"
)]
pub async fn add_cart_item(
    carts: web::Data<Carts>,
    user: AuthenticatedUser,
    body: web::Json<AddCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    validate_quantity(body.quantity)?;
    let caller = user.0;

    let line = web::block(move || carts.add_cart_item(&caller, body.item_id, body.quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CartItemResponse::from(line)))
}

/// PUT /cart/items
///
/// Empties the cart and adds the item, in one transaction.
#[utoipa::path(
    put,
    path = "/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Cart replaced", body = CartItemResponse),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Item not found"),
        (status = 422, description = "No availability"),
    ),
    tag = "cart"
)]
pub async fn empty_and_add_cart_item(
    carts: web::Data<Carts>,
    user: AuthenticatedUser,
    body: web::Json<AddCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    validate_quantity(body.quantity)?;
    let caller = user.0;

    let line =
        web::block(move || carts.empty_and_add_cart_item(&caller, body.item_id, body.quantity))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartItemResponse::from(line)))
}

/// PATCH /cart/items/{id}
#[utoipa::path(
    patch,
    path = "/cart/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item UUID"),
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity replaced", body = CartItemResponse),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Cart item not found"),
        (status = 422, description = "No availability"),
    ),
    tag = "cart"
)]
pub async fn update_cart_item(
    carts: web::Data<Carts>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let cart_item_id = path.into_inner();
    let quantity = body.into_inner().quantity;
    validate_quantity(quantity)?;
    let caller = user.0;

    let line = web::block(move || carts.update_cart_item(&caller, cart_item_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartItemResponse::from(line)))
}

/// DELETE /cart/items/{id}
#[utoipa::path(
    delete,
    path = "/cart/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item UUID"),
    ),
    responses(
        (status = 204, description = "Line removed and stock restored"),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "cart"
)]
pub async fn delete_cart_item(
    carts: web::Data<Carts>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    remove_line(carts, user, CartItemRef::CartItem(path.into_inner())).await
}

/// DELETE /cart/items/by-item/{item_id}
#[utoipa::path(
    delete,
    path = "/cart/items/by-item/{item_id}",
    params(
        ("item_id" = Uuid, Path, description = "Catalog item UUID"),
    ),
    responses(
        (status = 204, description = "Line removed and stock restored"),
        (status = 404, description = "No cart line for that item"),
    ),
    tag = "cart"
)]
pub async fn delete_cart_item_by_item(
    carts: web::Data<Carts>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    remove_line(carts, user, CartItemRef::Item(path.into_inner())).await
}

async fn remove_line(
    carts: web::Data<Carts>,
    user: AuthenticatedUser,
    reference: CartItemRef,
) -> Result<HttpResponse, AppError> {
    let caller = user.0;
    web::block(move || carts.delete_cart_item(&caller, reference))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    responses(
        (status = 200, description = "Cart emptied and stock restored", body = EmptyCartResponse),
    ),
    tag = "cart"
)]
pub async fn empty_cart(
    carts: web::Data<Carts>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let caller = user.0;
    let removed = web::block(move || carts.empty_cart(&caller))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(EmptyCartResponse { removed }))
}
