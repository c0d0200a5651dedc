use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use super::cart::CartItem;
use super::catalog::Coordinates;
use super::errors::DomainError;
use super::lifecycle::{OrderStatus, Transition};
use super::schedule::OrderWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Pickup,
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Pickup => "PICKUP",
            OrderType::Delivery => "DELIVERY",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("PICKUP") {
            Ok(OrderType::Pickup)
        } else if s.eq_ignore_ascii_case("DELIVERY") {
            Ok(OrderType::Delivery)
        } else {
            Err(DomainError::InvalidInput(format!("unknown order type '{s}'")))
        }
    }
}

/// Checkout request, after the transport layer has parsed it.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub window: OrderWindow,
    pub user_address_id: Uuid,
    pub business_payment_method_id: Uuid,
    pub order_type: OrderType,
    pub phone: String,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub start_order_time: DateTime<Utc>,
    pub end_order_time: DateTime<Utc>,
    pub price: BigDecimal,
    pub delivery_price: BigDecimal,
    pub items_quantity: i32,
    pub phone: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub instructions: Option<String>,
    pub cancel_reasons: Option<String>,
    pub user_address_id: Uuid,
    pub business_payment_method_id: Uuid,
    pub authorization_token_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub start_order_time: DateTime<Utc>,
    pub end_order_time: DateTime<Utc>,
    pub price: BigDecimal,
    pub delivery_price: BigDecimal,
    pub items_quantity: i32,
    pub phone: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub instructions: Option<String>,
    pub user_address_id: Uuid,
    pub business_payment_method_id: Uuid,
    pub authorization_token_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Immutable copy of a cart line taken when the order was placed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedItem {
    pub id: Uuid,
    pub cart_item_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrderedItem {
    pub cart_item_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub thumbnail: Option<String>,
}

impl From<&CartItem> for NewOrderedItem {
    fn from(line: &CartItem) -> Self {
        Self {
            cart_item_id: line.id,
            item_id: line.item_id,
            name: line.name.clone(),
            price: line.price.clone(),
            quantity: line.quantity,
            thumbnail: line.thumbnail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLifecycleEntry {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderedItem>,
}

/// Position in the newest-first order listing. `id` breaks ties between
/// orders created at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderCursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl OrderCursor {
    pub fn of(order: &Order) -> Self {
        Self {
            created_at: order.created_at,
            id: order.id,
        }
    }

    /// Whether `order` sorts after this position, i.e. belongs to a later page.
    pub fn precedes(&self, order: &Order) -> bool {
        (order.created_at, order.id) < (self.created_at, self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    /// Pass back to fetch the next, older page.
    pub next_cursor: Option<OrderCursor>,
}

/// Price and unit count of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub price: BigDecimal,
    pub quantity: i32,
}

impl OrderTotals {
    pub fn of(lines: &[CartItem]) -> Result<Self, DomainError> {
        let mut price = BigDecimal::from(0);
        let mut quantity: i32 = 0;
        for line in lines {
            price += line.line_total();
            quantity = quantity
                .checked_add(line.quantity)
                .ok_or_else(|| DomainError::InvalidInput("cart quantity overflow".to_string()))?;
        }
        Ok(Self { price, quantity })
    }
}

/// A fact about an order, written to the outbox alongside the change itself.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEvent {
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: serde_json::Value,
}

impl OutboxEvent {
    const ORDER_AGGREGATE: &'static str = "Order";

    pub fn order_created(details: &OrderDetails) -> Self {
        let order = &details.order;
        let items: Vec<serde_json::Value> = details
            .items
            .iter()
            .map(|item| {
                json!({
                    "item_id": item.item_id,
                    "name": item.name,
                    "quantity": item.quantity,
                    "price": item.price.to_string(),
                })
            })
            .collect();

        Self {
            aggregate_type: Self::ORDER_AGGREGATE.to_string(),
            aggregate_id: order.id.to_string(),
            event_type: "OrderCreated".to_string(),
            payload: json!({
                "order_id": order.id,
                "user_id": order.user_id,
                "business_id": order.business_id,
                "status": order.status.as_str(),
                "order_type": order.order_type.as_str(),
                "price": order.price.to_string(),
                "start_order_time": order.start_order_time,
                "end_order_time": order.end_order_time,
                "items": items,
            }),
        }
    }

    pub fn order_status_changed(order: &Order, transition: &Transition) -> Self {
        Self {
            aggregate_type: Self::ORDER_AGGREGATE.to_string(),
            aggregate_id: order.id.to_string(),
            event_type: "OrderStatusChanged".to_string(),
            payload: json!({
                "order_id": order.id,
                "business_id": order.business_id,
                "user_id": order.user_id,
                "from": transition.from.as_str(),
                "to": transition.to.as_str(),
                "cancel_reasons": order.cancel_reasons,
            }),
        }
    }
}
