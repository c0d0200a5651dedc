use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::cart::CartItem;
use crate::domain::catalog::{Business, BusinessPaymentMethod, Coordinates, Item, UserAddress};
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderLifecycleEntry, OrderedItem};
use crate::domain::schedule::{DaySchedule, TimeMargin, WeeklySchedule};
use crate::schema::{
    business_payment_methods, business_schedules, businesses, cart_items, items,
    marketplace_outbox, order_lifecycles, order_ordered_items, ordered_items, orders,
    user_addresses,
};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = businesses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BusinessRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub home_delivery: bool,
    pub to_pick_up: bool,
    pub delivery_price: BigDecimal,
    pub delivery_radius_meters: f64,
    pub time_margin_order_month: i32,
    pub time_margin_order_day: i32,
    pub time_margin_order_hour: i32,
    pub time_margin_order_minute: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BusinessRow> for Business {
    fn from(row: BusinessRow) -> Self {
        Business {
            id: row.id,
            name: row.name,
            address: row.address,
            coordinates: Coordinates::new(row.latitude, row.longitude),
            home_delivery: row.home_delivery,
            to_pick_up: row.to_pick_up,
            delivery_price: row.delivery_price,
            delivery_radius_meters: row.delivery_radius_meters,
            time_margin: TimeMargin {
                months: row.time_margin_order_month,
                days: row.time_margin_order_day,
                hours: row.time_margin_order_hour,
                minutes: row.time_margin_order_minute,
            },
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = business_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BusinessScheduleRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub opening_time_monday: Option<NaiveTime>,
    pub closing_time_monday: Option<NaiveTime>,
    pub opening_time_monday_second: Option<NaiveTime>,
    pub closing_time_monday_second: Option<NaiveTime>,
    pub opening_time_tuesday: Option<NaiveTime>,
    pub closing_time_tuesday: Option<NaiveTime>,
    pub opening_time_tuesday_second: Option<NaiveTime>,
    pub closing_time_tuesday_second: Option<NaiveTime>,
    pub opening_time_wednesday: Option<NaiveTime>,
    pub closing_time_wednesday: Option<NaiveTime>,
    pub opening_time_wednesday_second: Option<NaiveTime>,
    pub closing_time_wednesday_second: Option<NaiveTime>,
    pub opening_time_thursday: Option<NaiveTime>,
    pub closing_time_thursday: Option<NaiveTime>,
    pub opening_time_thursday_second: Option<NaiveTime>,
    pub closing_time_thursday_second: Option<NaiveTime>,
    pub opening_time_friday: Option<NaiveTime>,
    pub closing_time_friday: Option<NaiveTime>,
    pub opening_time_friday_second: Option<NaiveTime>,
    pub closing_time_friday_second: Option<NaiveTime>,
    pub opening_time_saturday: Option<NaiveTime>,
    pub closing_time_saturday: Option<NaiveTime>,
    pub opening_time_saturday_second: Option<NaiveTime>,
    pub closing_time_saturday_second: Option<NaiveTime>,
    pub opening_time_sunday: Option<NaiveTime>,
    pub closing_time_sunday: Option<NaiveTime>,
    pub opening_time_sunday_second: Option<NaiveTime>,
    pub closing_time_sunday_second: Option<NaiveTime>,
}

impl From<BusinessScheduleRow> for WeeklySchedule {
    fn from(r: BusinessScheduleRow) -> Self {
        WeeklySchedule::new([
            DaySchedule::from_columns(
                r.opening_time_monday,
                r.closing_time_monday,
                r.opening_time_monday_second,
                r.closing_time_monday_second,
            ),
            DaySchedule::from_columns(
                r.opening_time_tuesday,
                r.closing_time_tuesday,
                r.opening_time_tuesday_second,
                r.closing_time_tuesday_second,
            ),
            DaySchedule::from_columns(
                r.opening_time_wednesday,
                r.closing_time_wednesday,
                r.opening_time_wednesday_second,
                r.closing_time_wednesday_second,
            ),
            DaySchedule::from_columns(
                r.opening_time_thursday,
                r.closing_time_thursday,
                r.opening_time_thursday_second,
                r.closing_time_thursday_second,
            ),
            DaySchedule::from_columns(
                r.opening_time_friday,
                r.closing_time_friday,
                r.opening_time_friday_second,
                r.closing_time_friday_second,
            ),
            DaySchedule::from_columns(
                r.opening_time_saturday,
                r.closing_time_saturday,
                r.opening_time_saturday_second,
                r.closing_time_saturday_second,
            ),
            DaySchedule::from_columns(
                r.opening_time_sunday,
                r.closing_time_sunday,
                r.opening_time_sunday_second,
                r.closing_time_sunday_second,
            ),
        ])
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = business_payment_methods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BusinessPaymentMethodRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub details: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<BusinessPaymentMethodRow> for BusinessPaymentMethod {
    fn from(row: BusinessPaymentMethodRow) -> Self {
        BusinessPaymentMethod {
            id: row.id,
            business_id: row.business_id,
            name: row.name,
            details: row.details,
            enabled: row.enabled,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = user_addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserAddressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserAddressRow> for UserAddress {
    fn from(row: UserAddressRow) -> Self {
        UserAddress {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            address: row.address,
            coordinates: Coordinates::new(row.latitude, row.longitude),
            instructions: row.instructions,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub availability: i32,
    pub enabled: bool,
    pub available: bool,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            business_id: row.business_id,
            name: row.name,
            price: row.price,
            availability: row.availability,
            enabled: row.enabled,
            available: row.available,
            thumbnail: row.thumbnail,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cart_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub thumbnail: Option<String>,
    pub quantity: i32,
    pub authorization_token_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        CartItem {
            id: row.id,
            user_id: row.user_id,
            item_id: row.item_id,
            business_id: row.business_id,
            name: row.name,
            price: row.price,
            thumbnail: row.thumbnail,
            quantity: row.quantity,
            authorization_token_id: row.authorization_token_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_items)]
pub struct NewCartItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub thumbnail: Option<String>,
    pub quantity: i32,
    pub authorization_token_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub status: String,
    pub order_type: String,
    pub start_order_time: DateTime<Utc>,
    pub end_order_time: DateTime<Utc>,
    pub price: BigDecimal,
    pub delivery_price: BigDecimal,
    pub items_quantity: i32,
    pub phone: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub instructions: Option<String>,
    pub cancel_reasons: Option<String>,
    pub user_address_id: Uuid,
    pub business_payment_method_id: Uuid,
    pub authorization_token_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        // Stored values were written by this service; a parse failure means a corrupt row.
        let corrupt = |e: DomainError| DomainError::Internal(format!("order {}: {e}", row.id));
        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            business_id: row.business_id,
            status: row.status.parse().map_err(corrupt)?,
            order_type: row.order_type.parse().map_err(corrupt)?,
            start_order_time: row.start_order_time,
            end_order_time: row.end_order_time,
            price: row.price,
            delivery_price: row.delivery_price,
            items_quantity: row.items_quantity,
            phone: row.phone,
            address: row.address,
            coordinates: Coordinates::new(row.latitude, row.longitude),
            instructions: row.instructions,
            cancel_reasons: row.cancel_reasons,
            user_address_id: row.user_address_id,
            business_payment_method_id: row.business_payment_method_id,
            authorization_token_id: row.authorization_token_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub status: String,
    pub order_type: String,
    pub start_order_time: DateTime<Utc>,
    pub end_order_time: DateTime<Utc>,
    pub price: BigDecimal,
    pub delivery_price: BigDecimal,
    pub items_quantity: i32,
    pub phone: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub instructions: Option<String>,
    pub user_address_id: Uuid,
    pub business_payment_method_id: Uuid,
    pub authorization_token_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = ordered_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderedItemRow {
    pub id: Uuid,
    pub cart_item_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderedItemRow> for OrderedItem {
    fn from(row: OrderedItemRow) -> Self {
        OrderedItem {
            id: row.id,
            cart_item_id: row.cart_item_id,
            item_id: row.item_id,
            name: row.name,
            price: row.price,
            quantity: row.quantity,
            thumbnail: row.thumbnail,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = ordered_items)]
pub struct NewOrderedItemRow {
    pub id: Uuid,
    pub cart_item_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_ordered_items)]
pub struct OrderLinkRow {
    pub order_id: Uuid,
    pub ordered_item_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_lifecycles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLifecycleRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// Insertion order; breaks ties between rows written at the same instant.
    pub seq: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lifecycles)]
pub struct NewOrderLifecycleRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderLifecycleRow> for OrderLifecycleEntry {
    type Error = DomainError;

    fn try_from(row: OrderLifecycleRow) -> Result<Self, Self::Error> {
        Ok(OrderLifecycleEntry {
            id: row.id,
            order_id: row.order_id,
            status: row
                .status
                .parse()
                .map_err(|e| DomainError::Internal(format!("lifecycle {}: {e}", row.id)))?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = marketplace_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = marketplace_outbox)]
pub struct NewOutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
}
