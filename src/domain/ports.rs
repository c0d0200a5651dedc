use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::cart::{CartItem, CartItemRef, NewCartItem};
use super::catalog::{Business, BusinessPaymentMethod, Item, UserAddress};
use super::errors::DomainError;
use super::lifecycle::OrderStatus;
use super::order::{
    NewOrder, NewOrderedItem, Order, OrderCursor, OrderLifecycleEntry, OrderedItem, OutboxEvent,
};
use super::schedule::WeeklySchedule;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub trait ItemStore {
    /// Reads the item and holds it against concurrent writers until commit.
    fn lock_item(&mut self, id: Uuid) -> Result<Option<Item>, DomainError>;
    fn set_item_availability(&mut self, id: Uuid, availability: i32) -> Result<(), DomainError>;
}

pub trait CatalogStore {
    fn find_business(&mut self, id: Uuid) -> Result<Option<Business>, DomainError>;
    fn find_schedule(&mut self, business_id: Uuid) -> Result<Option<WeeklySchedule>, DomainError>;
    fn find_payment_method(
        &mut self,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<Option<BusinessPaymentMethod>, DomainError>;
    /// Enabled payment methods only.
    fn list_payment_methods(
        &mut self,
        business_id: Uuid,
    ) -> Result<Vec<BusinessPaymentMethod>, DomainError>;
    fn find_user_address(
        &mut self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<UserAddress>, DomainError>;
}

pub trait CartStore {
    /// Oldest line first.
    fn list_cart_items(&mut self, user_id: Uuid) -> Result<Vec<CartItem>, DomainError>;
    fn find_cart_item(
        &mut self,
        user_id: Uuid,
        reference: CartItemRef,
    ) -> Result<Option<CartItem>, DomainError>;
    fn insert_cart_item(&mut self, item: NewCartItem) -> Result<CartItem, DomainError>;
    fn set_cart_item_quantity(&mut self, id: Uuid, quantity: i32)
        -> Result<CartItem, DomainError>;
    fn delete_cart_item(&mut self, id: Uuid) -> Result<(), DomainError>;
    /// Deletes every line of the user's cart, returning how many were removed.
    fn clear_cart(&mut self, user_id: Uuid) -> Result<usize, DomainError>;
}

pub trait OrderStore {
    fn insert_order(&mut self, order: NewOrder) -> Result<Order, DomainError>;
    /// Stores the snapshots and links them to the order.
    fn insert_ordered_items(
        &mut self,
        order_id: Uuid,
        items: Vec<NewOrderedItem>,
    ) -> Result<Vec<OrderedItem>, DomainError>;
    /// The order, if it belongs to `user_id`.
    fn find_order(&mut self, user_id: Uuid, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Like [`OrderStore::find_order`] but holds the row until commit.
    fn lock_order(&mut self, user_id: Uuid, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Newest first by `(created_at, id)`, strictly past `before` when given.
    fn list_orders(
        &mut self,
        user_id: Uuid,
        before: Option<OrderCursor>,
        limit: i64,
    ) -> Result<Vec<Order>, DomainError>;
    fn list_ordered_items(&mut self, order_id: Uuid) -> Result<Vec<OrderedItem>, DomainError>;
    fn update_order_status(
        &mut self,
        id: Uuid,
        status: OrderStatus,
        cancel_reasons: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Order, DomainError>;
    fn append_lifecycle(
        &mut self,
        order_id: Uuid,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<OrderLifecycleEntry, DomainError>;
    /// Oldest first.
    fn list_lifecycle(&mut self, order_id: Uuid) -> Result<Vec<OrderLifecycleEntry>, DomainError>;
}

pub trait OutboxStore {
    fn append_event(&mut self, event: OutboxEvent) -> Result<(), DomainError>;
}

/// Everything a service may touch inside one transaction.
pub trait StoreTx: ItemStore + CatalogStore + CartStore + OrderStore + OutboxStore {}

impl<T> StoreTx for T where T: ItemStore + CatalogStore + CartStore + OrderStore + OutboxStore + ?Sized
{}

pub trait MarketplaceStore: Send + Sync + 'static {
    /// Runs `f` in one transaction: committed on `Ok`, rolled back on `Err`.
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>;
}
