//! In-memory store for unit tests.
//!
//! A transaction works on a copy of the state and swaps it in only when the
//! closure succeeds, so a failed call leaves no trace. The mutex serializes
//! transactions the way row locks do in Postgres.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::domain::cart::{CartItem, CartItemRef, NewCartItem};
use crate::domain::catalog::{Business, BusinessPaymentMethod, Item, UserAddress};
use crate::domain::errors::DomainError;
use crate::domain::lifecycle::OrderStatus;
use crate::domain::order::{
    NewOrder, NewOrderedItem, Order, OrderCursor, OrderLifecycleEntry, OrderedItem, OutboxEvent,
};
use crate::domain::ports::{
    CartStore, CatalogStore, Clock, ItemStore, MarketplaceStore, OrderStore, OutboxStore, StoreTx,
};
use crate::domain::schedule::WeeklySchedule;

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub items: HashMap<Uuid, Item>,
    pub businesses: HashMap<Uuid, Business>,
    pub schedules: HashMap<Uuid, WeeklySchedule>,
    pub payment_methods: Vec<BusinessPaymentMethod>,
    pub addresses: Vec<UserAddress>,
    pub cart_items: Vec<CartItem>,
    pub orders: Vec<Order>,
    pub ordered_items: Vec<OrderedItem>,
    /// `(order_id, ordered_item_id)` rows of the join table.
    pub order_links: Vec<(Uuid, Uuid)>,
    pub lifecycles: Vec<OrderLifecycleEntry>,
    pub outbox: Vec<OutboxEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory store poisoned")
    }

    pub fn snapshot(&self) -> MemoryState {
        self.lock().clone()
    }

    pub fn availability(&self, item_id: Uuid) -> Option<i32> {
        self.lock().items.get(&item_id).map(|item| item.availability)
    }

    pub fn update_item(&self, id: Uuid, f: impl FnOnce(&mut Item)) {
        if let Some(item) = self.lock().items.get_mut(&id) {
            f(item);
        }
    }

    pub fn remove_item(&self, id: Uuid) {
        self.lock().items.remove(&id);
    }

    pub fn update_business(&self, id: Uuid, f: impl FnOnce(&mut Business)) {
        if let Some(business) = self.lock().businesses.get_mut(&id) {
            f(business);
        }
    }

    pub fn set_schedule(&self, business_id: Uuid, schedule: WeeklySchedule) {
        self.lock().schedules.insert(business_id, schedule);
    }

    pub fn remove_schedule(&self, business_id: Uuid) {
        self.lock().schedules.remove(&business_id);
    }

    pub fn update_payment_method(&self, id: Uuid, f: impl FnOnce(&mut BusinessPaymentMethod)) {
        if let Some(method) = self.lock().payment_methods.iter_mut().find(|m| m.id == id) {
            f(method);
        }
    }
}

impl MarketplaceStore for InMemoryStore {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>,
    {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let mut working = guard.clone();
        let value = f(&mut working)?;
        *guard = working;
        Ok(value)
    }
}

impl ItemStore for MemoryState {
    fn lock_item(&mut self, id: Uuid) -> Result<Option<Item>, DomainError> {
        Ok(self.items.get(&id).cloned())
    }

    fn set_item_availability(&mut self, id: Uuid, availability: i32) -> Result<(), DomainError> {
        let item = self.items.get_mut(&id).ok_or(DomainError::ItemNotFound)?;
        item.availability = availability;
        Ok(())
    }
}

impl CatalogStore for MemoryState {
    fn find_business(&mut self, id: Uuid) -> Result<Option<Business>, DomainError> {
        Ok(self.businesses.get(&id).cloned())
    }

    fn find_schedule(&mut self, business_id: Uuid) -> Result<Option<WeeklySchedule>, DomainError> {
        Ok(self.schedules.get(&business_id).copied())
    }

    fn find_payment_method(
        &mut self,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<Option<BusinessPaymentMethod>, DomainError> {
        Ok(self
            .payment_methods
            .iter()
            .find(|m| m.id == id && m.business_id == business_id)
            .cloned())
    }

    fn list_payment_methods(
        &mut self,
        business_id: Uuid,
    ) -> Result<Vec<BusinessPaymentMethod>, DomainError> {
        Ok(self
            .payment_methods
            .iter()
            .filter(|m| m.business_id == business_id && m.enabled)
            .cloned()
            .collect())
    }

    fn find_user_address(
        &mut self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<UserAddress>, DomainError> {
        Ok(self
            .addresses
            .iter()
            .find(|a| a.id == id && a.user_id == user_id)
            .cloned())
    }
}

impl CartStore for MemoryState {
    fn list_cart_items(&mut self, user_id: Uuid) -> Result<Vec<CartItem>, DomainError> {
        Ok(self
            .cart_items
            .iter()
            .filter(|line| line.user_id == user_id)
            .cloned()
            .collect())
    }

    fn find_cart_item(
        &mut self,
        user_id: Uuid,
        reference: CartItemRef,
    ) -> Result<Option<CartItem>, DomainError> {
        Ok(self
            .cart_items
            .iter()
            .find(|line| {
                line.user_id == user_id
                    && match reference {
                        CartItemRef::CartItem(id) => line.id == id,
                        CartItemRef::Item(item_id) => line.item_id == item_id,
                    }
            })
            .cloned())
    }

    fn insert_cart_item(&mut self, item: NewCartItem) -> Result<CartItem, DomainError> {
        let line = CartItem {
            id: Uuid::new_v4(),
            user_id: item.user_id,
            item_id: item.item_id,
            business_id: item.business_id,
            name: item.name,
            price: item.price,
            thumbnail: item.thumbnail,
            quantity: item.quantity,
            authorization_token_id: item.authorization_token_id,
            created_at: Utc::now(),
        };
        self.cart_items.push(line.clone());
        Ok(line)
    }

    fn set_cart_item_quantity(
        &mut self,
        id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, DomainError> {
        let line = self
            .cart_items
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or(DomainError::CartItemNotFound)?;
        line.quantity = quantity;
        Ok(line.clone())
    }

    fn delete_cart_item(&mut self, id: Uuid) -> Result<(), DomainError> {
        self.cart_items.retain(|line| line.id != id);
        Ok(())
    }

    fn clear_cart(&mut self, user_id: Uuid) -> Result<usize, DomainError> {
        let before = self.cart_items.len();
        self.cart_items.retain(|line| line.user_id != user_id);
        Ok(before - self.cart_items.len())
    }
}

impl OrderStore for MemoryState {
    fn insert_order(&mut self, order: NewOrder) -> Result<Order, DomainError> {
        let order = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            business_id: order.business_id,
            status: order.status,
            order_type: order.order_type,
            start_order_time: order.start_order_time,
            end_order_time: order.end_order_time,
            price: order.price,
            delivery_price: order.delivery_price,
            items_quantity: order.items_quantity,
            phone: order.phone,
            address: order.address,
            coordinates: order.coordinates,
            instructions: order.instructions,
            cancel_reasons: None,
            user_address_id: order.user_address_id,
            business_payment_method_id: order.business_payment_method_id,
            authorization_token_id: order.authorization_token_id,
            created_at: order.created_at,
            updated_at: order.created_at,
        };
        self.orders.push(order.clone());
        Ok(order)
    }

    fn insert_ordered_items(
        &mut self,
        order_id: Uuid,
        items: Vec<NewOrderedItem>,
    ) -> Result<Vec<OrderedItem>, DomainError> {
        let stored: Vec<OrderedItem> = items
            .into_iter()
            .map(|item| OrderedItem {
                id: Uuid::new_v4(),
                cart_item_id: item.cart_item_id,
                item_id: item.item_id,
                name: item.name,
                price: item.price,
                quantity: item.quantity,
                thumbnail: item.thumbnail,
            })
            .collect();
        for item in &stored {
            self.order_links.push((order_id, item.id));
        }
        self.ordered_items.extend(stored.iter().cloned());
        Ok(stored)
    }

    fn find_order(&mut self, user_id: Uuid, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self
            .orders
            .iter()
            .find(|order| order.id == id && order.user_id == user_id)
            .cloned())
    }

    fn lock_order(&mut self, user_id: Uuid, id: Uuid) -> Result<Option<Order>, DomainError> {
        self.find_order(user_id, id)
    }

    fn list_orders(
        &mut self,
        user_id: Uuid,
        before: Option<OrderCursor>,
        limit: i64,
    ) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|order| order.user_id == user_id)
            .filter(|order| before.map_or(true, |cursor| cursor.precedes(order)))
            .cloned()
            .collect();
        orders.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        orders.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(orders)
    }

    fn list_ordered_items(&mut self, order_id: Uuid) -> Result<Vec<OrderedItem>, DomainError> {
        Ok(self
            .order_links
            .iter()
            .filter(|(linked_order, _)| *linked_order == order_id)
            .filter_map(|(_, item_id)| self.ordered_items.iter().find(|i| i.id == *item_id))
            .cloned()
            .collect())
    }

    fn update_order_status(
        &mut self,
        id: Uuid,
        status: OrderStatus,
        cancel_reasons: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Order, DomainError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(DomainError::OrderNotFound)?;
        order.status = status;
        if cancel_reasons.is_some() {
            order.cancel_reasons = cancel_reasons;
        }
        order.updated_at = at;
        Ok(order.clone())
    }

    fn append_lifecycle(
        &mut self,
        order_id: Uuid,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<OrderLifecycleEntry, DomainError> {
        let entry = OrderLifecycleEntry {
            id: Uuid::new_v4(),
            order_id,
            status,
            created_at: at,
        };
        self.lifecycles.push(entry.clone());
        Ok(entry)
    }

    fn list_lifecycle(&mut self, order_id: Uuid) -> Result<Vec<OrderLifecycleEntry>, DomainError> {
        Ok(self
            .lifecycles
            .iter()
            .filter(|entry| entry.order_id == order_id)
            .cloned()
            .collect())
    }
}

impl OutboxStore for MemoryState {
    fn append_event(&mut self, event: OutboxEvent) -> Result<(), DomainError> {
        self.outbox.push(event);
        Ok(())
    }
}

/// A clock tests can move by hand.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().expect("clock poisoned");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock poisoned")
    }
}

pub mod fixtures {
    use super::*;
    use crate::domain::catalog::Coordinates;
    use crate::domain::identity::Caller;
    use crate::domain::schedule::TimeMargin;

    pub fn caller() -> Caller {
        Caller {
            user_id: Uuid::new_v4(),
            authorization_token_id: Uuid::new_v4(),
        }
    }

    pub fn business(store: &InMemoryStore) -> Business {
        let business = Business {
            id: Uuid::new_v4(),
            name: "La Bodeguita".to_string(),
            address: "Empedrado 207".to_string(),
            coordinates: Coordinates::new(23.1410, -82.3516),
            home_delivery: true,
            to_pick_up: true,
            delivery_price: BigDecimal::from(2),
            delivery_radius_meters: 3_000.0,
            time_margin: TimeMargin::default(),
        };
        store.lock().businesses.insert(business.id, business.clone());
        business
    }

    pub fn item(store: &InMemoryStore, business_id: Uuid, price: &str, availability: i32) -> Item {
        let item = Item {
            id: Uuid::new_v4(),
            business_id,
            name: format!("item-{availability}-{price}"),
            price: BigDecimal::from_str(price).expect("valid decimal"),
            availability,
            enabled: true,
            available: true,
            thumbnail: None,
        };
        store.lock().items.insert(item.id, item.clone());
        item
    }

    pub fn address(store: &InMemoryStore, user_id: Uuid) -> UserAddress {
        let address = UserAddress {
            id: Uuid::new_v4(),
            user_id,
            name: "Home".to_string(),
            address: "Calle 23 #456, Vedado".to_string(),
            coordinates: Coordinates::new(23.1367, -82.3828),
            instructions: None,
        };
        store.lock().addresses.push(address.clone());
        address
    }

    pub fn payment_method(store: &InMemoryStore, business_id: Uuid) -> BusinessPaymentMethod {
        let method = BusinessPaymentMethod {
            id: Uuid::new_v4(),
            business_id,
            name: "Cash".to_string(),
            details: None,
            enabled: true,
        };
        store.lock().payment_methods.push(method.clone());
        method
    }
}
