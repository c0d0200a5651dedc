use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::application::inventory_ledger;
use crate::domain::catalog::Business;
use crate::domain::errors::DomainError;
use crate::domain::identity::Caller;
use crate::domain::lifecycle::{self, OrderStatus};
use crate::domain::order::{
    NewOrder, NewOrderedItem, Order, OrderCursor, OrderDetails, OrderLifecycleEntry, OrderPage,
    OrderTotals, OrderType, OutboxEvent, PlaceOrder,
};
use crate::domain::ports::{Clock, MarketplaceStore, StoreTx};
use crate::domain::schedule;

pub const MAX_PAGE_SIZE: i64 = 100;

pub struct OrderService<S> {
    store: S,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl<S: MarketplaceStore> OrderService<S> {
    /// `timezone` is the zone whose wall clock the business schedules are written in.
    pub fn new(store: S, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self {
            store,
            clock,
            timezone,
        }
    }

    /// Turns the caller's cart into an order.
    ///
    /// The cart's reservations carry over to the order unchanged. Nothing is
    /// written unless every check passes.
    pub fn create_order(
        &self,
        caller: &Caller,
        request: PlaceOrder,
    ) -> Result<OrderDetails, DomainError> {
        let now = self.clock.now();
        let details = self
            .store
            .transaction(|tx| self.assemble(tx, caller, &request, now))?;

        log::info!(
            "order {} created for user {} at business {} ({} items, price {})",
            details.order.id,
            caller.user_id,
            details.order.business_id,
            details.items.len(),
            details.order.price
        );
        Ok(details)
    }

    fn assemble(
        &self,
        tx: &mut dyn StoreTx,
        caller: &Caller,
        request: &PlaceOrder,
        now: DateTime<Utc>,
    ) -> Result<OrderDetails, DomainError> {
        let cart = tx.list_cart_items(caller.user_id)?;
        let business_id = cart
            .first()
            .map(|line| line.business_id)
            .ok_or(DomainError::CartItemsNotFound)?;
        if cart.iter().any(|line| line.business_id != business_id) {
            return Err(DomainError::CrossBusinessCart);
        }

        let business = tx
            .find_business(business_id)?
            .ok_or(DomainError::BusinessNotFound)?;
        let address = tx
            .find_user_address(caller.user_id, request.user_address_id)?
            .ok_or(DomainError::UserAddressNotFound)?;
        let accepts_payment = tx
            .find_payment_method(business_id, request.business_payment_method_id)?
            .is_some_and(|method| method.enabled);
        if !accepts_payment {
            return Err(DomainError::BusinessPaymentMethodNotFound);
        }
        ensure_order_type(&business, request.order_type)?;

        schedule::check_margin(&business.time_margin, now, &request.window)?;
        let weekly = tx.find_schedule(business_id)?.unwrap_or_default();
        schedule::check_business_hours(&weekly, &request.window, self.timezone)?;

        let totals = OrderTotals::of(&cart)?;
        let delivery_price = match request.order_type {
            OrderType::Delivery => business.delivery_price.clone(),
            OrderType::Pickup => BigDecimal::from(0),
        };

        let order = tx.insert_order(NewOrder {
            user_id: caller.user_id,
            business_id,
            status: OrderStatus::Ordered,
            order_type: request.order_type,
            start_order_time: request.window.start,
            end_order_time: request.window.end,
            price: totals.price,
            delivery_price,
            items_quantity: totals.quantity,
            phone: request.phone.clone(),
            address: address.address,
            coordinates: address.coordinates,
            instructions: request.instructions.clone(),
            user_address_id: address.id,
            business_payment_method_id: request.business_payment_method_id,
            authorization_token_id: caller.authorization_token_id,
            created_at: now,
        })?;
        tx.append_lifecycle(order.id, order.status, order.created_at)?;

        let items = tx.insert_ordered_items(
            order.id,
            cart.iter().map(NewOrderedItem::from).collect(),
        )?;
        tx.clear_cart(caller.user_id)?;

        let details = OrderDetails { order, items };
        tx.append_event(OutboxEvent::order_created(&details))?;
        Ok(details)
    }

    /// Applies a status change requested by the order's owner.
    ///
    /// Rejecting an order gives every ordered quantity back to its item.
    pub fn update_order_status(
        &self,
        caller: &Caller,
        order_id: Uuid,
        status: OrderStatus,
        cancel_reasons: Option<String>,
    ) -> Result<Order, DomainError> {
        let now = self.clock.now();
        let (order, transition) = self.store.transaction(|tx| {
            let current = tx
                .lock_order(caller.user_id, order_id)?
                .ok_or(DomainError::OrderNotFound)?;
            let transition = lifecycle::transition(current.status, status)?;

            if transition.restores_stock() {
                for item in tx.list_ordered_items(order_id)? {
                    match inventory_ledger::restore(tx, item.item_id, item.quantity) {
                        Ok(_) => {}
                        Err(DomainError::ItemNotFound) => log::warn!(
                            "order {}: item {} no longer exists, {} units not restored",
                            order_id,
                            item.item_id,
                            item.quantity
                        ),
                        Err(e) => return Err(e),
                    }
                }
            }

            let reasons = if transition.records_cancel_reasons() {
                cancel_reasons
            } else {
                None
            };
            let order = tx.update_order_status(order_id, transition.to, reasons, now)?;
            tx.append_lifecycle(order.id, order.status, order.updated_at)?;
            tx.append_event(OutboxEvent::order_status_changed(&order, &transition))?;
            Ok((order, transition))
        })?;

        log::info!(
            "order {} moved {} -> {}",
            order.id,
            transition.from,
            transition.to
        );
        Ok(order)
    }

    /// Orders of other users are reported as not found.
    pub fn get_order(&self, caller: &Caller, order_id: Uuid) -> Result<OrderDetails, DomainError> {
        self.store.transaction(|tx| {
            let order = tx
                .find_order(caller.user_id, order_id)?
                .ok_or(DomainError::OrderNotFound)?;
            let items = tx.list_ordered_items(order.id)?;
            Ok(OrderDetails { order, items })
        })
    }

    /// Keyset-paginated orders of the caller, newest first.
    pub fn list_orders(
        &self,
        caller: &Caller,
        before: Option<OrderCursor>,
        limit: i64,
    ) -> Result<OrderPage, DomainError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let mut orders = self
            .store
            .transaction(|tx| tx.list_orders(caller.user_id, before, limit + 1))?;

        let has_more = orders.len() as i64 > limit;
        orders.truncate(limit as usize);
        let next_cursor = if has_more {
            orders.last().map(OrderCursor::of)
        } else {
            None
        };
        Ok(OrderPage {
            orders,
            next_cursor,
        })
    }

    pub fn order_lifecycle(
        &self,
        caller: &Caller,
        order_id: Uuid,
    ) -> Result<Vec<OrderLifecycleEntry>, DomainError> {
        self.store.transaction(|tx| {
            tx.find_order(caller.user_id, order_id)?
                .ok_or(DomainError::OrderNotFound)?;
            tx.list_lifecycle(order_id)
        })
    }
}

fn ensure_order_type(business: &Business, order_type: OrderType) -> Result<(), DomainError> {
    let supported = match order_type {
        OrderType::Delivery => business.home_delivery,
        OrderType::Pickup => business.to_pick_up,
    };
    if supported {
        Ok(())
    } else {
        Err(DomainError::OrderTypeNotSupported(order_type.to_string()))
    }
}
