use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::{CartItem, CartItemRef, NewCartItem};
use crate::domain::catalog::{Business, BusinessPaymentMethod, Item, UserAddress};
use crate::domain::errors::DomainError;
use crate::domain::lifecycle::OrderStatus;
use crate::domain::order::{
    NewOrder, NewOrderedItem, Order, OrderCursor, OrderLifecycleEntry, OrderedItem, OutboxEvent,
};
use crate::domain::ports::{
    CartStore, CatalogStore, ItemStore, MarketplaceStore, OrderStore, OutboxStore, StoreTx,
};
use crate::domain::schedule::WeeklySchedule;
use crate::schema::{
    business_payment_methods, business_schedules, businesses, cart_items, items,
    marketplace_outbox, order_lifecycles, order_ordered_items, ordered_items, orders,
    user_addresses,
};

use super::models::{
    BusinessPaymentMethodRow, BusinessRow, BusinessScheduleRow, CartItemRow, ItemRow,
    NewCartItemRow, NewOrderLifecycleRow, NewOrderRow, NewOrderedItemRow, NewOutboxEventRow,
    OrderLifecycleRow,
    OrderLinkRow, OrderRow, OrderedItemRow, UserAddressRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Postgres-backed store. Every unit of work runs in one database transaction.
#[derive(Clone)]
pub struct DieselStore {
    pool: DbPool,
}

impl DieselStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl MarketplaceStore for DieselStore {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>,
    {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;
        conn.transaction::<_, DomainError, _>(|conn| f(&mut PgStoreTx { conn }))
    }
}

/// Queries bound to a connection that is inside an open transaction.
pub struct PgStoreTx<'c> {
    conn: &'c mut PgConnection,
}

impl PgStoreTx<'_> {
    fn conn(&mut self) -> &mut PgConnection {
        self.conn
    }
}

impl ItemStore for PgStoreTx<'_> {
    fn lock_item(&mut self, id: Uuid) -> Result<Option<Item>, DomainError> {
        let row = items::table
            .find(id)
            .select(ItemRow::as_select())
            .for_update()
            .first(self.conn())
            .optional()?;
        Ok(row.map(Item::from))
    }

    fn set_item_availability(&mut self, id: Uuid, availability: i32) -> Result<(), DomainError> {
        let updated = diesel::update(items::table.find(id))
            .set((
                items::availability.eq(availability),
                items::updated_at.eq(diesel::dsl::now),
            ))
            .execute(self.conn())?;
        if updated == 0 {
            return Err(DomainError::ItemNotFound);
        }
        Ok(())
    }
}

impl CatalogStore for PgStoreTx<'_> {
    fn find_business(&mut self, id: Uuid) -> Result<Option<Business>, DomainError> {
        let row = businesses::table
            .find(id)
            .select(BusinessRow::as_select())
            .first(self.conn())
            .optional()?;
        Ok(row.map(Business::from))
    }

    fn find_schedule(&mut self, business_id: Uuid) -> Result<Option<WeeklySchedule>, DomainError> {
        let row = business_schedules::table
            .filter(business_schedules::business_id.eq(business_id))
            .select(BusinessScheduleRow::as_select())
            .first(self.conn())
            .optional()?;
        Ok(row.map(WeeklySchedule::from))
    }

    fn find_payment_method(
        &mut self,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<Option<BusinessPaymentMethod>, DomainError> {
        let row = business_payment_methods::table
            .filter(business_payment_methods::id.eq(id))
            .filter(business_payment_methods::business_id.eq(business_id))
            .select(BusinessPaymentMethodRow::as_select())
            .first(self.conn())
            .optional()?;
        Ok(row.map(BusinessPaymentMethod::from))
    }

    fn list_payment_methods(
        &mut self,
        business_id: Uuid,
    ) -> Result<Vec<BusinessPaymentMethod>, DomainError> {
        let rows = business_payment_methods::table
            .filter(business_payment_methods::business_id.eq(business_id))
            .filter(business_payment_methods::enabled.eq(true))
            .order(business_payment_methods::created_at.asc())
            .select(BusinessPaymentMethodRow::as_select())
            .load(self.conn())?;
        Ok(rows.into_iter().map(BusinessPaymentMethod::from).collect())
    }

    fn find_user_address(
        &mut self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<UserAddress>, DomainError> {
        let row = user_addresses::table
            .filter(user_addresses::id.eq(id))
            .filter(user_addresses::user_id.eq(user_id))
            .select(UserAddressRow::as_select())
            .first(self.conn())
            .optional()?;
        Ok(row.map(UserAddress::from))
    }
}

impl CartStore for PgStoreTx<'_> {
    fn list_cart_items(&mut self, user_id: Uuid) -> Result<Vec<CartItem>, DomainError> {
        let rows = cart_items::table
            .filter(cart_items::user_id.eq(user_id))
            .order((cart_items::created_at.asc(), cart_items::id.asc()))
            .select(CartItemRow::as_select())
            .load(self.conn())?;
        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    fn find_cart_item(
        &mut self,
        user_id: Uuid,
        reference: CartItemRef,
    ) -> Result<Option<CartItem>, DomainError> {
        let query = cart_items::table
            .filter(cart_items::user_id.eq(user_id))
            .select(CartItemRow::as_select())
            .into_boxed();
        let query = match reference {
            CartItemRef::CartItem(id) => query.filter(cart_items::id.eq(id)),
            CartItemRef::Item(item_id) => query.filter(cart_items::item_id.eq(item_id)),
        };
        let row = query.first(self.conn()).optional()?;
        Ok(row.map(CartItem::from))
    }

    fn insert_cart_item(&mut self, item: NewCartItem) -> Result<CartItem, DomainError> {
        let row = diesel::insert_into(cart_items::table)
            .values(&NewCartItemRow {
                id: Uuid::new_v4(),
                user_id: item.user_id,
                item_id: item.item_id,
                business_id: item.business_id,
                name: item.name,
                price: item.price,
                thumbnail: item.thumbnail,
                quantity: item.quantity,
                authorization_token_id: item.authorization_token_id,
            })
            .returning(CartItemRow::as_returning())
            .get_result(self.conn())
            .map_err(|e| match e {
                // (user_id, item_id) is unique: a concurrent add of the same item won.
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    DomainError::ItemInTheCart
                }
                other => other.into(),
            })?;
        Ok(row.into())
    }

    fn set_cart_item_quantity(
        &mut self,
        id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, DomainError> {
        let row = diesel::update(cart_items::table.find(id))
            .set((
                cart_items::quantity.eq(quantity),
                cart_items::updated_at.eq(diesel::dsl::now),
            ))
            .returning(CartItemRow::as_returning())
            .get_result(self.conn())
            .optional()?;
        row.map(CartItem::from).ok_or(DomainError::CartItemNotFound)
    }

    fn delete_cart_item(&mut self, id: Uuid) -> Result<(), DomainError> {
        diesel::delete(cart_items::table.find(id)).execute(self.conn())?;
        Ok(())
    }

    fn clear_cart(&mut self, user_id: Uuid) -> Result<usize, DomainError> {
        let removed = diesel::delete(cart_items::table.filter(cart_items::user_id.eq(user_id)))
            .execute(self.conn())?;
        Ok(removed)
    }
}

impl OrderStore for PgStoreTx<'_> {
    fn insert_order(&mut self, order: NewOrder) -> Result<Order, DomainError> {
        let row = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: Uuid::new_v4(),
                user_id: order.user_id,
                business_id: order.business_id,
                status: order.status.as_str().to_string(),
                order_type: order.order_type.as_str().to_string(),
                start_order_time: order.start_order_time,
                end_order_time: order.end_order_time,
                price: order.price,
                delivery_price: order.delivery_price,
                items_quantity: order.items_quantity,
                phone: order.phone,
                address: order.address,
                latitude: order.coordinates.latitude,
                longitude: order.coordinates.longitude,
                instructions: order.instructions,
                user_address_id: order.user_address_id,
                business_payment_method_id: order.business_payment_method_id,
                authorization_token_id: order.authorization_token_id,
                created_at: order.created_at,
                updated_at: order.created_at,
            })
            .returning(OrderRow::as_returning())
            .get_result(self.conn())?;
        Order::try_from(row)
    }

    fn insert_ordered_items(
        &mut self,
        order_id: Uuid,
        items: Vec<NewOrderedItem>,
    ) -> Result<Vec<OrderedItem>, DomainError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let new_rows: Vec<NewOrderedItemRow> = items
            .into_iter()
            .map(|item| NewOrderedItemRow {
                id: Uuid::new_v4(),
                cart_item_id: item.cart_item_id,
                item_id: item.item_id,
                name: item.name,
                price: item.price,
                quantity: item.quantity,
                thumbnail: item.thumbnail,
            })
            .collect();
        let links: Vec<OrderLinkRow> = new_rows
            .iter()
            .map(|row| OrderLinkRow {
                order_id,
                ordered_item_id: row.id,
            })
            .collect();

        let stored = diesel::insert_into(ordered_items::table)
            .values(&new_rows)
            .returning(OrderedItemRow::as_returning())
            .get_results(self.conn())?;
        diesel::insert_into(order_ordered_items::table)
            .values(&links)
            .execute(self.conn())?;

        Ok(stored.into_iter().map(OrderedItem::from).collect())
    }

    fn find_order(&mut self, user_id: Uuid, id: Uuid) -> Result<Option<Order>, DomainError> {
        orders::table
            .find(id)
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .first(self.conn())
            .optional()?
            .map(Order::try_from)
            .transpose()
    }

    fn lock_order(&mut self, user_id: Uuid, id: Uuid) -> Result<Option<Order>, DomainError> {
        orders::table
            .find(id)
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .for_update()
            .first(self.conn())
            .optional()?
            .map(Order::try_from)
            .transpose()
    }

    fn list_orders(
        &mut self,
        user_id: Uuid,
        before: Option<OrderCursor>,
        limit: i64,
    ) -> Result<Vec<Order>, DomainError> {
        let mut query = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .order((orders::created_at.desc(), orders::id.desc()))
            .limit(limit)
            .into_boxed();
        if let Some(cursor) = before {
            query = query.filter(
                orders::created_at.lt(cursor.created_at).or(orders::created_at
                    .eq(cursor.created_at)
                    .and(orders::id.lt(cursor.id))),
            );
        }

        query
            .load(self.conn())?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    fn list_ordered_items(&mut self, order_id: Uuid) -> Result<Vec<OrderedItem>, DomainError> {
        let rows = ordered_items::table
            .inner_join(order_ordered_items::table)
            .filter(order_ordered_items::order_id.eq(order_id))
            .order((ordered_items::created_at.asc(), ordered_items::id.asc()))
            .select(OrderedItemRow::as_select())
            .load(self.conn())?;
        Ok(rows.into_iter().map(OrderedItem::from).collect())
    }

    fn update_order_status(
        &mut self,
        id: Uuid,
        status: OrderStatus,
        cancel_reasons: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Order, DomainError> {
        let target = orders::table.find(id);
        let row = match cancel_reasons {
            Some(reasons) => diesel::update(target)
                .set((
                    orders::status.eq(status.as_str()),
                    orders::cancel_reasons.eq(Some(reasons)),
                    orders::updated_at.eq(at),
                ))
                .returning(OrderRow::as_returning())
                .get_result(self.conn())
                .optional()?,
            None => diesel::update(target)
                .set((
                    orders::status.eq(status.as_str()),
                    orders::updated_at.eq(at),
                ))
                .returning(OrderRow::as_returning())
                .get_result(self.conn())
                .optional()?,
        };
        row.ok_or(DomainError::OrderNotFound)
            .and_then(Order::try_from)
    }

    fn append_lifecycle(
        &mut self,
        order_id: Uuid,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<OrderLifecycleEntry, DomainError> {
        let row = diesel::insert_into(order_lifecycles::table)
            .values(&NewOrderLifecycleRow {
                id: Uuid::new_v4(),
                order_id,
                status: status.as_str().to_string(),
                created_at: at,
            })
            .returning(OrderLifecycleRow::as_returning())
            .get_result(self.conn())?;
        OrderLifecycleEntry::try_from(row)
    }

    fn list_lifecycle(&mut self, order_id: Uuid) -> Result<Vec<OrderLifecycleEntry>, DomainError> {
        order_lifecycles::table
            .filter(order_lifecycles::order_id.eq(order_id))
            .order((order_lifecycles::created_at.asc(), order_lifecycles::seq.asc()))
            .select(OrderLifecycleRow::as_select())
            .load(self.conn())?
            .into_iter()
            .map(OrderLifecycleEntry::try_from)
            .collect()
    }
}

impl OutboxStore for PgStoreTx<'_> {
    fn append_event(&mut self, event: OutboxEvent) -> Result<(), DomainError> {
        // Debezium's EventRouter SMT derives the topic from `aggregate_type`.
        diesel::insert_into(marketplace_outbox::table)
            .values(&NewOutboxEventRow {
                id: Uuid::new_v4(),
                aggregate_type: event.aggregate_type,
                aggregate_id: event.aggregate_id,
                event_type: event.event_type,
                payload: event.payload,
            })
            .execute(self.conn())?;
        Ok(())
    }
}
